//! # sensor-bridge
//!
//! Core library for the `sensor-bridge` telemetry forwarder. Once per
//! configured interval the pipeline reads a raw sensor value, sends it to
//! an external decoder service over HTTP, validates what comes back, and
//! dispatches the resulting JSON document to a downstream message sink.
//!
//! ## Crate Structure
//!
//! - **`config`**: Strongly-typed pipeline configuration loaded from
//!   environment variables with figment. See [`config::PipelineConfig`].
//! - **`decoder`**: The HTTP decode round trip, including URL construction
//!   and the fallback policy that turns every HTTP or transport failure
//!   into a structured error document.
//! - **`dispatch`**: The [`dispatch::MessageSink`] seam to the upstream
//!   hub and the adapter that serializes records onto the fixed output
//!   channel.
//! - **`error`**: The central [`error::SenderError`] type.
//! - **`pipeline`**: The per-tick coordinator and the fixed-cadence
//!   scheduler that drives it until shutdown.
//! - **`sensor`**: The [`sensor::SampleSource`] seam plus a simulated
//!   sensor for running without hardware.
//! - **`tracing_setup`**: tracing-subscriber initialization.
//! - **`validate`**: The guarantee that exactly one well-formed JSON
//!   object leaves the pipeline per tick.

pub mod config;
pub mod decoder;
pub mod dispatch;
pub mod error;
pub mod pipeline;
pub mod sensor;
pub mod tracing_setup;
pub mod validate;
