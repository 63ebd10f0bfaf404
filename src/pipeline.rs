//! Pipeline coordination and scheduling.
//!
//! One [`PipelineContext`] is built at startup and shared by reference into
//! every tick's unit of work. Each tick runs the full chain serially:
//! read sample → decode over HTTP → validate → dispatch. Ticks are fired
//! on a fixed wall-clock cadence and spawned independently, so a slow
//! decoder lets ticks overlap rather than skewing the schedule; the HTTP
//! timeout bounds how long any one of them can linger.
//!
//! Every per-tick failure is contained within the tick. Nothing that
//! happens inside a tick stops the scheduler.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

use crate::config::PipelineConfig;
use crate::decoder::{DecodeRequest, DecoderClient};
use crate::dispatch::{dispatch_record, MessageSink};
use crate::error::{AppResult, SenderError};
use crate::sensor::SampleSource;
use crate::validate::ensure_json;

/// Frame port attached to every decode request. Carried as metadata only.
const FRAME_PORT: u32 = 1;

/// Everything one tick needs, constructed once at startup.
pub struct PipelineContext {
    config: PipelineConfig,
    client: DecoderClient,
    sink: Arc<dyn MessageSink>,
    sensor: Arc<dyn SampleSource>,
    ticks: AtomicU64,
}

/// Outcome of one tick, returned so callers can assert on results
/// instead of scraping logs.
#[derive(Debug)]
pub enum TickOutcome {
    /// The record reached the sink.
    Sent(Value),
    /// The record was built but the sink refused it. The tick still
    /// completed; the next tick is unaffected.
    DispatchFailed {
        /// The record that failed to send.
        record: Value,
        /// The sink's error.
        error: SenderError,
    },
}

impl TickOutcome {
    /// The telemetry record this tick produced, whether or not it was
    /// delivered. Exactly one exists per tick.
    pub fn record(&self) -> &Value {
        match self {
            TickOutcome::Sent(record) => record,
            TickOutcome::DispatchFailed { record, .. } => record,
        }
    }
}

impl PipelineContext {
    /// Build the shared context from validated configuration and the two
    /// external collaborators.
    pub fn new(
        config: PipelineConfig,
        sink: Arc<dyn MessageSink>,
        sensor: Arc<dyn SampleSource>,
    ) -> AppResult<Self> {
        let client = DecoderClient::new(Duration::from_millis(config.request_timeout_ms))?;
        Ok(Self {
            config,
            client,
            sink,
            sensor,
            ticks: AtomicU64::new(0),
        })
    }

    /// Number of ticks started so far. Diagnostics only.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Run one full pipeline pass: sample → decode → validate → dispatch.
    ///
    /// Always produces exactly one telemetry record, a valid JSON object
    /// even when every downstream step fails.
    pub async fn run_tick(&self) -> TickOutcome {
        let seq = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;

        let sample = self.sensor.read().await;
        let request = DecodeRequest {
            payload: sample.into_bytes(),
            fport: FRAME_PORT,
            endpoint: self.config.decoder.clone(),
        };

        let raw = self.client.call(&request).await;
        let record = ensure_json(&raw, &self.config.decoder, &request.payload);

        let outcome = match dispatch_record(self.sink.as_ref(), &record).await {
            Ok(()) => TickOutcome::Sent(record),
            Err(err) => {
                error!(tick = seq, error = %err, "Error sending message to output1");
                TickOutcome::DispatchFailed { record, error: err }
            }
        };
        info!(tick = seq, "Done");
        outcome
    }
}

/// Drive the pipeline until `shutdown` signals.
///
/// The first tick fires one full interval after start, then at that fixed
/// period measured on the scheduler's own clock. Tick units are spawned
/// independently and may overlap; no missed ticks are coalesced. After the
/// shutdown signal is observed no new ticks are scheduled, but in-flight
/// ticks run to completion.
pub async fn run(context: Arc<PipelineContext>, mut shutdown: watch::Receiver<bool>) {
    let period = Duration::from_millis(context.config.interval);
    let mut interval = time::interval_at(time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Burst);

    info!(
        interval_ms = context.config.interval,
        decoder = %context.config.decoder,
        "Pipeline scheduler started"
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let context = Arc::clone(&context);
                tokio::spawn(async move {
                    context.run_tick().await;
                });
            }
            changed = shutdown.changed() => {
                // A closed channel counts as shutdown too.
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!(ticks = context.ticks(), "Pipeline scheduler stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppResult;
    use async_trait::async_trait;

    struct FixedSample(String);

    #[async_trait]
    impl SampleSource for FixedSample {
        async fn read(&self) -> String {
            self.0.clone()
        }
    }

    struct RefusingSink;

    #[async_trait]
    impl MessageSink for RefusingSink {
        async fn send(&self, output: &str, _body: &[u8]) -> AppResult<()> {
            Err(SenderError::Dispatch {
                output: output.to_string(),
                message: "sink offline".into(),
            })
        }
    }

    fn test_config() -> PipelineConfig {
        PipelineConfig {
            interval: 2000,
            // Nothing listens here; decode calls fail fast.
            decoder: "http://127.0.0.1:9/api/temp".into(),
            request_timeout_ms: 500,
            log_level: "info".into(),
        }
    }

    #[tokio::test]
    async fn tick_produces_record_even_when_everything_fails() {
        let context = PipelineContext::new(
            test_config(),
            Arc::new(RefusingSink),
            Arc::new(FixedSample("21.5".into())),
        )
        .unwrap();

        let outcome = context.run_tick().await;
        match outcome {
            TickOutcome::DispatchFailed { record, error } => {
                assert!(record.is_object());
                assert!(record["error"].as_str().unwrap().contains("failed"));
                assert!(error.to_string().contains("sink offline"));
            }
            other => panic!("expected DispatchFailed, got {other:?}"),
        }
        assert_eq!(context.ticks(), 1);
    }

    #[tokio::test]
    async fn dispatch_failure_does_not_poison_later_ticks() {
        let context = PipelineContext::new(
            test_config(),
            Arc::new(RefusingSink),
            Arc::new(FixedSample("21.5".into())),
        )
        .unwrap();

        for _ in 0..3 {
            let outcome = context.run_tick().await;
            assert!(outcome.record().is_object());
        }
        assert_eq!(context.ticks(), 3);
    }
}
