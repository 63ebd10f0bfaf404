//! Sample acquisition.
//!
//! The physical sensor is an external collaborator; the pipeline only
//! needs "one opaque value per tick". The [`SampleSource`] trait is the
//! seam, and [`SimulatedSensor`] is the hardware-free implementation used
//! when no real device is wired in.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;

/// Produces one raw sample per tick.
#[async_trait]
pub trait SampleSource: Send + Sync {
    /// Read the current value. The returned string is the sample's wire
    /// form, passed to the decoder as ASCII text.
    async fn read(&self) -> String;
}

/// Simulated temperature-like sensor.
///
/// Emits a slowly wobbling reading around a fixed baseline so consecutive
/// ticks produce distinct, plausible values without any hardware.
#[derive(Debug, Default)]
pub struct SimulatedSensor {
    reads: AtomicU64,
}

impl SimulatedSensor {
    /// Create a new simulated sensor.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SampleSource for SimulatedSensor {
    async fn read(&self) -> String {
        let n = self.reads.fetch_add(1, Ordering::Relaxed);
        let wobble = ((Utc::now().timestamp() + n as i64) % 40) as f64 / 10.0;
        format!("{:.1}", 19.0 + wobble)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn readings_stay_in_plausible_range() {
        let sensor = SimulatedSensor::new();
        for _ in 0..50 {
            let value: f64 = sensor.read().await.parse().unwrap();
            assert!((19.0..23.0).contains(&value), "out of range: {value}");
        }
    }

    #[tokio::test]
    async fn readings_are_ascii_numeric_text() {
        let sensor = SimulatedSensor::new();
        let value = sensor.read().await;
        assert!(value.is_ascii());
        assert!(value.parse::<f64>().is_ok());
    }
}
