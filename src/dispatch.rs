//! Outbound message dispatch.
//!
//! The upstream hub connection is an external collaborator reached through
//! the [`MessageSink`] trait: one structured document per tick, sent on a
//! fixed named output channel. The adapter here owns serialization (UTF-8
//! bytes of the record's canonical JSON text) and failure reporting; it
//! never retries, and a failed dispatch does not disturb later ticks.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::error::{AppResult, SenderError};

/// The named output channel every telemetry record is sent on.
pub const OUTPUT_CHANNEL: &str = "output1";

/// Accepts finished telemetry documents for upstream delivery.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Send one message body on the named output channel.
    async fn send(&self, output: &str, body: &[u8]) -> AppResult<()>;
}

/// Serialize `record` and hand it to the sink on [`OUTPUT_CHANNEL`].
pub async fn dispatch_record(sink: &dyn MessageSink, record: &Value) -> AppResult<()> {
    let body = record.to_string();
    sink.send(OUTPUT_CHANNEL, body.as_bytes()).await?;
    info!(message = %body, "Message sent to {OUTPUT_CHANNEL}");
    Ok(())
}

/// Sink that logs each outbound message instead of delivering it.
///
/// Stands in for the hub connection when the process runs detached from
/// any upstream, keeping the pipeline observable end to end.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl MessageSink for LogSink {
    async fn send(&self, output: &str, body: &[u8]) -> AppResult<()> {
        let text = std::str::from_utf8(body).map_err(|err| SenderError::Dispatch {
            output: output.to_string(),
            message: err.to_string(),
        })?;
        info!(%output, %text, "Outbound message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<(String, Vec<u8>)>>,
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        async fn send(&self, output: &str, body: &[u8]) -> AppResult<()> {
            self.sent
                .lock()
                .unwrap()
                .push((output.to_string(), body.to_vec()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn record_is_sent_as_utf8_json_on_output1() {
        let sink = RecordingSink::default();
        let record = json!({"temp": 21.5});

        dispatch_record(&sink, &record).await.unwrap();

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (output, body) = &sent[0];
        assert_eq!(output, OUTPUT_CHANNEL);
        let round_trip: Value = serde_json::from_slice(body).unwrap();
        assert_eq!(round_trip, record);
    }
}
