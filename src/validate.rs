//! Telemetry record validation.
//!
//! Last line of defense before dispatch: whatever string the decoder call
//! produced, what leaves the pipeline is always a well-formed JSON object.
//! The decoder client's own synthesized failure strings are valid JSON and
//! pass through here untouched, keeping their `error` / `exceptionMessage`
//! / `rawpayload` fields intact.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Map, Value};

/// Parse `raw` as a JSON object, or synthesize an error record.
///
/// On parse failure the returned record is
/// `{"error": "Invalid JSON returned from '<endpoint>'", "rawpayload": <base64>}`
/// where `endpoint` is the configured decoder endpoint (as given, before
/// trailing-slash normalization) and the payload is the original sample.
pub fn ensure_json(raw: &str, endpoint: &str, payload: &[u8]) -> Value {
    match serde_json::from_str::<Map<String, Value>>(raw) {
        Ok(object) => Value::Object(object),
        Err(_) => json!({
            "error": format!("Invalid JSON returned from '{endpoint}'"),
            "rawpayload": BASE64.encode(payload),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_object_passes_through_unchanged() {
        let record = ensure_json(r#"{"temp": 21.5}"#, "http://decoder/api", b"21.5");
        assert_eq!(record, json!({"temp": 21.5}));
    }

    #[test]
    fn synthesized_decoder_failure_passes_through() {
        let raw = json!({
            "error": "Call to SensorDecoderModule 'http://decoder/api?fport=1&payload=1' failed.",
            "exceptionMessage": "connection refused",
            "rawpayload": BASE64.encode(b"1"),
        })
        .to_string();
        let record = ensure_json(&raw, "http://decoder/api", b"1");
        assert_eq!(record["exceptionMessage"], "connection refused");
        assert!(record["error"].as_str().unwrap().contains("failed"));
    }

    #[test]
    fn garbage_body_becomes_invalid_json_record() {
        let record = ensure_json("<html>oops</html>", "http://decoder/api/", b"23.4");
        assert_eq!(
            record["error"],
            "Invalid JSON returned from 'http://decoder/api/'"
        );
        assert_eq!(
            BASE64.decode(record["rawpayload"].as_str().unwrap()).unwrap(),
            b"23.4"
        );
    }

    #[test]
    fn non_object_json_is_rejected() {
        // A bare number parses as JSON but is not a structured document.
        let record = ensure_json("42", "http://decoder/api", b"42");
        assert!(record["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON returned from"));
    }
}
