//! HTTP decode round trip.
//!
//! The decoder runs in a separate container and exposes a plain GET
//! endpoint (`http://containername/api/decodername`). One call is made per
//! tick, with the raw sample and its frame port passed as query parameters.
//!
//! This module never raises past its own boundary: any HTTP-level or
//! transport-level failure is converted into a JSON-shaped error string
//! carrying the original payload base64-encoded, so the rest of the
//! pipeline always has *something* structured to forward.

use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, CONNECTION};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::error::AppResult;

/// One decode request, constructed fresh per tick and never reused.
#[derive(Debug, Clone)]
pub struct DecodeRequest {
    /// Raw sample bytes as read from the sensor.
    pub payload: Vec<u8>,
    /// Frame port carried as metadata to the decoder.
    pub fport: u32,
    /// Decoder endpoint URL, as configured (trailing `/` allowed).
    pub endpoint: String,
}

/// Client for the external decoder service.
///
/// Owns a single pooled [`reqwest::Client`] for connection reuse across
/// ticks. Connection reuse is an optimization only; every call stands on
/// its own.
#[derive(Debug, Clone)]
pub struct DecoderClient {
    http: reqwest::Client,
}

impl DecoderClient {
    /// Create a client whose calls are bounded by `timeout`.
    ///
    /// The explicit timeout keeps a slow or unresponsive decoder from
    /// accumulating unboundedly many overlapping in-flight calls.
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self { http })
    }

    /// Build the decode URL: normalized endpoint plus URL-encoded `fport`
    /// and `payload` query parameters.
    ///
    /// Exactly one trailing `/` is stripped from the endpoint, so the
    /// result has exactly one `/` before the query string regardless of
    /// how the endpoint was configured. The payload is interpreted as
    /// ASCII text for encoding purposes.
    pub fn decode_url(endpoint: &str, fport: u32, payload: &[u8]) -> String {
        let endpoint = endpoint.strip_suffix('/').unwrap_or(endpoint);
        let fport_encoded = urlencoding::encode(&fport.to_string()).into_owned();
        let payload_text = String::from_utf8_lossy(payload);
        let payload_encoded = urlencoding::encode(&payload_text).into_owned();
        format!("{endpoint}?fport={fport_encoded}&payload={payload_encoded}")
    }

    /// Perform one decode round trip.
    ///
    /// Returns the raw response body on success, or a synthesized
    /// JSON-shaped error string on any failure. Never returns an error.
    pub async fn call(&self, request: &DecodeRequest) -> String {
        let url = Self::decode_url(&request.endpoint, request.fport, &request.payload);

        debug!(%url, "Calling decoder function via HTTP");
        let started = Instant::now();
        let result = self.call_inner(&url, &request.payload).await;
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            received = %result,
            "Called decoder"
        );
        result
    }

    async fn call_inner(&self, url: &str, payload: &[u8]) -> String {
        let base64_payload = BASE64.encode(payload);

        match self.http.get(url).send().await {
            Ok(response) if response.status().is_success() => {
                match response.text().await {
                    Ok(body) => body,
                    // The connection dropped mid-body; same treatment as
                    // any other transport failure.
                    Err(err) => {
                        warn!(error = %err, "Error reading decoder response body");
                        transport_failure_body(url, &err.to_string(), &base64_payload)
                    }
                }
            }
            Ok(response) => {
                let body = response.text().await.unwrap_or_default();
                json!({
                    "error": format!("SensorDecoderModule '{url}' returned bad request."),
                    "exceptionMessage": body,
                    "rawpayload": base64_payload,
                })
                .to_string()
            }
            Err(err) => {
                warn!(error = %err, "Error in decoder handling");
                transport_failure_body(url, &err.to_string(), &base64_payload)
            }
        }
    }
}

fn transport_failure_body(url: &str, message: &str, base64_payload: &str) -> String {
    json!({
        "error": format!("Call to SensorDecoderModule '{url}' failed."),
        "exceptionMessage": message,
        "rawpayload": base64_payload,
    })
    .to_string()
}
