//! `reqwest` implementation of the HTTP GET collaborator.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use tracing::{debug, instrument, warn};

use deposit_core::{Error, JsonFetcher, QueryParams, Result};

/// Flatten query parameters into key/value pairs.
///
/// Strings go out verbatim, other scalars in their JSON spelling, arrays as
/// one pair per element, objects as JSON text. Nulls are dropped.
pub fn encode_params(params: &QueryParams) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        match value {
            JsonValue::Null => {}
            JsonValue::Array(items) => {
                for item in items {
                    if let Some(encoded) = encode_scalar(item) {
                        pairs.push((key.clone(), encoded));
                    }
                }
            }
            other => {
                if let Some(encoded) = encode_scalar(other) {
                    pairs.push((key.clone(), encoded));
                }
            }
        }
    }
    pairs
}

fn encode_scalar(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// JSON fetcher backed by a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher {
    client: Client,
    timeout: Option<Duration>,
}

impl ReqwestFetcher {
    /// Fetcher without a request timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetcher that aborts requests running longer than `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    /// Reuse an existing client, e.g. one carrying session cookies.
    pub fn with_client(client: Client, timeout: Option<Duration>) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl JsonFetcher for ReqwestFetcher {
    #[instrument(skip(self, params), fields(subsystem = "http", op = "get_json", param_count = params.len()))]
    async fn get_json(&self, url: &str, params: &QueryParams) -> Result<JsonValue> {
        let start = Instant::now();

        let mut request = self.client.get(url).query(&encode_params(params));
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Endpoint returned an error status");
            return Err(Error::Request(format!(
                "{} returned {}: {}",
                url, status, body
            )));
        }

        let body = response.text().await?;
        debug!(
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            response_len = body.len(),
            "GET complete"
        );
        Ok(serde_json::from_str(&body)?)
    }
}
