//! HTTP client for the FleetDeck backend

use fleetdeck_core::{API_BASE_PATH, REQUEST_TIMEOUT_SECS};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ApiError, Result};

/// Strip a `{ "data": ... }` envelope if present and non-null
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if !data.is_null() => data,
            Some(data) => {
                map.insert("data".to_string(), data);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Thin JSON client rooted at `{endpoint}/api/v1`.
///
/// Every call issues exactly one request. There is no retry.
#[derive(Debug, Clone)]
pub struct ApiClient {
    endpoint: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_timeout(endpoint, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self::with_client(endpoint, client)
    }

    /// Create with a custom HTTP client (useful for testing)
    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self { endpoint, client }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Full URL for an API path such as `/hosts`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.endpoint, API_BASE_PATH, path)
    }

    /// GET and return the unwrapped JSON body, failing on any transport,
    /// status or parse error
    pub async fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        Ok(unwrap_envelope(body))
    }

    /// GET `path` and decode it as `T`, or hand back `fallback` on any failure
    pub async fn fetch_or<T: DeserializeOwned>(&self, path: &str, fallback: T) -> T {
        match self.get_json(path).await {
            Ok(value) => match serde_json::from_value(value) {
                Ok(decoded) => decoded,
                Err(e) => {
                    warn!("Unexpected response shape for {}, using fallback: {}", path, e);
                    fallback
                }
            },
            Err(e) => {
                debug!("Request for {} failed, using fallback: {}", path, e);
                fallback
            }
        }
    }

    /// POST and return the unwrapped JSON body; an empty body reads as null
    pub async fn post(&self, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = self.url(path);
        debug!("POST {}", url);

        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("POST {} returned {}", url, status);
            return match status.as_u16() {
                404 => Err(ApiError::NotFound(path.to_string())),
                409 => Err(ApiError::Conflict(text)),
                code => Err(ApiError::Status { status: code, body: text }),
            };
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        let body: Value = serde_json::from_str(&text)?;
        Ok(unwrap_envelope(body))
    }

    /// POST where the outcome does not matter; every failure is swallowed
    pub async fn post_best_effort(&self, path: &str) {
        if let Err(e) = self.post(path, None).await {
            debug!("Ignoring failed POST {}: {}", path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope() {
        assert_eq!(unwrap_envelope(json!({"data": [1, 2]})), json!([1, 2]));
        assert_eq!(unwrap_envelope(json!([1, 2])), json!([1, 2]));
        assert_eq!(
            unwrap_envelope(json!({"hostname": "lb-01"})),
            json!({"hostname": "lb-01"})
        );
    }

    #[test]
    fn test_null_data_keeps_whole_body() {
        let body = json!({"data": null, "total": 0});
        assert_eq!(unwrap_envelope(body.clone()), body);
    }

    #[test]
    fn test_url_joins_base_path() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.endpoint(), "http://localhost:8080");
        assert_eq!(client.url("/hosts"), "http://localhost:8080/api/v1/hosts");
    }
}
