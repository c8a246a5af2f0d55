use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::client::{ApiClient, ApiRequest, Method};
use crate::common::{debug, trace};
use crate::protocol::ErrorBody;
use crate::{AdminkitError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

// Api client configuration.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    // Backend base url. e.g. https://api.example.com
    base_url: Option<String>,
    // Timeout applied to every request.
    request_timeout_ms: Option<u64>,
}

impl Config {
    const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

    pub fn set_base_url(&mut self, val: &mut Option<String>) {
        if let Some(val) = val.take() {
            self.base_url = Some(val)
        }
    }
    pub fn set_request_timeout_ms(&mut self, val: Option<u64>) {
        if let Some(val) = val {
            self.request_timeout_ms = Some(std::cmp::max(val, 1));
        }
    }
    pub(crate) fn override_merge(&mut self, other: &mut Config) {
        self.set_base_url(&mut other.base_url);
        self.set_request_timeout_ms(other.request_timeout_ms);
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(
            self.request_timeout_ms
                .unwrap_or(Config::DEFAULT_REQUEST_TIMEOUT_MS),
        )
    }

    // Backends on localhost are development instances.
    pub fn is_development(&self) -> bool {
        self.base_url().contains("localhost")
    }
}

/// reqwest backed [`ApiClient`].
pub struct HttpClient {
    base_url: String,
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &Config) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self::with_client(config.base_url(), inner))
    }

    pub fn with_client(base_url: impl Into<String>, inner: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url, inner }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ApiClient for HttpClient {
    async fn send(&self, request: ApiRequest) -> Result<serde_json::Value> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.inner.get(&url),
            Method::Post => self.inner.post(&url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let start = tokio::time::Instant::now();
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        debug!(method=?request.method, path=%request.path, %status, elapsed=?start.elapsed(), "Api request done");

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(ErrorBody::into_message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_owned());

            return Err(AdminkitError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            trace!(path=%request.path, "Empty response body");
            return Ok(serde_json::Value::Null);
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = Config::default();

        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.is_development());
    }

    #[test]
    fn override_merge() {
        let mut config = Config::default();
        let mut other = Config::default();
        other.set_base_url(&mut Some("https://api.example.com".to_owned()));
        other.set_request_timeout_ms(Some(0));

        config.override_merge(&mut other);

        assert_eq!(config.base_url(), "https://api.example.com");
        assert_eq!(config.request_timeout(), Duration::from_millis(1));
        assert!(!config.is_development());
    }

    #[test]
    fn trailing_slash_base_url() {
        let client = HttpClient::with_client("http://127.0.0.1:8080/", reqwest::Client::new());

        assert_eq!(
            client.url("/api/v1/auth/login"),
            "http://127.0.0.1:8080/api/v1/auth/login"
        );
    }
}
