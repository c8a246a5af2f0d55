use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::protocol::header;
use crate::Result;

pub mod http;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A call against the rest backend.
///
/// Requests never carry a bearer token implicitly; callers that need one
/// attach it with [`ApiRequest::bearer`].
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            headers: Vec::new(),
            body: Some(serde_json::to_value(body)?),
        })
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn bearer(self, access_token: &str) -> Self {
        self.header(header::AUTHORIZATION, format!("Bearer {}", access_token))
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// Bodies and headers hold credentials.
impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Send request and return the decoded json body.
    /// Empty bodies decode to `Value::Null`, non-success statuses are errors.
    async fn send(&self, request: ApiRequest) -> Result<serde_json::Value>;
}

pub(crate) fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(Into::into)
}
