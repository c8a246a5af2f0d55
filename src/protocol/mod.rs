//! REST contract consumed by the console.
//!
//! Paths are relative to the configured api base url. Request bodies are
//! camelCase json, the shape the auth backend expects.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod endpoint {
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const REFRESH: &str = "/api/v1/auth/refresh";
    pub const LOGOUT: &str = "/api/v1/auth/logout";
    pub const USERS: &str = "/api/v1/users";
}

pub mod header {
    pub const TENANT_ID: &str = "X-TENANT-ID";
    pub const AUTHORIZATION: &str = "Authorization";
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remember_me: Option<bool>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RefreshRequest {
    pub token: String,
}

// Access/refresh token pair returned by login and refresh.
#[derive(Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    #[serde(alias = "access_token")]
    pub access_token: String,
    #[serde(alias = "refresh_token", default)]
    pub refresh_token: Option<String>,
    #[serde(alias = "token_type", default)]
    pub token_type: Option<String>,
    #[serde(alias = "expires_in", default)]
    pub expires_in: Option<u64>,
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: Some(refresh_token.into()),
            token_type: None,
            expires_in: None,
        }
    }
}

// Tokens never reach the logs.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"***")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// User record served by the profile service.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    // Base64 encoded.
    pub avatar: Option<String>,
    pub is_administrator: bool,
    pub account_deactivated: bool,
}

/// Error body some backends attach to failed responses.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub(crate) struct ErrorBody {
    pub(crate) message: Option<String>,
    pub(crate) error: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}
