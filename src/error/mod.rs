pub(crate) mod internal;

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum AdminkitError {
    // Operation requires an authenticated session.
    Unauthenticated,
    // Credentials or refresh token rejected by the auth endpoints.
    Authentication { message: String },
    // Non-success http response.
    Status { status: u16, message: String },
    Transport(reqwest::Error),
    Decode(serde_json::Error),
    Io(io::Error),
    Config { description: String },
    // Session task is gone.
    SessionClosed,
    Internal(internal::Error),
}

impl AdminkitError {
    pub(crate) fn authentication(message: impl Into<String>) -> Self {
        AdminkitError::Authentication {
            message: message.into(),
        }
    }

    pub(crate) fn config(description: impl Into<String>) -> Self {
        AdminkitError::Config {
            description: description.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AdminkitError::Status { status, .. } => Some(*status),
            AdminkitError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    // 401 or 403 from the backend.
    pub fn is_authorization_failure(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

impl fmt::Display for AdminkitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AdminkitError::Unauthenticated => write!(f, "unauthenticated"),
            AdminkitError::Authentication { message } => {
                write!(f, "authentication failed. {}", message)
            }
            AdminkitError::Status { status, message } => {
                write!(f, "request failed with status {}. {}", status, message)
            }
            AdminkitError::Transport(err) => write!(f, "transport error. {}", err),
            AdminkitError::Decode(err) => write!(f, "decode error. {}", err),
            AdminkitError::Io(err) => err.fmt(f),
            AdminkitError::Config { description } => {
                write!(f, "invalid configuration. {}", description)
            }
            AdminkitError::SessionClosed => write!(f, "session closed"),
            AdminkitError::Internal(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for AdminkitError {}

impl From<reqwest::Error> for AdminkitError {
    fn from(err: reqwest::Error) -> Self {
        AdminkitError::Transport(err)
    }
}

impl From<serde_json::Error> for AdminkitError {
    fn from(err: serde_json::Error) -> Self {
        AdminkitError::Decode(err)
    }
}

impl From<io::Error> for AdminkitError {
    fn from(err: io::Error) -> Self {
        AdminkitError::Io(err)
    }
}

impl From<internal::Error> for AdminkitError {
    fn from(err: internal::Error) -> Self {
        AdminkitError::Internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_failure() {
        let unauthorized = AdminkitError::Status {
            status: 401,
            message: String::new(),
        };
        let forbidden = AdminkitError::Status {
            status: 403,
            message: String::new(),
        };
        let unavailable = AdminkitError::Status {
            status: 503,
            message: String::new(),
        };

        assert!(unauthorized.is_authorization_failure());
        assert!(forbidden.is_authorization_failure());
        assert!(!unavailable.is_authorization_failure());
        assert!(!AdminkitError::Unauthenticated.is_authorization_failure());
    }
}
