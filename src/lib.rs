#![allow(clippy::module_inception)]

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod navigation;
pub mod protocol;
pub mod storage;
pub mod theme;

pub use crate::error::AdminkitError;
pub type Result<T, E = crate::error::AdminkitError> = std::result::Result<T, E>;

pub use crate::core::{AppUser, SessionHandle, SessionState};
pub use protocol::AccessToken;

pub(crate) mod common {
    pub(crate) type Result<T, E = crate::error::internal::Error> = std::result::Result<T, E>;

    pub(crate) type ErrorKind = crate::error::internal::ErrorKind;

    pub use crate::error::AdminkitError;

    pub use tracing::{debug, error, info, trace, warn};
}
