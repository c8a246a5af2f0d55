use async_trait::async_trait;

use crate::protocol::AccessToken;
use crate::Result;

mod app;
pub use app::AppAuthenticator;

mod tenant;
pub use tenant::TenantContext;

mod user_service;
pub use user_service::{RemoteUserService, UserService};

/// Login, refresh and logout against the auth backend.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<AccessToken>;

    async fn refresh_token(&self, refresh_token: &str) -> Result<AccessToken>;

    /// Best effort server side invalidation, then clear local tokens.
    /// Local tokens are cleared even when the server call fails.
    async fn logout(&self) -> Result<()>;
}
