use clap::Args;
use serde_json::json;

use crate::cli::print_json;
use crate::config::Container;
use crate::Result;

/// Refresh tokens
#[derive(Args, Debug)]
pub struct RefreshCommand {}

impl RefreshCommand {
    pub async fn run(self, container: Container) -> Result<()> {
        let session = container.spawn_session();
        session.initialize().await?;

        let token = session.refresh().await?;

        // Tokens stay in storage.
        print_json(&json!({
            "tokenType": token.token_type,
            "expiresIn": token.expires_in,
        }))
    }
}
