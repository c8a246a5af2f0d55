use clap::Args;
use serde_json::json;

use crate::cli::print_json;
use crate::config::Container;
use crate::{AdminkitError, Result};

/// Print the signed in user
#[derive(Args, Debug)]
pub struct WhoamiCommand {}

impl WhoamiCommand {
    pub async fn run(self, container: Container) -> Result<()> {
        let session = container.spawn_session();
        let state = session.initialize().await?;

        let user = session.identity().await?.ok_or(AdminkitError::Unauthenticated)?;

        print_json(&json!({
            "state": state,
            "app": container.config().app.name(),
            "version": container.config().app.version(),
            "user": user,
        }))
    }
}
