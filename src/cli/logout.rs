use clap::Args;

use crate::config::Container;
use crate::Result;

/// Logout
#[derive(Args, Debug)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub async fn run(self, container: Container) -> Result<()> {
        let session = container.spawn_session();
        session.logout().await?;

        println!("Logged out");
        Ok(())
    }
}
