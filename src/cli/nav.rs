use clap::{ArgAction, Args};

use crate::cli::print_json;
use crate::config::Container;
use crate::navigation;
use crate::{AdminkitError, Result};

/// Print the navigation menu
#[derive(Args, Debug)]
pub struct NavCommand {
    /// Print the whole table without a session
    #[arg(long, action = ArgAction::SetTrue)]
    all: bool,
}

impl NavCommand {
    pub async fn run(self, container: Container) -> Result<()> {
        if self.all {
            return print_json(navigation::navigation_data());
        }

        let session = container.spawn_session();
        session.initialize().await?;
        let user = session.identity().await?.ok_or(AdminkitError::Unauthenticated)?;

        print_json(&navigation::visible_to(&user))
    }
}
