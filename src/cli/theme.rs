use clap::{ArgAction, Args};

use crate::cli::print_json;
use crate::config::Container;
use crate::theme::ColorScheme;
use crate::Result;

/// Print the active theme
#[derive(Args, Debug)]
pub struct ThemeCommand {
    /// Switch between light and dark first
    #[arg(long, action = ArgAction::SetTrue)]
    toggle: bool,
}

impl ThemeCommand {
    pub async fn run(self, container: Container) -> Result<()> {
        let storage = container.storage();

        let scheme = if self.toggle {
            ColorScheme::toggle_persisted(storage.as_ref()).await?
        } else {
            ColorScheme::load(storage.as_ref()).await?
        };

        print_json(scheme.theme())
    }
}
