mod dump;

use crate::Result;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct StorageCommand {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Dump storage log entries
    Dump(dump::DumpCommand),
}

impl StorageCommand {
    pub async fn run(self) -> Result<()> {
        let StorageCommand { command } = self;

        match command {
            Command::Dump(dump) => dump.run().await,
        }
    }
}
