use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::cli::{login, logout, nav, refresh, storage, theme, whoami};
use crate::common::debug;
use crate::config::{Config, Container, Initializer};
use crate::Result;

/// Admin console session client
#[derive(Parser, Debug)]
#[command(version, propagate_version = true, subcommand_required = true)]
pub struct AdminkitCommand {
    /// Global options
    #[command(flatten)]
    pub options: GlobalOptions,
    /// Subcommand
    #[command(subcommand)]
    pub command: Command,
}

/// Global options
#[derive(Args, Debug)]
pub struct GlobalOptions {
    /// Configuration file path
    #[arg(long, short = 'C', env = "ADMINKIT_CONFIG_PATH", global = true)]
    pub config: Option<PathBuf>,
    /// Backend base url
    #[arg(long, env = "ADMINKIT_API_URL", global = true)]
    pub api_url: Option<String>,
    /// Tenant id sent with login
    #[arg(long, env = "ADMINKIT_TENANT_ID", global = true)]
    pub tenant: Option<String>,
    /// Application version
    #[arg(long, env = "ADMINKIT_APP_VERSION", global = true)]
    pub app_version: Option<String>,
    /// File where tokens and preferences are persisted
    #[arg(
        long,
        env = "ADMINKIT_STORAGE_PATH",
        default_value = ".adminkit/storage.log",
        global = true
    )]
    pub storage_path: PathBuf,
}

impl GlobalOptions {
    /// Build the container from the config file and flag overrides.
    pub async fn container(self) -> Result<Container> {
        let GlobalOptions {
            config,
            mut api_url,
            mut tenant,
            mut app_version,
            storage_path,
        } = self;

        let mut initializer = match config {
            Some(path) => Initializer::load_config_file(path).await?,
            None => Initializer::default(),
        };

        let mut overrides = {
            let mut config = Config::default();

            config.api.set_base_url(&mut api_url);
            config.tenant.set_id(&mut tenant);
            config.app.set_version(&mut app_version);
            config.storage.set_path(&mut Some(storage_path));
            config
        };

        initializer.override_merge(&mut overrides);

        debug!("{:?}", initializer);

        initializer.build().await
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Login and resolve the user identity
    Login(login::LoginCommand),
    /// Logout and clear persisted tokens
    Logout(logout::LogoutCommand),
    /// Exchange the refresh token for a new token pair
    Refresh(refresh::RefreshCommand),
    /// Print the signed in user
    Whoami(whoami::WhoamiCommand),
    /// Print the navigation menu
    Nav(nav::NavCommand),
    /// Print or toggle the color scheme
    Theme(theme::ThemeCommand),
    /// Inspect persisted storage
    Storage(storage::StorageCommand),
}

impl AdminkitCommand {
    pub async fn run(self) -> Result<()> {
        let AdminkitCommand { options, command } = self;

        match command {
            Command::Login(login) => login.run(options.container().await?).await,
            Command::Logout(logout) => logout.run(options.container().await?).await,
            Command::Refresh(refresh) => refresh.run(options.container().await?).await,
            Command::Whoami(whoami) => whoami.run(options.container().await?).await,
            Command::Nav(nav) => nav.run(options.container().await?).await,
            Command::Theme(theme) => theme.run(options.container().await?).await,
            Command::Storage(storage) => storage.run().await,
        }
    }
}

/// Parse command line args
pub fn parse() -> AdminkitCommand {
    AdminkitCommand::parse()
}
