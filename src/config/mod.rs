mod initialize;
pub use initialize::{Container, Initializer};

mod config;
pub use config::{AppConfig, Config, StorageConfig};

pub mod env {
    /// Tracing filter directive.
    pub const LOG_DIRECTIVE: &str = "ADMINKIT_LOG";
    pub const API_URL: &str = "ADMINKIT_API_URL";
    pub const APP_VERSION: &str = "ADMINKIT_APP_VERSION";
    pub const TENANT_ID: &str = "ADMINKIT_TENANT_ID";
    pub const CONFIG_PATH: &str = "ADMINKIT_CONFIG_PATH";
    pub const STORAGE_PATH: &str = "ADMINKIT_STORAGE_PATH";
}

pub mod app {
    pub const APP_NAME: &str = "Admin Console";
    pub const APP_VERSION: &str = "1.0.0";
    /// Rows per page for list views.
    pub const DEFAULT_PAGE_SIZE: usize = 20;
}
