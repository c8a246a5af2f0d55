use std::path::PathBuf;

use serde::Deserialize;

use crate::auth::TenantContext;
use crate::client::http;
use crate::config::app;
use crate::core;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub app: AppConfig,
    pub api: http::Config,
    pub tenant: TenantContext,
    pub session: core::Config,
    pub storage: StorageConfig,
}

impl Config {
    pub(crate) fn override_merge(&mut self, other: &mut Config) {
        self.app.override_merge(&mut other.app);
        self.api.override_merge(&mut other.api);
        self.tenant.override_merge(&mut other.tenant);
        self.session.override_merge(&mut other.session);
        self.storage.override_merge(&mut other.storage);
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct AppConfig {
    name: Option<String>,
    version: Option<String>,
}

impl AppConfig {
    pub fn set_name(&mut self, val: &mut Option<String>) {
        if let Some(val) = val.take() {
            self.name = Some(val)
        }
    }
    pub fn set_version(&mut self, val: &mut Option<String>) {
        if let Some(val) = val.take() {
            self.version = Some(val)
        }
    }
    pub(crate) fn override_merge(&mut self, other: &mut AppConfig) {
        self.set_name(&mut other.name);
        self.set_version(&mut other.version);
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(app::APP_NAME)
    }

    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(app::APP_VERSION)
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct StorageConfig {
    // Memory storage when unset.
    path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn set_path(&mut self, val: &mut Option<PathBuf>) {
        if let Some(val) = val.take() {
            self.path = Some(val)
        }
    }
    pub(crate) fn override_merge(&mut self, other: &mut StorageConfig) {
        self.set_path(&mut other.path);
    }

    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }
}
