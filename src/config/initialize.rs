use std::path::Path;
use std::sync::Arc;

use tokio::fs;

use crate::auth::{AppAuthenticator, Authenticator, RemoteUserService, TenantContext, UserService};
use crate::client::http::HttpClient;
use crate::client::ApiClient;
use crate::common::{self, debug, info};
use crate::config::Config;
use crate::core::{self, SessionHandle};
use crate::storage::{FileStorage, LocalStorage, MemoryStorage, TokenStore};
use crate::{AdminkitError, Result};

#[derive(Debug, Default)]
pub struct Initializer {
    pub config: Config,
}

impl Initializer {
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    pub async fn load_config_file(path: impl AsRef<Path>) -> common::Result<Self> {
        let f = fs::File::open(path).await?;
        let config = serde_yaml::from_reader::<_, Config>(f.into_std().await)?;

        Ok(Self { config })
    }

    // Values set in other win over the loaded file.
    pub fn override_merge(&mut self, other: &mut Config) {
        self.config.override_merge(other);
    }

    /// Wire the services described by the configuration.
    pub async fn build(self) -> Result<Container> {
        let Initializer { config } = self;
        debug!(?config, "Build container");

        let base_url = config.api.base_url();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AdminkitError::config(format!(
                "api base url must be http(s). {}",
                base_url
            )));
        }
        if config.api.is_development() {
            debug!(base_url, "Development backend");
        }

        let api: Arc<dyn ApiClient> = Arc::new(HttpClient::new(&config.api)?);

        let storage: Arc<dyn LocalStorage> = match config.storage.path() {
            Some(path) => {
                info!(path=%path.display(), "Open file storage");
                Arc::new(FileStorage::open(path).await?)
            }
            None => Arc::new(MemoryStorage::new()),
        };

        Ok(Container::new(api, storage, config))
    }
}

/// Explicit composition root. Owns the shared services of one console.
#[derive(Clone)]
pub struct Container {
    config: Config,
    storage: Arc<dyn LocalStorage>,
    tokens: TokenStore,
    authenticator: Arc<dyn Authenticator>,
    users: Arc<dyn UserService>,
}

impl Container {
    pub fn new(api: Arc<dyn ApiClient>, storage: Arc<dyn LocalStorage>, config: Config) -> Self {
        let tokens = TokenStore::new(storage.clone());
        let authenticator = Arc::new(AppAuthenticator::new(
            api.clone(),
            config.tenant.clone(),
            tokens.clone(),
        ));
        let users = Arc::new(RemoteUserService::new(api));

        Self {
            config,
            storage,
            tokens,
            authenticator,
            users,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> Arc<dyn LocalStorage> {
        self.storage.clone()
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn tenant(&self) -> &TenantContext {
        &self.config.tenant
    }

    pub fn authenticator(&self) -> Arc<dyn Authenticator> {
        self.authenticator.clone()
    }

    pub fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    /// Start the session task on the current runtime.
    pub fn spawn_session(&self) -> SessionHandle {
        core::Builder::new(
            self.authenticator.clone(),
            self.users.clone(),
            self.tokens.clone(),
        )
        .config(self.config.session.clone())
        .spawn()
    }
}
