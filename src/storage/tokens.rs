use std::sync::Arc;

use crate::protocol::AccessToken;
use crate::storage::{key, LocalStorage};
use crate::Result;

/// Typed access to the session keys of local storage.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn LocalStorage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }

    pub async fn access_token(&self) -> Result<Option<String>> {
        self.storage.get_item(key::ACCESS_TOKEN).await
    }

    pub async fn refresh_token(&self) -> Result<Option<String>> {
        self.storage.get_item(key::REFRESH_TOKEN).await
    }

    pub async fn save(&self, token: &AccessToken) -> Result<()> {
        self.storage
            .set_item(key::ACCESS_TOKEN, &token.access_token)
            .await?;
        match &token.refresh_token {
            Some(refresh_token) => {
                self.storage
                    .set_item(key::REFRESH_TOKEN, refresh_token)
                    .await
            }
            // Refresh endpoints may rotate only the access token.
            None => Ok(()),
        }
    }

    // Remove both tokens.
    pub async fn clear(&self) -> Result<()> {
        self.storage.remove_item(key::ACCESS_TOKEN).await?;
        self.storage.remove_item(key::REFRESH_TOKEN).await
    }

    pub async fn username(&self) -> Result<Option<String>> {
        self.storage.get_item(key::USER).await
    }

    pub async fn save_username(&self, username: &str) -> Result<()> {
        self.storage.set_item(key::USER, username).await
    }

    pub async fn clear_username(&self) -> Result<()> {
        self.storage.remove_item(key::USER).await
    }
}
