//! Persisted client state.
//!
//! A small string key-value store standing in for browser local storage.
//! [`FileStorage`] keeps it across process runs, [`MemoryStorage`] does not.

use async_trait::async_trait;

use crate::Result;

mod entry;
pub use entry::EntryDump;

mod file;
pub use file::FileStorage;

mod memory;
pub use memory::MemoryStorage;

mod tokens;
pub use tokens::TokenStore;

/// Well known keys.
pub mod key {
    pub const ACCESS_TOKEN: &str = "accessToken";
    pub const REFRESH_TOKEN: &str = "refreshToken";
    pub const USER: &str = "user";
    pub const COLOR_SCHEME: &str = "mantine-color-scheme";
}

#[async_trait]
pub trait LocalStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>>;
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;
    async fn remove_item(&self, key: &str) -> Result<()>;
}
