use std::collections::HashMap;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncSeekExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

use crate::common::{debug, info, warn, Result};
use crate::storage::entry::{Entry, EntryDump};
use crate::storage::LocalStorage;

/// Append-only log file with an in-memory view of the live items.
///
/// Opening replays the log. A truncated tail (interrupted write) ends the
/// replay; the next append overwrites it.
pub struct FileStorage {
    path: PathBuf,
    inner: Mutex<Inner>,
}

struct Inner {
    file: fs::File,
    items: HashMap<String, String>,
}

impl FileStorage {
    pub async fn open(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)
            .await?;

        let (items, valid_len) = FileStorage::replay(&mut file).await?;
        info!(path=%path.display(), items=items.len(), "Open storage");

        // Drop a partially written tail so new entries stay decodable.
        let file_len = file.metadata().await?.len();
        if file_len > valid_len {
            warn!(
                path=%path.display(),
                discarded=file_len - valid_len,
                "Truncate incomplete storage entry"
            );
            file.set_len(valid_len).await?;
        }
        file.seek(SeekFrom::Start(valid_len)).await?;

        Ok(Self {
            path,
            inner: Mutex::new(Inner { file, items }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Read every entry of the log at path, deleted ones included.
    pub async fn dump<F>(path: impl AsRef<Path>, mut f: F) -> crate::Result<()>
    where
        F: FnMut(EntryDump),
    {
        let file = fs::File::open(path.as_ref()).await?;
        let mut reader = BufReader::new(file);
        loop {
            match Entry::decode_from(&mut reader).await {
                Ok((_, entry)) => f(entry.dump()),
                Err(err) if err.is_eof() => return Ok(()),
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn replay(file: &mut fs::File) -> Result<(HashMap<String, String>, u64)> {
        let mut items = HashMap::new();
        let mut pos: u64 = 0;
        let mut reader = BufReader::new(file);
        loop {
            match Entry::decode_from(&mut reader).await {
                Ok((n, entry)) => {
                    let is_active = entry.is_active();
                    let (key, value) = entry.take_key_value();
                    match value {
                        Some(value) if is_active => {
                            items.insert(key, value);
                        }
                        _ => {
                            items.remove(&key);
                        }
                    }
                    pos += n as u64;
                }
                Err(err) if err.is_eof() => {
                    return Ok((items, pos));
                }
                Err(err) => {
                    return Err(err);
                }
            }
        }
    }

    async fn append(inner: &mut Inner, entry: Entry) -> Result<()> {
        let mut buf = Vec::new();
        entry.encode_to(&mut buf).await?;

        inner.file.write_all(&buf).await?;
        inner.file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl LocalStorage for FileStorage {
    async fn get_item(&self, key: &str) -> crate::Result<Option<String>> {
        let inner = self.inner.lock().await;
        Ok(inner.items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> crate::Result<()> {
        let entry = Entry::active(key, value)?;
        let mut inner = self.inner.lock().await;
        FileStorage::append(&mut inner, entry).await?;
        inner.items.insert(key.to_owned(), value.to_owned());
        debug!(key, "Set item");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> crate::Result<()> {
        let mut inner = self.inner.lock().await;
        if !inner.items.contains_key(key) {
            return Ok(());
        }
        FileStorage::append(&mut inner, Entry::deleted(key)).await?;
        inner.items.remove(key);
        debug!(key, "Remove item");
        Ok(())
    }
}
