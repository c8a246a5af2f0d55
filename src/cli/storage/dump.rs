use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use clap::{ArgAction, Args};
use serde_json::json;

use crate::storage::{key, EntryDump, FileStorage};
use crate::Result;

/// Dump storage log
#[derive(Args, Debug)]
pub struct DumpCommand {
    /// Path to storage file
    #[arg()]
    path: PathBuf,

    /// Print token values instead of masking them
    #[arg(long, action = ArgAction::SetTrue)]
    reveal: bool,
}

impl DumpCommand {
    pub async fn run(self) -> Result<()> {
        let DumpCommand { path, reveal } = self;

        tracing::debug!("Dump {}", path.display());

        let mut entries = Vec::new();
        FileStorage::dump(&path, |entry| entries.push(dump(entry, reveal))).await?;

        crate::cli::print_json(&json!({ "entries": entries }))
    }
}

fn dump(entry: EntryDump, reveal: bool) -> serde_json::Value {
    let time = Utc
        .timestamp_millis_opt(entry.timestamp_ms)
        .single()
        .map(|t| t.to_rfc3339());
    let is_secret = entry.key == key::ACCESS_TOKEN || entry.key == key::REFRESH_TOKEN;
    let value = match entry.value {
        Some(_) if is_secret && !reveal => Some("***".to_owned()),
        value => value,
    };

    json!({
        "time": time,
        "is_deleted": entry.is_deleted,
        "key": entry.key,
        "value": value,
    })
}
