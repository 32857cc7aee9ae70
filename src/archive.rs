//! Canonical JSON snapshots of fetched state, kept for history and diffing.

use std::sync::Arc;

use serde_json::Value;

use crate::canonical::canonicalize;
use crate::error::TiqResult;
use crate::store::FileStore;

const JSON_SUFFIX: &str = ".json";

/// Join a directory and a file name into a store key.
pub(crate) fn join_key(dir: &str, file: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        file.to_string()
    } else {
        format!("{dir}/{file}")
    }
}

/// File name for a snapshot: trailing `.json` suffixes are dropped and exactly
/// one is appended, so `main` and `main.json` land on the same key.
pub fn snapshot_file_name(name: &str) -> String {
    let mut stem = name;
    while let Some(stripped) = stem.strip_suffix(JSON_SUFFIX) {
        stem = stripped;
    }
    format!("{stem}{JSON_SUFFIX}")
}

/// Writes key-sorted, pretty-printed JSON under the history directory.
pub struct ArchiveWriter {
    store: Arc<dyn FileStore>,
    history_dir: String,
}

impl ArchiveWriter {
    pub fn new(store: Arc<dyn FileStore>, history_dir: impl Into<String>) -> Self {
        Self {
            store,
            history_dir: history_dir.into(),
        }
    }

    /// Store key the snapshot called `name` is written to.
    pub fn history_key(&self, name: &str) -> String {
        join_key(&self.history_dir, &snapshot_file_name(name))
    }

    /// Canonicalize `value` and overwrite the snapshot called `name`.
    /// Returns the key written.
    pub async fn archive(&self, name: &str, value: &Value) -> TiqResult<String> {
        let key = self.history_key(name);
        let rendered = serde_json::to_string_pretty(&canonicalize(value))?;
        self.store.write(&key, &rendered).await?;
        tracing::info!(key = %key, bytes = rendered.len(), "Archived snapshot");
        Ok(key)
    }
}
