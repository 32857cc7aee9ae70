//! In-memory store for tests.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::error::TiqError;

use super::{FileStore, StoreFuture};

/// Blobs kept in a `BTreeMap`, keyed by normalized path.
#[derive(Default)]
pub struct MemoryFileStore {
    files: RwLock<BTreeMap<String, String>>,
    rejected_prefix: Option<String>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write under `dir` fail with a permission error.
    pub fn reject_writes_under(mut self, dir: impl Into<String>) -> Self {
        self.rejected_prefix = Some(format!("{}/", normalize(&dir.into())));
        self
    }

    /// Snapshot of every stored key and blob.
    pub async fn entries(&self) -> BTreeMap<String, String> {
        self.files.read().await.clone()
    }
}

fn normalize(key: &str) -> String {
    key.trim_matches('/').to_string()
}

fn not_found(key: &str) -> TiqError {
    TiqError::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("No such key: {key}"),
    ))
}

impl FileStore for MemoryFileStore {
    fn write<'a>(&'a self, key: &'a str, contents: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let key = normalize(key);
            if let Some(prefix) = &self.rejected_prefix {
                if key.starts_with(prefix.as_str()) {
                    return Err(TiqError::Io(std::io::Error::new(
                        std::io::ErrorKind::PermissionDenied,
                        format!("Write rejected: {key}"),
                    )));
                }
            }
            self.files.write().await.insert(key, contents.to_string());
            Ok(())
        })
    }

    fn read_to_string<'a>(&'a self, key: &'a str) -> StoreFuture<'a, String> {
        Box::pin(async move {
            let key = normalize(key);
            self.files
                .read()
                .await
                .get(&key)
                .cloned()
                .ok_or_else(|| not_found(&key))
        })
    }

    fn exists<'a>(&'a self, key: &'a str) -> StoreFuture<'a, bool> {
        Box::pin(async move { Ok(self.files.read().await.contains_key(&normalize(key))) })
    }

    fn list<'a>(&'a self, dir: &'a str) -> StoreFuture<'a, Vec<String>> {
        Box::pin(async move {
            let dir = normalize(dir);
            let prefix = if dir.is_empty() {
                String::new()
            } else {
                format!("{dir}/")
            };
            let files = self.files.read().await;
            Ok(files
                .keys()
                .filter_map(|key| key.strip_prefix(prefix.as_str()))
                .filter(|rest| !rest.contains('/'))
                .map(str::to_string)
                .collect())
        })
    }
}
