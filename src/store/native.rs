//! Store backed by a real directory through `tokio::fs`.

use std::path::PathBuf;

use crate::error::TiqError;

use super::{FileStore, StoreFuture};

/// Keys resolve relative to `root`. Writes create missing parent directories.
pub struct NativeFileStore {
    root: PathBuf,
}

impl NativeFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &str) -> PathBuf {
        self.root.join(key.trim_start_matches('/'))
    }
}

impl FileStore for NativeFileStore {
    fn write<'a>(&'a self, key: &'a str, contents: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let full = self.resolve(key);
            if let Some(parent) = full.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&full, contents).await?;
            Ok(())
        })
    }

    fn read_to_string<'a>(&'a self, key: &'a str) -> StoreFuture<'a, String> {
        Box::pin(async move { Ok(tokio::fs::read_to_string(self.resolve(key)).await?) })
    }

    fn exists<'a>(&'a self, key: &'a str) -> StoreFuture<'a, bool> {
        Box::pin(async move { Ok(tokio::fs::try_exists(self.resolve(key)).await?) })
    }

    fn list<'a>(&'a self, dir: &'a str) -> StoreFuture<'a, Vec<String>> {
        Box::pin(async move {
            let full = self.resolve(dir);
            let mut names = Vec::new();
            let mut reader = match tokio::fs::read_dir(&full).await {
                Ok(reader) => reader,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
                Err(e) => return Err(TiqError::Io(e)),
            };
            while let Some(entry) = reader.next_entry().await? {
                if entry.file_type().await?.is_file() {
                    names.push(entry.file_name().to_string_lossy().to_string());
                }
            }
            names.sort();
            Ok(names)
        })
    }
}
