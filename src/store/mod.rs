//! Durable key-value file store where snapshots and scripts are written.
//!
//! Keys are logical, forward-slash separated paths relative to the store
//! root. [`NativeFileStore`] maps them onto a real directory (behind the
//! `native` feature) and [`MemoryFileStore`] keeps them in memory for tests.

use std::future::Future;
use std::pin::Pin;

use crate::error::TiqResult;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = TiqResult<T>> + Send + 'a>>;

/// Named-blob storage with overwrite semantics.
pub trait FileStore: Send + Sync {
    /// Write `contents` under `key`, replacing anything already there.
    fn write<'a>(&'a self, key: &'a str, contents: &'a str) -> StoreFuture<'a, ()>;

    /// Read the blob stored under `key` as UTF-8.
    fn read_to_string<'a>(&'a self, key: &'a str) -> StoreFuture<'a, String>;

    fn exists<'a>(&'a self, key: &'a str) -> StoreFuture<'a, bool>;

    /// Names of the blobs directly under `dir`, sorted. A missing directory
    /// lists as empty.
    fn list<'a>(&'a self, dir: &'a str) -> StoreFuture<'a, Vec<String>>;
}

mod memory;
pub use memory::MemoryFileStore;

#[cfg(feature = "native")]
mod native;
#[cfg(feature = "native")]
pub use native::NativeFileStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_write_and_read() {
        let store = MemoryFileStore::new();
        store.write("extensions/1.js", "x();").await.unwrap();
        assert_eq!(store.read_to_string("extensions/1.js").await.unwrap(), "x();");
    }

    #[tokio::test]
    async fn memory_overwrite() {
        let store = MemoryFileStore::new();
        store.write("f.js", "first").await.unwrap();
        store.write("f.js", "second").await.unwrap();
        assert_eq!(store.read_to_string("f.js").await.unwrap(), "second");
    }

    #[tokio::test]
    async fn memory_normalizes_slashes() {
        let store = MemoryFileStore::new();
        store.write("/history/main.json", "{}").await.unwrap();
        assert!(store.exists("history/main.json").await.unwrap());
    }

    #[tokio::test]
    async fn memory_read_missing_errors() {
        let store = MemoryFileStore::new();
        assert!(store.read_to_string("nope.js").await.is_err());
        assert!(!store.exists("nope.js").await.unwrap());
    }

    #[tokio::test]
    async fn memory_list_direct_children_only() {
        let store = MemoryFileStore::new();
        store.write("extensions/2.js", "b").await.unwrap();
        store.write("extensions/1.js", "a").await.unwrap();
        store.write("extensions/old/3.js", "c").await.unwrap();
        store.write("history/main.json", "{}").await.unwrap();

        let names = store.list("extensions").await.unwrap();
        assert_eq!(names, vec!["1.js", "2.js"]);
        assert!(store.list("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn memory_rejected_writes_fail() {
        let store = MemoryFileStore::new().reject_writes_under("extensions");
        store.write("history/main.json", "{}").await.unwrap();
        let err = store.write("extensions/1.js", "x").await.unwrap_err();
        assert!(matches!(err, crate::error::TiqError::Io(_)));
        assert!(!store.exists("extensions/1.js").await.unwrap());
    }

    #[cfg(feature = "native")]
    #[tokio::test]
    async fn native_write_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let store = NativeFileStore::new(dir.path());
        store.write("history/main.json", "{}").await.unwrap();
        assert!(dir.path().join("history/main.json").is_file());
        assert_eq!(store.read_to_string("history/main.json").await.unwrap(), "{}");
    }

    #[cfg(feature = "native")]
    #[tokio::test]
    async fn native_overwrite_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = NativeFileStore::new(dir.path());
        store.write("extensions/9.js", "old").await.unwrap();
        store.write("extensions/9.js", "new").await.unwrap();
        store.write("extensions/10.js", "x").await.unwrap();
        assert_eq!(store.read_to_string("extensions/9.js").await.unwrap(), "new");
        assert_eq!(
            store.list("extensions").await.unwrap(),
            vec!["10.js", "9.js"]
        );
        assert!(store.list("missing").await.unwrap().is_empty());
    }

    #[cfg(feature = "native")]
    #[tokio::test]
    async fn native_exists() {
        let dir = tempfile::tempdir().unwrap();
        let store = NativeFileStore::new(dir.path());
        assert!(!store.exists("a.js").await.unwrap());
        store.write("a.js", "").await.unwrap();
        assert!(store.exists("a.js").await.unwrap());
    }
}
