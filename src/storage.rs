//! Key-value storage layer for lazytask
//!
//! Everything lazytask persists goes through [`KeyValueStore`], a small async
//! contract over string keys and string values. Two implementations ship:
//!
//! - [`MemoryStore`]: in-process map, used by tests and embedders that bring
//!   their own persistence.
//! - [`FileStore`]: one JSON document per key under `<data-dir>/store/`.
//!
//! # Directory Structure
//!
//! ```text
//! <data-dir>/
//!   lazytask.toml                 # Optional configuration
//!   store/
//!     %40lazytask_tasks.json      # Tasks key ("@lazytask_tasks")
//!     app_settings.json           # Settings key
//! ```
//!
//! The store only ever reads, writes or deletes inside `store/`, so pointing
//! `--data-dir` at a directory with unrelated JSON files is safe.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::error::{Error, Result};

/// Extension used for documents written by [`FileStore`]
pub const DOCUMENT_EXTENSION: &str = "json";

/// Subdirectory of the data directory owned by [`FileStore`]
pub const STORE_DIR: &str = "store";

/// Async string-keyed persistent store.
///
/// Every operation may suspend and may fail. Callers decide whether a failure
/// is surfaced or degraded.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` when absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Remove `key`; removing an absent key succeeds
    async fn remove(&self, key: &str) -> Result<()>;

    /// Remove every key
    async fn clear_all(&self) -> Result<()>;
}

// =========================================================================
// In-memory store
// =========================================================================

/// In-memory [`KeyValueStore`] with fault injection for tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `get` fail until reset
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `set`/`remove`/`clear_all` fail until reset
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Insert a raw value, bypassing fault injection
    pub async fn raw_insert(&self, key: &str, value: &str) {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
    }

    /// Whether `key` is currently present
    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn check_write(&self, key: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::store(key, "write rejected by memory store"));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::store(key, "read rejected by memory store"));
        }
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.check_write(key)?;
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_write(key)?;
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        self.check_write("*")?;
        self.entries.write().await.clear();
        Ok(())
    }
}

// =========================================================================
// File-backed store
// =========================================================================

/// [`KeyValueStore`] keeping one document per key in `<data-dir>/store/`
#[derive(Debug, Clone)]
pub struct FileStore {
    documents: PathBuf,
}

impl FileStore {
    /// Create a store for `data_dir`. The store directory is created lazily
    /// on first write.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            documents: data_dir.as_ref().join(STORE_DIR),
        }
    }

    /// Directory holding the documents
    pub fn documents_dir(&self) -> &Path {
        &self.documents
    }

    /// Path of the document backing `key`
    pub fn document_path(&self, key: &str) -> PathBuf {
        self.documents
            .join(format!("{}.{}", encode_key(key), DOCUMENT_EXTENSION))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.document_path(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::store(key, err.to_string())),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        write_atomic(&self.document_path(key), value.as_bytes())
            .await
            .map_err(|err| Error::store(key, err.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.document_path(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Error::store(key, err.to_string())),
        }
    }

    async fn clear_all(&self) -> Result<()> {
        let mut dir = match tokio::fs::read_dir(&self.documents).await {
            Ok(dir) => dir,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(Error::store("*", err.to_string())),
        };

        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|err| Error::store("*", err.to_string()))?
        {
            let path = entry.path();
            let is_document = path
                .extension()
                .map(|ext| ext == DOCUMENT_EXTENSION)
                .unwrap_or(false);
            if !is_document {
                continue;
            }
            tokio::fs::remove_file(&path)
                .await
                .map_err(|err| Error::store("*", format!("{}: {err}", path.display())))?;
        }

        Ok(())
    }
}

/// Write data atomically using temp file + rename
///
/// Readers never observe a partially written document: the file is either
/// fully replaced or left untouched.
pub async fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension(format!("tmp.{}", std::process::id()));

    let mut temp_file = tokio::fs::File::create(&temp_path).await?;
    temp_file.write_all(data).await?;
    temp_file.sync_all().await?;
    drop(temp_file);

    tokio::fs::rename(&temp_path, path).await?;

    Ok(())
}

/// Encode a store key into a filesystem-safe file stem.
///
/// ASCII alphanumerics, `_`, `-` and `.` pass through; every other byte is
/// written as `%XX`.
pub fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'-' | b'.' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
