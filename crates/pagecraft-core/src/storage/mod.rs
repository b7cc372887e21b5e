//! Storage abstraction for document persistence and version history.

mod debounce;
mod memory;
mod upload;

pub use debounce::{DebouncedSaver, DEFAULT_DEBOUNCE_MILLIS};
pub use memory::MemoryStore;
pub use upload::{UploadError, UploadQueue, Uploader};

use crate::document::Document;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("version not found: {0}")]
    VersionNotFound(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("storage error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async storage operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A named snapshot in a document's version history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub id: String,
    pub name: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Rendered preview as an opaque data URL, when the caller supplied one.
    pub preview: Option<String>,
}

/// Backend for document persistence and named versions.
///
/// Implementations can store documents in memory, on the filesystem, or
/// behind a remote API. Implementations must be Send + Sync so a saver can
/// run off the UI thread.
pub trait DocumentStore: Send + Sync {
    /// Save the working copy of a document.
    fn save(&self, id: &str, document: &Document) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the working copy of a document.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Document>>;

    /// Snapshot the current working copy as a named version, optionally
    /// with a rendered preview image.
    fn save_version(
        &self,
        id: &str,
        name: &str,
        document: &Document,
        preview: Option<String>,
    ) -> BoxFuture<'_, StorageResult<VersionInfo>>;

    /// List versions of a document, newest first.
    fn list_versions(&self, id: &str) -> BoxFuture<'_, StorageResult<Vec<VersionInfo>>>;

    /// Fetch a version's document for restore. The caller decides whether
    /// to snapshot the working copy first.
    fn restore_version(&self, id: &str, version_id: &str)
    -> BoxFuture<'_, StorageResult<Document>>;

    /// Remove a version.
    fn delete_version(&self, id: &str, version_id: &str) -> BoxFuture<'_, StorageResult<()>>;
}
