use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

pub mod memory;
pub mod s3;

pub use memory::InMemoryObjectStore;
pub use s3::StorageService;

/// Bucket operations the job needs. Each call is atomic on its own; nothing
/// here composes them.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Lazily lists object names, fetching pages only as the stream is polled.
    fn list_objects<'a>(
        &'a self,
        bucket: &'a str,
        prefix: Option<&'a str>,
    ) -> BoxStream<'a, Result<String, StorageError>>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError>;

    async fn copy_object(&self, bucket: &str, from: &str, to: &str) -> Result<(), StorageError>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError>;

    /// Overwrites any existing object under `key`.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("listing gs://{bucket} failed: {reason}")]
    ListFailed { bucket: String, reason: String },
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("download of {key} failed: {reason}")]
    DownloadFailed { key: String, reason: String },
    #[error("copy of {from} to {to} failed: {reason}")]
    CopyFailed {
        from: String,
        to: String,
        reason: String,
    },
    #[error("delete of {key} failed: {reason}")]
    DeleteFailed { key: String, reason: String },
    #[error("upload of {key} failed: {reason}")]
    UploadFailed { key: String, reason: String },
}
