use tracing::info;

use super::model::Prefix;
use crate::infrastructure::storage::{ObjectStore, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum RelocationError {
    #[error("could not copy {source_key}, original left in place: {error}")]
    CopyFailed {
        source_key: String,
        #[source]
        error: StorageError,
    },
    /// The copy landed, so the object now exists at both keys.
    #[error("copied {source_key} to {destination_key} but could not delete the original: {error}")]
    DeleteFailed {
        source_key: String,
        destination_key: String,
        #[source]
        error: StorageError,
    },
}

/// Moves `key` to `destination + key` in the same bucket by copy then delete.
/// The pair is not atomic. Returns the new key.
pub async fn relocate(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    destination: &Prefix,
) -> Result<String, RelocationError> {
    let destination_key = destination.join(key);

    info!(from = key, to = %destination_key, "Capturing object from source folder");

    store
        .copy_object(bucket, key, &destination_key)
        .await
        .map_err(|error| RelocationError::CopyFailed {
            source_key: key.to_string(),
            error,
        })?;

    info!(from = key, to = %destination_key, "Copied object");

    store
        .delete_object(bucket, key)
        .await
        .map_err(|error| RelocationError::DeleteFailed {
            source_key: key.to_string(),
            destination_key: destination_key.clone(),
            error,
        })?;

    info!(key, "Deleted object from source folder");

    Ok(destination_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryObjectStore;

    #[tokio::test]
    async fn relocation_moves_object() {
        let store = InMemoryObjectStore::new();
        store.insert("jobs", "incoming/a.json", "{\"k\":1}");

        let new_key = relocate(&store, "jobs", "incoming/a.json", &Prefix::new("processed"))
            .await
            .unwrap();

        assert_eq!(new_key, "processed/incoming/a.json");
        assert!(!store.contains("jobs", "incoming/a.json"));
        assert_eq!(
            store.object("jobs", &new_key).unwrap().body,
            bytes::Bytes::from("{\"k\":1}")
        );
    }

    #[tokio::test]
    async fn failed_copy_leaves_original_untouched() {
        let store = InMemoryObjectStore::new();
        store.insert("jobs", "incoming/a.json", "{}");
        store.fail_copy_of("incoming/a.json");

        let result = relocate(&store, "jobs", "incoming/a.json", &Prefix::new("processed")).await;

        assert!(matches!(result, Err(RelocationError::CopyFailed { .. })));
        assert_eq!(store.keys("jobs"), vec!["incoming/a.json"]);
    }

    #[tokio::test]
    async fn failed_delete_duplicates_object() {
        let store = InMemoryObjectStore::new();
        store.insert("jobs", "incoming/a.json", "{}");
        store.fail_delete_of("incoming/a.json");

        let result = relocate(&store, "jobs", "incoming/a.json", &Prefix::new("processed")).await;

        assert!(matches!(
            result,
            Err(RelocationError::DeleteFailed { ref destination_key, .. })
                if destination_key == "processed/incoming/a.json"
        ));
        assert!(store.contains("jobs", "incoming/a.json"));
        assert!(store.contains("jobs", "processed/incoming/a.json"));
    }
}
