use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, BoxStream, StreamExt};

use super::{ObjectStore, StorageError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: Option<String>,
}

#[derive(Default)]
struct Faults {
    listing: bool,
    copy: HashSet<String>,
    delete: HashSet<String>,
    upload: HashSet<String>,
}

/// Bucket fake keyed by `(bucket, key)`, with injectable failures.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<BTreeMap<(String, String), StoredObject>>,
    faults: Mutex<Faults>,
    listed_names: Mutex<usize>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Bytes>) {
        self.lock_objects().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body: body.into(),
                content_type: None,
            },
        );
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.lock_objects()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.object(bucket, key).is_some()
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.lock_objects()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }

    /// Names handed out by `list_objects` so far.
    pub fn listed_names(&self) -> usize {
        *self.listed_names.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn fail_listing(&self) {
        self.lock_faults().listing = true;
    }

    pub fn fail_copy_of(&self, key: &str) {
        self.lock_faults().copy.insert(key.to_string());
    }

    pub fn fail_delete_of(&self, key: &str) {
        self.lock_faults().delete.insert(key.to_string());
    }

    pub fn fail_upload_of(&self, key: &str) {
        self.lock_faults().upload.insert(key.to_string());
    }

    fn lock_objects(&self) -> std::sync::MutexGuard<'_, BTreeMap<(String, String), StoredObject>> {
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_faults(&self) -> std::sync::MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    fn list_objects<'a>(
        &'a self,
        bucket: &'a str,
        prefix: Option<&'a str>,
    ) -> BoxStream<'a, Result<String, StorageError>> {
        if self.lock_faults().listing {
            return stream::once(async move {
                Err(StorageError::ListFailed {
                    bucket: bucket.to_string(),
                    reason: "injected listing failure".to_string(),
                })
            })
            .boxed();
        }

        let names: Vec<String> = self
            .keys(bucket)
            .into_iter()
            .filter(|key| prefix.is_none_or(|p| key.starts_with(p)))
            .collect();

        stream::iter(names)
            .map(move |name| {
                *self.listed_names.lock().unwrap_or_else(|e| e.into_inner()) += 1;
                Ok(name)
            })
            .boxed()
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError> {
        self.object(bucket, key)
            .map(|object| object.body)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn copy_object(&self, bucket: &str, from: &str, to: &str) -> Result<(), StorageError> {
        if self.lock_faults().copy.contains(from) {
            return Err(StorageError::CopyFailed {
                from: from.to_string(),
                to: to.to_string(),
                reason: "injected copy failure".to_string(),
            });
        }

        let mut objects = self.lock_objects();
        let object = objects
            .get(&(bucket.to_string(), from.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(from.to_string()))?;
        objects.insert((bucket.to_string(), to.to_string()), object);

        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        if self.lock_faults().delete.contains(key) {
            return Err(StorageError::DeleteFailed {
                key: key.to_string(),
                reason: "injected delete failure".to_string(),
            });
        }

        self.lock_objects()
            .remove(&(bucket.to_string(), key.to_string()))
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        if self.lock_faults().upload.contains(key) {
            return Err(StorageError::UploadFailed {
                key: key.to_string(),
                reason: "injected upload failure".to_string(),
            });
        }

        self.lock_objects().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: Some(content_type.to_string()),
            },
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures_util::TryStreamExt;

    use super::*;

    #[tokio::test]
    async fn listing_respects_prefix() {
        let store = InMemoryObjectStore::new();
        store.insert("jobs", "incoming/a.json", "{}");
        store.insert("jobs", "other/b.json", "{}");
        store.insert("media", "incoming/c.json", "{}");

        let names: Vec<String> = store
            .list_objects("jobs", Some("incoming/"))
            .try_collect()
            .await
            .unwrap();
        assert_eq!(names, vec!["incoming/a.json".to_string()]);

        let all: Vec<String> = store.list_objects("jobs", None).try_collect().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn put_overwrites_and_records_content_type() {
        let store = InMemoryObjectStore::new();
        store
            .put_object("out", "a.csv", Bytes::from("one"), "text/csv")
            .await
            .unwrap();
        store
            .put_object("out", "a.csv", Bytes::from("two"), "text/csv")
            .await
            .unwrap();

        let object = store.object("out", "a.csv").unwrap();
        assert_eq!(object.body, Bytes::from("two"));
        assert_eq!(object.content_type.as_deref(), Some("text/csv"));
    }
}
