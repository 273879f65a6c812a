use futures_util::future;
use futures_util::stream::{BoxStream, StreamExt, TryStreamExt};

use super::model::{Prefix, is_config_object};
use crate::infrastructure::storage::{ObjectStore, StorageError};

/// Configuration objects under `source`, in listing order.
///
/// Keys already under `destination` are skipped so a destination nested in the
/// source area is never picked up again.
pub fn select_candidates<'a>(
    store: &'a dyn ObjectStore,
    bucket: &'a str,
    source: &'a Prefix,
    destination: &'a Prefix,
) -> BoxStream<'a, Result<String, StorageError>> {
    store
        .list_objects(bucket, source.listing_prefix())
        .try_filter(move |key| future::ready(is_config_object(key) && !destination.contains(key)))
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryObjectStore;

    async fn selected(store: &InMemoryObjectStore, source: &Prefix, dest: &Prefix) -> Vec<String> {
        select_candidates(store, "jobs", source, dest)
            .try_collect()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn only_config_objects_under_prefix_are_selected() {
        let store = InMemoryObjectStore::new();
        store.insert("jobs", "incoming/a.json", "{}");
        store.insert("jobs", "incoming/B.JSON", "{}");
        store.insert("jobs", "incoming/clip.mp4", "");
        store.insert("jobs", "elsewhere/c.json", "{}");

        let names = selected(&store, &Prefix::new("incoming"), &Prefix::new("processed")).await;
        assert_eq!(names, vec!["incoming/B.JSON", "incoming/a.json"]);
    }

    #[tokio::test]
    async fn root_source_scans_whole_bucket_except_destination() {
        let store = InMemoryObjectStore::new();
        store.insert("jobs", "a.json", "{}");
        store.insert("jobs", "incoming/b.json", "{}");
        store.insert("jobs", "processed/old.json", "{}");

        let names = selected(&store, &Prefix::root(), &Prefix::new("processed/")).await;
        assert_eq!(names, vec!["a.json", "incoming/b.json"]);
    }

    #[tokio::test]
    async fn empty_source_yields_nothing() {
        let store = InMemoryObjectStore::new();
        store.insert("jobs", "incoming/readme.txt", "");

        let names = selected(&store, &Prefix::new("incoming"), &Prefix::new("processed")).await;
        assert!(names.is_empty());
    }
}
