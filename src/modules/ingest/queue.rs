use std::collections::HashSet;

use futures_util::TryStreamExt;
use tracing::{error, info};

use super::model::{ClaimedItem, Prefix};
use super::relocator::relocate;
use super::selector::select_candidates;
use crate::infrastructure::storage::{ObjectStore, StorageError};

/// Treats the source area as a queue: claiming an item relocates it so no later
/// listing can see it again.
pub struct WorkQueue<'a> {
    store: &'a dyn ObjectStore,
    bucket: &'a str,
    source: &'a Prefix,
    destination: &'a Prefix,
    skipped: HashSet<String>,
}

impl<'a> WorkQueue<'a> {
    pub fn new(
        store: &'a dyn ObjectStore,
        bucket: &'a str,
        source: &'a Prefix,
        destination: &'a Prefix,
    ) -> Self {
        Self {
            store,
            bucket,
            source,
            destination,
            skipped: HashSet::new(),
        }
    }

    /// Relocates the first candidate that relocates cleanly and hands it out.
    ///
    /// Candidates whose copy or delete fails are logged and not offered again by
    /// this queue. Only a listing failure is returned as an error. `Ok(None)`
    /// means nothing is left to claim.
    pub async fn claim_next(&mut self) -> Result<Option<ClaimedItem>, StorageError> {
        let mut candidates =
            select_candidates(self.store, self.bucket, self.source, self.destination);

        while let Some(key) = candidates.try_next().await? {
            if self.skipped.contains(&key) {
                continue;
            }

            info!(key = %key, "Processing JSON file");

            match relocate(self.store, self.bucket, &key, self.destination).await {
                Ok(relocated_key) => {
                    return Ok(Some(ClaimedItem {
                        bucket: self.bucket.to_string(),
                        source_key: key,
                        relocated_key,
                    }));
                }
                Err(e) => {
                    error!(key = %key, error = %e, "Error relocating file");
                    self.skipped.insert(key);
                }
            }
        }

        Ok(None)
    }

    /// Candidates that failed relocation during this run.
    pub fn skipped(&self) -> usize {
        self.skipped.len()
    }
}
