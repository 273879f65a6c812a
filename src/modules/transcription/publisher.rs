use tracing::info;

use super::artifact::{TranscriptArtifact, result_object_name};
use crate::infrastructure::storage::{ObjectStore, StorageError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLocation {
    pub bucket: String,
    pub key: String,
}

impl std::fmt::Display for ResultLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gs://{}/{}", self.bucket, self.key)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("OUTPUT_BUCKET_NAME must be set")]
    MissingResultBucket,
    #[error(transparent)]
    Upload(#[from] StorageError),
}

/// Writes the transcript as `text/csv` under `transcriptions/` in the result
/// bucket, replacing any earlier result for the same video.
pub async fn publish(
    store: &dyn ObjectStore,
    result_bucket: Option<&str>,
    video_uri: &str,
    artifact: &TranscriptArtifact,
) -> Result<ResultLocation, PublishError> {
    let bucket = result_bucket.ok_or(PublishError::MissingResultBucket)?;
    let key = result_object_name(video_uri);

    store
        .put_object(bucket, &key, artifact.to_bytes(), mime::TEXT_CSV.as_ref())
        .await?;

    let location = ResultLocation {
        bucket: bucket.to_string(),
        key,
    };
    info!(location = %location, "Response uploaded");

    Ok(location)
}
