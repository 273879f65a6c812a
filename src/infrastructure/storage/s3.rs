use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, config::BehaviorVersion, config::Credentials, config::Region};
use bytes::Bytes;
use futures_util::stream::{self, BoxStream, StreamExt, TryStreamExt};
use tracing::{debug, info};
use url::Url;

use super::{ObjectStore, StorageError};
use crate::config::StorageSettings;

/// S3-compatible bucket client. Against Cloud Storage this talks to the XML
/// interoperability API with HMAC keys.
#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
}

impl StorageService {
    pub fn new(settings: &StorageSettings) -> Self {
        let credentials = Credentials::new(
            &settings.access_key,
            &settings.secret_key,
            None,
            None,
            "static",
        );

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .endpoint_url(&settings.endpoint)
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        let client = Client::from_conf(config);

        info!(endpoint = %settings.endpoint, "✅ Storage client ready");

        Self { client }
    }

    async fn list_page(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        continuation_token: Option<String>,
    ) -> Result<(Vec<String>, Option<String>), StorageError> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .set_prefix(prefix.map(str::to_string))
            .set_continuation_token(continuation_token)
            .send()
            .await
            .map_err(|e| StorageError::ListFailed {
                bucket: bucket.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        let keys: Vec<String> = output
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_string))
            .collect();

        debug!(bucket, count = keys.len(), "Listed page");

        Ok((keys, output.next_continuation_token().map(str::to_string)))
    }
}

/// `bucket/key` with every key segment percent-encoded, as CopyObject expects.
fn copy_source(bucket: &str, key: &str) -> Result<String, String> {
    let mut url = Url::parse("s3://copy-source/").map_err(|e| e.to_string())?;
    url.path_segments_mut()
        .map_err(|_| "copy source url cannot hold a path".to_string())?
        .pop_if_empty()
        .push(bucket)
        .extend(key.split('/'));

    Ok(url.path().trim_start_matches('/').to_string())
}

enum PageCursor {
    Start,
    Next(String),
    Done,
}

#[async_trait]
impl ObjectStore for StorageService {
    fn list_objects<'a>(
        &'a self,
        bucket: &'a str,
        prefix: Option<&'a str>,
    ) -> BoxStream<'a, Result<String, StorageError>> {
        stream::try_unfold(PageCursor::Start, move |cursor| async move {
            let token = match cursor {
                PageCursor::Start => None,
                PageCursor::Next(token) => Some(token),
                PageCursor::Done => return Ok(None),
            };

            let (keys, next) = self.list_page(bucket, prefix, token).await?;
            let cursor = next.map_or(PageCursor::Done, PageCursor::Next);

            Ok::<_, StorageError>(Some((stream::iter(keys.into_iter().map(Ok)), cursor)))
        })
        .try_flatten()
        .boxed()
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|s| s.is_no_such_key()) {
                    StorageError::NotFound(key.to_string())
                } else {
                    StorageError::DownloadFailed {
                        key: key.to_string(),
                        reason: DisplayErrorContext(&e).to_string(),
                    }
                }
            })?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::DownloadFailed {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        Ok(body.into_bytes())
    }

    async fn copy_object(&self, bucket: &str, from: &str, to: &str) -> Result<(), StorageError> {
        let copy_failed = |reason: String| StorageError::CopyFailed {
            from: from.to_string(),
            to: to.to_string(),
            reason,
        };

        let source = copy_source(bucket, from).map_err(copy_failed)?;

        self.client
            .copy_object()
            .bucket(bucket)
            .key(to)
            .copy_source(source)
            .send()
            .await
            .map_err(|e| copy_failed(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed {
                key: key.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed {
                key: key.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(())
    }
}
