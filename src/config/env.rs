use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvKey {
    BucketName,
    SourceFolder,
    DestinationFolder,
    OutputBucketName,
    StorageEndpoint,
    StorageRegion,
    StorageAccessKey,
    StorageSecretKey,
    GoogleCloudProject,
    VertexLocation,
    VertexModel,
    VertexEndpoint,
    VertexAccessToken,
    BatchSize,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::BucketName => "BUCKET_NAME",
            EnvKey::SourceFolder => "SOURCE_FOLDER",
            EnvKey::DestinationFolder => "DESTINATION_FOLDER",
            EnvKey::OutputBucketName => "OUTPUT_BUCKET_NAME",
            EnvKey::StorageEndpoint => "STORAGE_ENDPOINT",
            EnvKey::StorageRegion => "STORAGE_REGION",
            EnvKey::StorageAccessKey => "STORAGE_ACCESS_KEY",
            EnvKey::StorageSecretKey => "STORAGE_SECRET_KEY",
            EnvKey::GoogleCloudProject => "GOOGLE_CLOUD_PROJECT",
            EnvKey::VertexLocation => "VERTEX_LOCATION",
            EnvKey::VertexModel => "VERTEX_MODEL",
            EnvKey::VertexEndpoint => "VERTEX_ENDPOINT",
            EnvKey::VertexAccessToken => "VERTEX_ACCESS_TOKEN",
            EnvKey::BatchSize => "BATCH_SIZE",
        }
    }
}

/// Empty values count as unset.
pub fn get_opt(key: EnvKey) -> Option<String> {
    env::var(key.as_str()).ok().filter(|v| !v.trim().is_empty())
}
