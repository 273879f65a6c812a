use crate::config::env::{self, EnvKey};
use crate::modules::ingest::Prefix;

pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://storage.googleapis.com";
pub const DEFAULT_STORAGE_REGION: &str = "auto";
pub const DEFAULT_VERTEX_LOCATION: &str = "europe-west4";
pub const DEFAULT_VERTEX_MODEL: &str = "gemini-2.0-flash-001";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),
    #[error("environment variable {key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone, Debug)]
pub struct StorageSettings {
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
}

#[derive(Clone, Debug)]
pub struct VertexSettings {
    pub project: String,
    pub location: String,
    pub model: String,
    pub endpoint: String,
    pub access_token: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bucket: String,
    pub source_prefix: Prefix,
    pub destination_prefix: Prefix,
    /// Checked per item when a transcript is published, not at startup.
    pub output_bucket: Option<String>,
    pub batch_size: usize,
    pub storage: StorageSettings,
    pub vertex: VertexSettings,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_lookup(env::get_opt)
    }

    /// Builds the config from any key lookup; `new` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(EnvKey) -> Option<String>,
    {
        let required = |key: EnvKey| lookup(key).ok_or(ConfigError::Missing(key.as_str()));
        let or_default = |key: EnvKey, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bucket = required(EnvKey::BucketName)?;
        let destination_prefix = Prefix::new(&required(EnvKey::DestinationFolder)?);
        let source_prefix = lookup(EnvKey::SourceFolder)
            .map(|raw| Prefix::new(&raw))
            .unwrap_or_else(Prefix::root);

        // Claimed items would stay listable under the source and never be picked.
        if source_prefix == destination_prefix {
            return Err(ConfigError::Invalid {
                key: EnvKey::DestinationFolder.as_str(),
                reason: format!("must differ from {}", EnvKey::SourceFolder.as_str()),
            });
        }

        let batch_size = match lookup(EnvKey::BatchSize) {
            None => 1,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        key: EnvKey::BatchSize.as_str(),
                        reason: "must be at least 1".to_string(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        key: EnvKey::BatchSize.as_str(),
                        reason: e.to_string(),
                    });
                }
            },
        };

        let storage = StorageSettings {
            endpoint: or_default(EnvKey::StorageEndpoint, DEFAULT_STORAGE_ENDPOINT),
            region: or_default(EnvKey::StorageRegion, DEFAULT_STORAGE_REGION),
            access_key: required(EnvKey::StorageAccessKey)?,
            secret_key: required(EnvKey::StorageSecretKey)?,
        };

        let location = or_default(EnvKey::VertexLocation, DEFAULT_VERTEX_LOCATION);
        let vertex = VertexSettings {
            project: required(EnvKey::GoogleCloudProject)?,
            endpoint: lookup(EnvKey::VertexEndpoint)
                .unwrap_or_else(|| format!("https://{}-aiplatform.googleapis.com", location)),
            location,
            model: or_default(EnvKey::VertexModel, DEFAULT_VERTEX_MODEL),
            access_token: lookup(EnvKey::VertexAccessToken),
        };

        Ok(Self {
            bucket,
            source_prefix,
            destination_prefix,
            output_bucket: lookup(EnvKey::OutputBucketName),
            batch_size,
            storage,
            vertex,
        })
    }
}
