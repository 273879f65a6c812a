use serde::Deserialize;
use serde_json::Value;

/// Suffix that marks an object as a job configuration.
pub const CONFIG_SUFFIX: &str = ".json";

/// A bucket prefix that always ends with `/`. The bare `/` means the whole bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix(String);

impl Prefix {
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.ends_with('/') {
            Self(raw.to_string())
        } else {
            Self(format!("{}/", raw))
        }
    }

    pub fn root() -> Self {
        Self("/".to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Prefix to hand to the storage listing, `None` when the whole bucket is meant.
    pub fn listing_prefix(&self) -> Option<&str> {
        if self.is_root() { None } else { Some(&self.0) }
    }

    pub fn contains(&self, key: &str) -> bool {
        !self.is_root() && key.starts_with(&self.0)
    }

    pub fn join(&self, name: &str) -> String {
        format!("{}{}", self.0, name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_config_object(key: &str) -> bool {
    key.to_lowercase().ends_with(CONFIG_SUFFIX)
}

/// A configuration object that has been moved out of the source area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedItem {
    pub bucket: String,
    pub source_key: String,
    pub relocated_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    pub video_uri: String,
    pub language: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("malformed job configuration: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("job configuration has no video_gcs_url")]
    MissingVideoUri,
}

#[derive(Deserialize)]
struct RawJobConfig {
    #[serde(default)]
    video_gcs_url: Option<Value>,
    #[serde(default)]
    language: Option<Value>,
}

impl JobDescriptor {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DescriptorError> {
        let raw: RawJobConfig = serde_json::from_slice(bytes)?;

        let video_uri = raw
            .video_gcs_url
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|uri| !uri.is_empty())
            .ok_or(DescriptorError::MissingVideoUri)?
            .to_string();

        let language = raw
            .language
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self { video_uri, language })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_gets_trailing_separator() {
        assert_eq!(Prefix::new("incoming").as_str(), "incoming/");
        assert_eq!(Prefix::new("incoming/").as_str(), "incoming/");
        assert!(Prefix::new("").is_root());
        assert!(Prefix::new("/").is_root());
    }

    #[test]
    fn root_prefix_lists_whole_bucket() {
        assert_eq!(Prefix::root().listing_prefix(), None);
        assert_eq!(Prefix::new("in").listing_prefix(), Some("in/"));
    }

    #[test]
    fn join_prepends_prefix_to_full_name() {
        let dest = Prefix::new("processed");
        assert_eq!(dest.join("incoming/job.json"), "processed/incoming/job.json");
    }

    #[test]
    fn config_suffix_is_case_insensitive() {
        assert!(is_config_object("incoming/a.json"));
        assert!(is_config_object("incoming/B.JSON"));
        assert!(!is_config_object("incoming/clip.mp4"));
        assert!(!is_config_object("incoming/a.json.bak"));
    }

    #[test]
    fn descriptor_reads_video_uri_and_language() {
        let raw = br#"{"video_gcs_url": "gs://media/clip.mp4", "language": "es"}"#;
        let descriptor = JobDescriptor::from_slice(raw).unwrap();
        assert_eq!(descriptor.video_uri, "gs://media/clip.mp4");
        assert_eq!(descriptor.language.as_deref(), Some("es"));
    }

    #[test]
    fn descriptor_without_video_uri_is_rejected() {
        let cases: [&[u8]; 4] = [
            br#"{"language": "es"}"#,
            br#"{"video_gcs_url": null}"#,
            br#"{"video_gcs_url": "  "}"#,
            br#"{"video_gcs_url": 42}"#,
        ];
        for raw in cases {
            assert!(matches!(
                JobDescriptor::from_slice(raw),
                Err(DescriptorError::MissingVideoUri)
            ));
        }
    }

    #[test]
    fn descriptor_with_broken_json_is_malformed() {
        assert!(matches!(
            JobDescriptor::from_slice(b"{not json"),
            Err(DescriptorError::Malformed(_))
        ));
    }
}
