use async_trait::async_trait;

pub mod scripted;
pub mod token;
pub mod vertex;

pub use scripted::ScriptedModel;
pub use token::AccessTokenSource;
pub use vertex::VertexGeminiClient;

/// One media file plus the instruction and sampling to run against it.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionRequest {
    pub media_uri: String,
    pub mime_type: String,
    pub instruction: String,
    pub temperature: f64,
    pub top_p: f64,
}

#[async_trait]
pub trait TranscriptionModel: Send + Sync {
    /// Returns the model's text reply, untouched.
    async fn generate(&self, request: &TranscriptionRequest) -> Result<String, ModelError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("access token unavailable: {0}")]
    Auth(String),
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("prompt was blocked: {0}")]
    Blocked(String),
    #[error("model response contained no text")]
    EmptyResponse,
}
