use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::{AccessTokenSource, ModelError, TranscriptionModel, TranscriptionRequest};
use crate::config::VertexSettings;

/// Gemini on Vertex AI through the REST `generateContent` method.
pub struct VertexGeminiClient {
    client: reqwest::Client,
    url: String,
    model: String,
    tokens: AccessTokenSource,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl VertexGeminiClient {
    pub fn new(settings: &VertexSettings, tokens: AccessTokenSource) -> Self {
        let url = format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            settings.endpoint.trim_end_matches('/'),
            settings.project,
            settings.location,
            settings.model
        );

        Self {
            client: reqwest::Client::new(),
            url,
            model: settings.model.clone(),
            tokens,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn request_body(request: &TranscriptionRequest) -> Value {
        json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [
                        {
                            "fileData": {
                                "fileUri": request.media_uri,
                                "mimeType": request.mime_type,
                            }
                        },
                        { "text": request.instruction },
                    ],
                }
            ],
            "generationConfig": {
                "temperature": request.temperature,
                "topP": request.top_p,
                "responseModalities": ["TEXT"],
            },
        })
    }

    fn extract_text(response: GenerateContentResponse) -> Result<String, ModelError> {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ModelError::Blocked(reason));
        }

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ModelError::EmptyResponse);
        }

        Ok(text)
    }
}

#[async_trait]
impl TranscriptionModel for VertexGeminiClient {
    async fn generate(&self, request: &TranscriptionRequest) -> Result<String, ModelError> {
        let token = self.tokens.token().await?;

        debug!(model = %self.model, media = %request.media_uri, "Sending generateContent request");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(token)
            .json(&Self::request_body(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ModelError::Api { status, body });
        }

        let text = Self::extract_text(response.json::<GenerateContentResponse>().await?)?;

        info!(model = %self.model, chars = text.len(), "Model response received");

        Ok(text)
    }
}
