use std::sync::Mutex;

use async_trait::async_trait;

use super::{ModelError, TranscriptionModel, TranscriptionRequest};

enum Reply {
    Text(String),
    Failure { status: u16, body: String },
    Empty,
}

/// Stand-in model that always gives the same reply and remembers what it was asked.
pub struct ScriptedModel {
    reply: Reply,
    requests: Mutex<Vec<TranscriptionRequest>>,
}

impl ScriptedModel {
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(Reply::Text(text.into()))
    }

    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self::with_reply(Reply::Failure {
            status,
            body: body.into(),
        })
    }

    pub fn empty() -> Self {
        Self::with_reply(Reply::Empty)
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<TranscriptionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl TranscriptionModel for ScriptedModel {
    async fn generate(&self, request: &TranscriptionRequest) -> Result<String, ModelError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Failure { status, body } => Err(ModelError::Api {
                status: *status,
                body: body.clone(),
            }),
            Reply::Empty => Err(ModelError::EmptyResponse),
        }
    }
}
