use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::infrastructure::llm::TranscriptionModel;
use crate::infrastructure::storage::ObjectStore;

/// Everything one job invocation needs, built once in `main` and passed down.
#[derive(Clone)]
pub struct JobContext {
    pub config: AppConfig,
    pub storage: Arc<dyn ObjectStore>,
    pub model: Arc<dyn TranscriptionModel>,
}

impl JobContext {
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn ObjectStore>,
        model: Arc<dyn TranscriptionModel>,
    ) -> Self {
        Self {
            config,
            storage,
            model,
        }
    }
}
