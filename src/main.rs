use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dubbing_job::config::AppConfig;
use dubbing_job::infrastructure::llm::{AccessTokenSource, VertexGeminiClient};
use dubbing_job::infrastructure::storage::StorageService;
use dubbing_job::state::JobContext;
use dubbing_job::workers::TranscriptionJob;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Missing settings abort before any storage access.
    let config = match AppConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{:#}", e), "An error occurred");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let storage = StorageService::new(&config.storage);
    let tokens = AccessTokenSource::from_config(config.vertex.access_token.as_deref())
        .await
        .context("could not set up model credentials")?;
    let model = VertexGeminiClient::new(&config.vertex, tokens);

    let bucket = config.bucket.clone();
    let job = TranscriptionJob::new(JobContext::new(config, Arc::new(storage), Arc::new(model)));

    job.run()
        .await
        .with_context(|| format!("could not scan gs://{}", bucket))?;

    info!("JSON file moving job completed");
    Ok(())
}
