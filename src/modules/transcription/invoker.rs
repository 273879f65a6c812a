use tracing::{info, warn};

use super::artifact::TranscriptArtifact;
use super::prompt::{PROMPT_VERSION, build_request};
use crate::infrastructure::llm::{ModelError, TranscriptionModel};
use crate::modules::ingest::JobDescriptor;

/// Asks the model for a bilingual, timestamped CSV transcript of the job's video.
/// One blocking attempt, no retry.
pub async fn transcribe(
    model: &dyn TranscriptionModel,
    descriptor: &JobDescriptor,
) -> Result<TranscriptArtifact, ModelError> {
    let request = build_request(&descriptor.video_uri);

    info!(
        video = %descriptor.video_uri,
        mime_type = %request.mime_type,
        language = descriptor.language.as_deref().unwrap_or("-"),
        prompt_version = PROMPT_VERSION,
        "Calling model to transcribe video"
    );

    let artifact = TranscriptArtifact::new(model.generate(&request).await?);

    let (rows, malformed) = artifact
        .rows()
        .fold((0usize, 0usize), |(rows, bad), row| {
            (rows + 1, bad + usize::from(row.is_none()))
        });
    if malformed > 0 {
        warn!(rows, malformed, "Transcript has lines that are not three fields");
    } else {
        info!(rows, "Transcript received");
    }

    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::ScriptedModel;
    use crate::modules::transcription::TRANSCRIPTION_PROMPT;

    fn descriptor() -> JobDescriptor {
        JobDescriptor {
            video_uri: "gs://media/clip.mp4".to_string(),
            language: Some("es".to_string()),
        }
    }

    #[tokio::test]
    async fn reply_is_returned_verbatim() {
        let model = ScriptedModel::replying("\"0:01\",\"hola\",\"hello\"");

        let artifact = transcribe(&model, &descriptor()).await.unwrap();

        assert_eq!(artifact.as_str(), "\"0:01\",\"hola\",\"hello\"");
        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].instruction, TRANSCRIPTION_PROMPT);
        assert_eq!(requests[0].media_uri, "gs://media/clip.mp4");
    }

    #[tokio::test]
    async fn model_error_is_returned() {
        let model = ScriptedModel::failing(429, "quota exceeded");

        let result = transcribe(&model, &descriptor()).await;

        assert!(matches!(result, Err(ModelError::Api { status: 429, .. })));
    }
}
