pub mod artifact;
pub mod invoker;
pub mod prompt;
pub mod publisher;

pub use artifact::{RESULT_PREFIX, TranscriptArtifact, TranscriptRow, result_object_name};
pub use invoker::transcribe;
pub use prompt::{PROMPT_VERSION, TRANSCRIPTION_PROMPT, build_request};
pub use publisher::{PublishError, ResultLocation, publish};
