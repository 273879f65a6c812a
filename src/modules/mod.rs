pub mod ingest;
pub mod transcription;
