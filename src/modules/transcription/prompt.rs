//! The instruction sent with every video. Its wording fixes the shape of the
//! published CSV, so any edit here bumps [`PROMPT_VERSION`].

use crate::infrastructure::llm::TranscriptionRequest;

pub const PROMPT_VERSION: u32 = 1;

pub const TRANSCRIPTION_PROMPT: &str = "Create a table with the transcription of the video and the time stamp, and translate the transcription to spanish. Break it out by complete phrases. Output in a CSV format. Just output 3 colums no header. Each colum should be separated by a comma and in quotes. Just out the requested information avoid introductory phrases like for example of course here is the result";

pub const TEMPERATURE: f64 = 1.0;
pub const TOP_P: f64 = 0.95;

/// Used when the extension does not name an audio or video type.
pub const DEFAULT_MEDIA_MIME: &str = "video/mp4";

pub fn media_mime_type(uri: &str) -> String {
    let path = uri.split(['?', '#']).next().unwrap_or(uri);

    mime_guess::from_path(path)
        .first()
        .filter(|m| m.type_() == mime::VIDEO || m.type_() == mime::AUDIO)
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_MEDIA_MIME.to_string())
}

pub fn build_request(media_uri: &str) -> TranscriptionRequest {
    TranscriptionRequest {
        media_uri: media_uri.to_string(),
        mime_type: media_mime_type(media_uri),
        instruction: TRANSCRIPTION_PROMPT.to_string(),
        temperature: TEMPERATURE,
        top_p: TOP_P,
    }
}
