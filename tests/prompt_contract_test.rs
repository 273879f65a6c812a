use serde_json::json;

use dubbing_job::infrastructure::llm::VertexGeminiClient;
use dubbing_job::modules::transcription::{PROMPT_VERSION, TRANSCRIPTION_PROMPT, build_request};

#[test]
fn given_prompt_version_one_then_instruction_text_is_unchanged() {
    assert_eq!(PROMPT_VERSION, 1);
    assert_eq!(
        TRANSCRIPTION_PROMPT,
        "Create a table with the transcription of the video and the time stamp, and translate the transcription to spanish. Break it out by complete phrases. Output in a CSV format. Just output 3 colums no header. Each colum should be separated by a comma and in quotes. Just out the requested information avoid introductory phrases like for example of course here is the result"
    );
}

#[test]
fn given_mp4_uri_when_building_request_body_then_it_matches_golden() {
    let body = VertexGeminiClient::request_body(&build_request("gs://media/clip.mp4"));

    assert_eq!(
        body,
        json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "fileData": { "fileUri": "gs://media/clip.mp4", "mimeType": "video/mp4" } },
                    { "text": TRANSCRIPTION_PROMPT },
                ],
            }],
            "generationConfig": {
                "temperature": 1.0,
                "topP": 0.95,
                "responseModalities": ["TEXT"],
            },
        })
    );
}
