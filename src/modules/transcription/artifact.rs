use bytes::Bytes;
use csv::ReaderBuilder;

/// Result objects live under this prefix of the result bucket.
pub const RESULT_PREFIX: &str = "transcriptions/";

/// `transcriptions/<media basename without extension>.csv`
pub fn result_object_name(video_uri: &str) -> String {
    format!("{}{}.csv", RESULT_PREFIX, media_stem(video_uri))
}

fn media_stem(uri: &str) -> &str {
    let base = uri.rsplit('/').next().unwrap_or(uri);

    // A leading run of dots is part of the name, not an extension.
    match base.rfind('.') {
        Some(i) if !base[..i].chars().all(|c| c == '.') => &base[..i],
        _ => base,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRow {
    pub start: String,
    pub source_text: String,
    pub translated_text: String,
}

/// The model's CSV reply, kept byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptArtifact {
    text: String,
}

impl TranscriptArtifact {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn to_bytes(&self) -> Bytes {
        Bytes::from(self.text.clone().into_bytes())
    }

    /// Best-effort view of the CSV records. `None` marks a record that is not
    /// three fields or does not parse.
    pub fn rows(&self) -> impl Iterator<Item = Option<TranscriptRow>> + '_ {
        ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(self.text.as_bytes())
            .into_records()
            .map(|record| match record {
                Ok(record) if record.len() == 3 => Some(TranscriptRow {
                    start: record[0].to_string(),
                    source_text: record[1].to_string(),
                    translated_text: record[2].to_string(),
                }),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_name_uses_media_basename() {
        assert_eq!(result_object_name("gs://bucket/clip.mp4"), "transcriptions/clip.csv");
        assert_eq!(
            result_object_name("gs://bucket/videos/2024/talk.final.mov"),
            "transcriptions/talk.final.csv"
        );
        assert_eq!(result_object_name("gs://bucket/raw"), "transcriptions/raw.csv");
        assert_eq!(result_object_name("gs://bucket/.mp4"), "transcriptions/.mp4.csv");
    }

    #[test]
    fn rows_follow_reply_order() {
        let artifact =
            TranscriptArtifact::new("\"0:01\",\"hola\",\"hello\"\n\"0:03\",\"adiós\",\"goodbye\"\n");
        let rows: Vec<_> = artifact.rows().collect();

        assert_eq!(
            rows,
            vec![
                Some(TranscriptRow {
                    start: "0:01".into(),
                    source_text: "hola".into(),
                    translated_text: "hello".into(),
                }),
                Some(TranscriptRow {
                    start: "0:03".into(),
                    source_text: "adiós".into(),
                    translated_text: "goodbye".into(),
                }),
            ]
        );
    }

    #[test]
    fn quoted_commas_and_escaped_quotes_stay_in_field() {
        let artifact = TranscriptArtifact::new(r#""0:05","Sí, ""claro""","Yes, ""sure""""#);
        let row = artifact.rows().next().flatten().unwrap();

        assert_eq!(row.source_text, "Sí, \"claro\"");
        assert_eq!(row.translated_text, "Yes, \"sure\"");
    }

    #[test]
    fn quoted_newlines_stay_in_one_row() {
        let artifact = TranscriptArtifact::new(
            "\"0:01\",\"hola\nmundo\",\"hello\nworld\"\n\"0:03\",\" a \",\"b\"",
        );
        let rows: Vec<_> = artifact.rows().collect();

        assert_eq!(rows.len(), 2);
        let first = rows[0].clone().unwrap();
        assert_eq!(first.source_text, "hola\nmundo");
        assert_eq!(first.translated_text, "hello\nworld");
        assert_eq!(rows[1].clone().unwrap().source_text, " a ");
    }

    #[test]
    fn preamble_lines_are_flagged() {
        let artifact = TranscriptArtifact::new("Of course! Here is the table:\n\"0:01\",\"a\",\"b\"");
        let rows: Vec<_> = artifact.rows().collect();

        assert!(rows[0].is_none());
        assert!(rows[1].is_some());
    }

    #[test]
    fn bytes_are_verbatim_utf8() {
        let text = "\"0:03\",\"adiós\",\"goodbye\"";
        assert_eq!(TranscriptArtifact::new(text).to_bytes().as_ref(), text.as_bytes());
    }
}
