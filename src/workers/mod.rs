pub mod transcriber;

pub use transcriber::{ItemOutcome, ItemReport, ProcessingError, RunReport, RunSummary, TranscriptionJob};
