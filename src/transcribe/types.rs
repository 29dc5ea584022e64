use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::audio::DecodeError;

/// One detected utterance: seconds from track start, engine text verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Seconds from track start, >= 0.
    pub start: f64,
    /// Seconds from track start, >= start.
    pub end: f64,
    /// Raw transcribed text, possibly with leading/trailing whitespace.
    pub text: String,
}

/// Run-level metadata for one transcribed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionInfo {
    /// Language the engine detected, or the forced one.
    pub language: Option<String>,
    /// Duration of the source audio in seconds.
    pub duration_seconds: f64,
}

/// Everything produced by transcribing one audio file. Segments keep the
/// engine's emission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionRun {
    pub segments: Vec<Segment>,
    pub info: TranscriptionInfo,
}

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[cfg(feature = "whisper")]
    #[error("whisper engine failure: {0}")]
    Whisper(#[from] whisper_rs::WhisperError),

    #[error("speech engine failure: {0}")]
    Engine(String),
}
