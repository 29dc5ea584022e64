use std::path::Path;

use super::types::{TranscriptionError, TranscriptionRun};

pub const DEFAULT_BATCH_SIZE: usize = 16;

/// Per-call knobs. Neither changes what text a file produces, only how the
/// engine gets there.
#[derive(Debug, Clone)]
pub struct TranscribeOptions {
    /// Forced language code; None lets the engine auto-detect per file.
    pub language: Option<String>,
    /// Engine batching hint, throughput only.
    pub batch_size: usize,
}

impl Default for TranscribeOptions {
    fn default() -> Self {
        Self {
            language: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Speech-to-text engine boundary.
///
/// Calls are independent of one another; the only shared state is the loaded
/// model, which is read-only after construction. A failure on one file is
/// that file's failure and never leaks into another run's result.
pub trait SpeechEngine: Send + Sync {
    fn transcribe(
        &self,
        audio_path: &Path,
        options: &TranscribeOptions,
    ) -> Result<TranscriptionRun, TranscriptionError>;

    /// Engine name for logging.
    fn name(&self) -> &str;
}
