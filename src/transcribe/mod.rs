//! Transcription adapter
//!
//! Wraps the speech engine behind the `SpeechEngine` trait: one independent
//! call per audio file, returning that file's timestamped segments plus run
//! metadata. Engine internals (model, batching, device) stay behind the
//! trait so the pipeline and tests never depend on them.

mod engine;
mod types;

#[cfg(feature = "whisper")]
mod whisper;

pub use engine::{SpeechEngine, TranscribeOptions, DEFAULT_BATCH_SIZE};
pub use types::{Segment, TranscriptionError, TranscriptionInfo, TranscriptionRun};

#[cfg(feature = "whisper")]
pub use whisper::WhisperEngine;
