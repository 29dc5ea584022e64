pub mod archive;
pub mod audio;
pub mod config;
pub mod pipeline;
pub mod summarize;
pub mod transcribe;
pub mod transcript;

pub use archive::{is_zip_file, AudioResolver, ResolveError, SUPPORTED_AUDIO_EXTENSIONS};
pub use audio::{decode_audio, DecodeError, DecodedAudio};
pub use config::{Config, GpuMode};
pub use pipeline::{Pipeline, RunArtifacts, SessionManifest, TrackRecord};
pub use summarize::{build_summary_prompt, DeepSeekSummarizer, SummarizeError, Summarizer};
pub use transcribe::{
    Segment, SpeechEngine, TranscribeOptions, TranscriptionError, TranscriptionInfo,
    TranscriptionRun,
};
pub use transcript::{aggregate, format_segment, speaker_label};

#[cfg(feature = "whisper")]
pub use transcribe::WhisperEngine;
