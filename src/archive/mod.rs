//! Archive/file resolution
//!
//! Turns a user-supplied path (single audio file or ZIP of per-speaker
//! tracks) into the list of audio files the transcription stage will walk.

mod resolver;

pub use resolver::{is_zip_file, AudioResolver, ResolveError, SUPPORTED_AUDIO_EXTENSIONS};
