//! Audio decoding
//!
//! Decodes any supported container/codec to PCM via symphonia and converts
//! it to the 16 kHz mono f32 layout the speech engine expects.

mod decode;

pub use decode::{decode_audio, DecodeError, DecodedAudio, WHISPER_SAMPLE_RATE};
