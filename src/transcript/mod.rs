//! Transcript aggregation
//!
//! Merges the per-track transcription runs into one chronologically ordered,
//! speaker-attributed transcript. This is the only stage with an algorithmic
//! contract of its own: positional speaker labels, a pure per-segment
//! formatting transform, and a stable merge sort on segment start times.

mod aggregate;

pub use aggregate::{aggregate, format_segment, speaker_label};
