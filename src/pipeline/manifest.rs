use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::transcribe::TranscriptionRun;
use crate::transcript::speaker_label;

/// Machine-readable record of one pipeline run, written next to the
/// transcript and summary artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionManifest {
    /// Unique id for this run.
    pub session_id: Uuid,

    /// When the manifest was produced.
    pub created_at: DateTime<Utc>,

    /// The user-supplied input path.
    pub source: String,

    /// One record per audio track, in input order.
    pub tracks: Vec<TrackRecord>,
}

/// Per-track participant record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Working-directory path of the track's audio file.
    pub file: String,

    /// Positional speaker slot assigned to the track.
    pub speaker: String,

    /// Detected (or forced) language for the track.
    pub language: Option<String>,

    /// Track duration in seconds.
    pub duration_seconds: f64,

    /// Number of speech segments the engine emitted.
    pub segment_count: usize,
}

impl SessionManifest {
    pub fn new(source: &Path, audio_files: &[PathBuf], runs: &[TranscriptionRun]) -> Self {
        let tracks = audio_files
            .iter()
            .zip(runs)
            .enumerate()
            .map(|(index, (file, run))| TrackRecord {
                file: file.display().to_string(),
                speaker: speaker_label(index),
                language: run.info.language.clone(),
                duration_seconds: run.info.duration_seconds,
                segment_count: run.segments.len(),
            })
            .collect();

        Self {
            session_id: Uuid::new_v4(),
            created_at: Utc::now(),
            source: source.display().to_string(),
            tracks,
        }
    }
}
