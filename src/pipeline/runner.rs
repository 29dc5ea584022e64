use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::manifest::SessionManifest;
use crate::archive::{AudioResolver, ResolveError};
use crate::config::Config;
use crate::summarize::Summarizer;
use crate::transcribe::{SpeechEngine, TranscribeOptions};
use crate::transcript::aggregate;

/// Paths and results of one completed pipeline run.
#[derive(Debug)]
pub struct RunArtifacts {
    pub transcript_path: PathBuf,
    pub manifest_path: PathBuf,
    pub summary_path: PathBuf,
    pub summary: String,
}

/// End-to-end processing: resolve → transcribe per file → aggregate →
/// persist → summarize. Construction wires the collaborators once; `run`
/// may be called for successive inputs against the same loaded model.
pub struct Pipeline {
    config: Config,
    resolver: AudioResolver,
    engine: Box<dyn SpeechEngine>,
    summarizer: Box<dyn Summarizer>,
}

impl Pipeline {
    pub fn new(
        config: Config,
        engine: Box<dyn SpeechEngine>,
        summarizer: Box<dyn Summarizer>,
    ) -> Result<Self> {
        let resolver = AudioResolver::new(config.upload_dir(), config.audio_dir())
            .context("Failed to prepare working directories")?;

        Ok(Self {
            config,
            resolver,
            engine,
            summarizer,
        })
    }

    pub async fn run(&self, input: &Path, options: &TranscribeOptions) -> Result<RunArtifacts> {
        let audio_files = self.resolver.resolve(input)?;
        if audio_files.is_empty() {
            return Err(ResolveError::NoAudioFound.into());
        }
        info!("Found {} audio file(s)", audio_files.len());

        info!("Starting transcription with {}", self.engine.name());
        let mut runs = Vec::with_capacity(audio_files.len());
        for file in &audio_files {
            info!("Transcribing: {}", file.display());
            let run = self
                .engine
                .transcribe(file, options)
                .with_context(|| format!("Failed to transcribe {}", file.display()))?;
            runs.push(run);
        }

        info!("Processing transcriptions...");
        let transcript = aggregate(&runs);

        let stem = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "session".to_string());
        fs::create_dir_all(&self.config.output_dir)?;

        let transcript_path = self
            .config
            .output_dir
            .join(format!("transcription_full_{stem}.txt"));
        fs::write(&transcript_path, &transcript)
            .with_context(|| format!("Failed to write {}", transcript_path.display()))?;
        info!("Transcript saved to: {}", transcript_path.display());

        let manifest = SessionManifest::new(input, &audio_files, &runs);
        let manifest_path = self
            .config
            .output_dir
            .join(format!("session_manifest_{stem}.json"));
        fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)
            .with_context(|| format!("Failed to write {}", manifest_path.display()))?;

        info!("Generating session summary...");
        let summary = self.summarizer.summarize(&transcript, "").await?;

        let summary_path = self
            .config
            .output_dir
            .join(format!("session_summary_{stem}.txt"));
        fs::write(&summary_path, &summary)
            .with_context(|| format!("Failed to write {}", summary_path.display()))?;
        info!("Summary saved to: {}", summary_path.display());

        Ok(RunArtifacts {
            transcript_path,
            manifest_path,
            summary_path,
            summary,
        })
    }
}
