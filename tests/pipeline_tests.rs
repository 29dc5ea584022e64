// End-to-end pipeline tests with scripted engine and summarizer
//
// The speech engine and summarizer are substituted behind their traits, so
// these runs exercise resolution, aggregation, artifact writing, and the
// failure ordering without any model or network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tablescribe::{
    Config, GpuMode, Pipeline, ResolveError, Segment, SessionManifest, SpeechEngine,
    SummarizeError, Summarizer, TranscribeOptions, TranscriptionError, TranscriptionInfo,
    TranscriptionRun,
};
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::ZipWriter;

/// Engine that returns pre-scripted segments keyed by file stem.
struct ScriptedEngine {
    scripts: HashMap<String, Vec<(f64, f64, &'static str)>>,
}

impl ScriptedEngine {
    fn new(scripts: &[(&str, &[(f64, f64, &'static str)])]) -> Self {
        Self {
            scripts: scripts
                .iter()
                .map(|(stem, segments)| (stem.to_string(), segments.to_vec()))
                .collect(),
        }
    }
}

impl SpeechEngine for ScriptedEngine {
    fn transcribe(
        &self,
        audio_path: &Path,
        _options: &TranscribeOptions,
    ) -> Result<TranscriptionRun, TranscriptionError> {
        let stem = audio_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let segments = self
            .scripts
            .get(&stem)
            .ok_or_else(|| TranscriptionError::Engine(format!("no script for {stem}")))?;

        Ok(TranscriptionRun {
            segments: segments
                .iter()
                .map(|&(start, end, text)| Segment {
                    start,
                    end,
                    text: text.to_string(),
                })
                .collect(),
            info: TranscriptionInfo {
                language: Some("en".to_string()),
                duration_seconds: segments.last().map(|&(_, end, _)| end).unwrap_or(0.0),
            },
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct CannedSummarizer;

#[async_trait]
impl Summarizer for CannedSummarizer {
    async fn summarize(
        &self,
        _transcript_text: &str,
        _additional_context: &str,
    ) -> Result<String, SummarizeError> {
        Ok("The party met at the tavern.".to_string())
    }
}

struct FailingSummarizer;

#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn summarize(
        &self,
        _transcript_text: &str,
        _additional_context: &str,
    ) -> Result<String, SummarizeError> {
        Err(SummarizeError::Api {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: "upstream on fire".to_string(),
        })
    }
}

fn test_config(temp: &TempDir) -> Config {
    Config {
        whisper_model: PathBuf::from("unused.bin"),
        use_gpu: GpuMode::Disabled,
        language: None,
        deepseek_api_key: Some("test-key".to_string()),
        deepseek_api_url: "http://localhost:0/unused".to_string(),
        temp_dir: temp.path().join("temp"),
        output_dir: temp.path().join("outputs"),
    }
}

fn build_zip(path: &Path, members: &[(&str, &[u8])]) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let mut writer = ZipWriter::new(file);
    for (name, contents) in members {
        writer.start_file(*name, FileOptions::default())?;
        writer.write_all(contents)?;
    }
    writer.finish()?;
    Ok(())
}

#[tokio::test]
async fn test_multi_track_zip_end_to_end() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = test_config(&temp);

    let archive = temp.path().join("session.zip");
    build_zip(
        &archive,
        &[
            ("gm.mp3", b"gm track".as_slice()),
            ("player.mp3", b"player track".as_slice()),
        ],
    )?;

    let engine = ScriptedEngine::new(&[
        ("gm", &[(0.0, 2.0, "hi"), (3.0, 4.0, "roll for it")]),
        ("player", &[(1.0, 2.5, "there")]),
    ]);

    let pipeline = Pipeline::new(config, Box::new(engine), Box::new(CannedSummarizer))?;
    let artifacts = pipeline
        .run(&archive, &TranscribeOptions::default())
        .await?;

    let transcript = fs::read_to_string(&artifacts.transcript_path)?;
    assert_eq!(
        transcript,
        "[0.00 - 2.00] speaker_1: hi\n\
         [1.00 - 2.50] speaker_2: there\n\
         [3.00 - 4.00] speaker_1: roll for it"
    );

    let summary = fs::read_to_string(&artifacts.summary_path)?;
    assert_eq!(summary, "The party met at the tavern.");
    assert_eq!(artifacts.summary, summary);

    // Artifact names derive from the input stem
    assert!(artifacts
        .transcript_path
        .ends_with("transcription_full_session.txt"));
    assert!(artifacts
        .summary_path
        .ends_with("session_summary_session.txt"));

    Ok(())
}

#[tokio::test]
async fn test_manifest_records_tracks_in_input_order() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = test_config(&temp);

    let archive = temp.path().join("one-shot.zip");
    build_zip(
        &archive,
        &[
            ("gm.mp3", b"gm".as_slice()),
            ("player.mp3", b"pl".as_slice()),
        ],
    )?;

    let engine = ScriptedEngine::new(&[
        ("gm", &[(0.0, 5.0, "once upon a time")]),
        ("player", &[]),
    ]);

    let pipeline = Pipeline::new(config, Box::new(engine), Box::new(CannedSummarizer))?;
    let artifacts = pipeline
        .run(&archive, &TranscribeOptions::default())
        .await?;

    let manifest: SessionManifest =
        serde_json::from_str(&fs::read_to_string(&artifacts.manifest_path)?)?;

    assert_eq!(manifest.tracks.len(), 2);
    assert_eq!(manifest.tracks[0].speaker, "speaker_1");
    assert!(manifest.tracks[0].file.ends_with("gm.mp3"));
    assert_eq!(manifest.tracks[0].segment_count, 1);
    assert_eq!(manifest.tracks[1].speaker, "speaker_2");
    assert_eq!(manifest.tracks[1].segment_count, 0);
    assert!(manifest.source.ends_with("one-shot.zip"));

    Ok(())
}

#[tokio::test]
async fn test_transcript_persists_when_summarization_fails() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = test_config(&temp);
    let output_dir = config.output_dir.clone();

    let input = temp.path().join("solo.mp3");
    fs::write(&input, b"solo track")?;

    let engine = ScriptedEngine::new(&[("solo", &[(0.0, 1.0, "last words")])]);

    let pipeline = Pipeline::new(config, Box::new(engine), Box::new(FailingSummarizer))?;
    let result = pipeline.run(&input, &TranscribeOptions::default()).await;

    assert!(result.is_err());

    // Transcript was written before the summarization attempt
    let transcript_path = output_dir.join("transcription_full_solo.txt");
    assert_eq!(
        fs::read_to_string(&transcript_path)?,
        "[0.00 - 1.00] speaker_1: last words"
    );
    // No summary artifact on failure
    assert!(!output_dir.join("session_summary_solo.txt").exists());

    Ok(())
}

#[tokio::test]
async fn test_archive_without_audio_reports_no_audio_found() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = test_config(&temp);

    let archive = temp.path().join("maps-only.zip");
    build_zip(&archive, &[("dungeon.png", b"png".as_slice())])?;

    let engine = ScriptedEngine::new(&[]);
    let pipeline = Pipeline::new(config, Box::new(engine), Box::new(CannedSummarizer))?;

    let err = pipeline
        .run(&archive, &TranscribeOptions::default())
        .await
        .expect_err("empty archive should fail");

    assert!(matches!(
        err.downcast_ref::<ResolveError>(),
        Some(ResolveError::NoAudioFound)
    ));

    Ok(())
}

#[tokio::test]
async fn test_transcription_failure_aborts_run() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = test_config(&temp);
    let output_dir = config.output_dir.clone();

    let input = temp.path().join("unscripted.mp3");
    fs::write(&input, b"bytes")?;

    // Engine has no script for this stem, so transcription fails
    let engine = ScriptedEngine::new(&[]);
    let pipeline = Pipeline::new(config, Box::new(engine), Box::new(CannedSummarizer))?;

    let result = pipeline.run(&input, &TranscribeOptions::default()).await;

    assert!(result.is_err());
    assert!(!output_dir.join("transcription_full_unscripted.txt").exists());

    Ok(())
}
