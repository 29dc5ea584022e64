use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Process configuration, read from the environment once at startup.
///
/// Components receive this by reference instead of reading env vars
/// themselves, so tests can construct arbitrary configurations.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the ggml whisper model file.
    #[serde(default = "default_whisper_model")]
    pub whisper_model: PathBuf,

    /// Accelerator usage: true, false, or auto (runtime probe).
    #[serde(default)]
    pub use_gpu: GpuMode,

    /// Forced transcription language. None lets the engine auto-detect per file.
    #[serde(default)]
    pub language: Option<String>,

    /// Bearer credential for the summarization API.
    #[serde(default)]
    pub deepseek_api_key: Option<String>,

    /// Chat-completions endpoint for the summarization API.
    #[serde(default = "default_api_url")]
    pub deepseek_api_url: String,

    /// Base directory for working files (uploads, extracted audio, transcripts).
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// Directory for the generated transcript and summary files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

pub const DEEPSEEK_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";

fn default_whisper_model() -> PathBuf {
    PathBuf::from("models/ggml-large-v3-turbo.bin")
}

fn default_api_url() -> String {
    DEEPSEEK_API_URL.to_string()
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from("temp")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

impl Config {
    /// Load configuration from environment variables (WHISPER_MODEL, USE_GPU,
    /// LANGUAGE, DEEPSEEK_API_KEY, DEEPSEEK_API_URL, TEMP_DIR, OUTPUT_DIR).
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.temp_dir.join("uploads")
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.temp_dir.join("audios")
    }

    pub fn transcript_dir(&self) -> PathBuf {
        self.temp_dir.join("transcripts")
    }

    /// Create every working directory this run will touch.
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [
            self.upload_dir(),
            self.audio_dir(),
            self.transcript_dir(),
            self.output_dir.clone(),
        ] {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}

/// Accelerator selection: explicit on/off, or a best-effort runtime probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum GpuMode {
    Enabled,
    Disabled,
    Auto,
}

impl Default for GpuMode {
    fn default() -> Self {
        GpuMode::Auto
    }
}

impl std::str::FromStr for GpuMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => Ok(GpuMode::Enabled),
            "false" | "0" | "no" | "n" => Ok(GpuMode::Disabled),
            // Unknown values fall back to detection, matching USE_GPU=auto
            _ => Ok(GpuMode::Auto),
        }
    }
}

impl TryFrom<String> for GpuMode {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl GpuMode {
    /// Resolve to a concrete on/off decision using the default probe.
    pub fn resolve(self) -> bool {
        self.resolve_with(detect_gpu)
    }

    /// Resolve with an injected probe; Auto is the only mode that consults it.
    pub fn resolve_with(self, probe: impl FnOnce() -> bool) -> bool {
        match self {
            GpuMode::Enabled => true,
            GpuMode::Disabled => false,
            GpuMode::Auto => probe(),
        }
    }
}

/// Best-effort accelerator probe. Returns false whenever there is no clear
/// signal, so an inconclusive probe degrades to CPU rather than failing.
pub fn detect_gpu() -> bool {
    if let Ok(val) = std::env::var("CUDA_VISIBLE_DEVICES") {
        let val = val.trim();
        if !val.is_empty() && val != "-1" {
            return true;
        }
    }

    Path::new("/proc/driver/nvidia/version").exists()
}
