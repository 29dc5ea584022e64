use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tablescribe::transcribe::DEFAULT_BATCH_SIZE;
use tablescribe::{
    Config, DeepSeekSummarizer, GpuMode, Pipeline, ResolveError, SpeechEngine, TranscribeOptions,
    SUPPORTED_AUDIO_EXTENSIONS,
};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(
    name = "tablescribe",
    about = "Transcribe and summarize recorded TTRPG sessions. \
             Accepts a .zip of per-speaker audio tracks or a single audio file."
)]
struct Cli {
    /// Path to a ZIP of audio tracks or a single audio file
    input: PathBuf,

    /// Whisper ggml model file (overrides WHISPER_MODEL)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Accelerator usage: 'true' | 'false' | 'auto'
    #[arg(long)]
    use_gpu: Option<GpuMode>,

    /// Force transcription language (omitted => auto-detect per file)
    #[arg(long)]
    language: Option<String>,

    /// Batch size used during transcription (throughput only)
    #[arg(long)]
    batch_size: Option<usize>,

    /// Override output directory for generated transcripts/summaries
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn usage_exit(message: &str) -> ! {
    eprintln!("Error: {message}");
    eprintln!("Usage: tablescribe path/to/session.zip or path/to/audio.mp3");
    eprintln!(
        "Supported audio formats: {}",
        SUPPORTED_AUDIO_EXTENSIONS.join(", ")
    );
    std::process::exit(1);
}

#[cfg(feature = "whisper")]
fn build_engine(config: &Config, use_gpu: bool) -> Result<Box<dyn SpeechEngine>> {
    let engine = tablescribe::WhisperEngine::new(&config.whisper_model, use_gpu)?;
    Ok(Box::new(engine))
}

#[cfg(not(feature = "whisper"))]
fn build_engine(_config: &Config, _use_gpu: bool) -> Result<Box<dyn SpeechEngine>> {
    anyhow::bail!("this build has no speech engine; rebuild with --features whisper")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(model) = cli.model {
        config.whisper_model = model;
    }
    if let Some(use_gpu) = cli.use_gpu {
        config.use_gpu = use_gpu;
    }
    if let Some(language) = cli.language {
        config.language = Some(language);
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }

    if !cli.input.exists() {
        usage_exit(&format!("the file '{}' does not exist", cli.input.display()));
    }

    config.ensure_directories()?;

    // Verify the credential before any transcription work starts
    let summarizer = match DeepSeekSummarizer::from_config(&config) {
        Ok(summarizer) => summarizer,
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };

    let use_gpu = config.use_gpu.resolve();
    info!("Accelerator enabled: {}", use_gpu);

    let engine = build_engine(&config, use_gpu)?;

    let options = TranscribeOptions {
        language: config.language.clone(),
        batch_size: cli.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
    };

    let pipeline = Pipeline::new(config, engine, Box::new(summarizer))?;

    match pipeline.run(&cli.input, &options).await {
        Ok(artifacts) => {
            println!();
            println!("{}", "=".repeat(50));
            println!("SESSION SUMMARY:");
            println!("{}", "=".repeat(50));
            println!("{}", artifacts.summary);
            Ok(())
        }
        Err(err) => {
            if let Some(resolve_err) = err.downcast_ref::<ResolveError>() {
                match resolve_err {
                    ResolveError::NoAudioFound | ResolveError::UnsupportedFormat { .. } => {
                        usage_exit(&resolve_err.to_string());
                    }
                    _ => {}
                }
            }
            error!("Error during processing: {err:#}");
            Err(err)
        }
    }
}
