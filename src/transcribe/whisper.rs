use std::path::{Path, PathBuf};
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::engine::{SpeechEngine, TranscribeOptions};
use super::types::{Segment, TranscriptionError, TranscriptionInfo, TranscriptionRun};
use crate::audio::decode_audio;

/// Local whisper.cpp engine. The model is loaded once and shared read-only
/// across per-file calls; each call gets its own inference state.
pub struct WhisperEngine {
    ctx: WhisperContext,
    model_path: PathBuf,
}

impl WhisperEngine {
    pub fn new(model_path: &Path, use_gpu: bool) -> Result<Self, TranscriptionError> {
        info!(
            "Loading whisper model: {} (gpu: {})",
            model_path.display(),
            use_gpu
        );

        let mut ctx_params = WhisperContextParameters::default();
        ctx_params.use_gpu(use_gpu);

        let ctx = WhisperContext::new_with_params(&model_path.to_string_lossy(), ctx_params)?;

        Ok(Self {
            ctx,
            model_path: model_path.to_path_buf(),
        })
    }

    fn worker_threads(batch_size: usize) -> i32 {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        batch_size.clamp(1, cores) as i32
    }
}

impl SpeechEngine for WhisperEngine {
    fn transcribe(
        &self,
        audio_path: &Path,
        options: &TranscribeOptions,
    ) -> Result<TranscriptionRun, TranscriptionError> {
        let decoded = decode_audio(audio_path).map_err(|source| TranscriptionError::Decode {
            path: audio_path.to_path_buf(),
            source,
        })?;
        let duration_seconds = decoded.duration_seconds();
        let samples = decoded.into_mono_16khz();

        debug!(
            "Running whisper on {} ({:.1}s of audio)",
            audio_path.display(),
            duration_seconds
        );

        let mut state = self.ctx.create_state()?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        // whisper.cpp has no batched decode; the batch knob sizes the worker
        // thread pool instead
        params.set_n_threads(Self::worker_threads(options.batch_size));
        match options.language.as_deref() {
            Some(language) => params.set_language(Some(language)),
            None => params.set_language(Some("auto")),
        }

        state.full(params, &samples)?;

        let segment_count = state.full_n_segments()?;
        let mut segments = Vec::with_capacity(segment_count as usize);
        for i in 0..segment_count {
            let text = state.full_get_segment_text(i)?;
            // whisper reports timestamps in centiseconds
            let start = state.full_get_segment_t0(i)? as f64 / 100.0;
            let end = state.full_get_segment_t1(i)? as f64 / 100.0;
            segments.push(Segment { start, end, text });
        }

        let language = match options.language.as_deref() {
            Some(language) => Some(language.to_string()),
            None => state
                .full_lang_id()
                .ok()
                .and_then(whisper_rs::get_lang_str)
                .map(str::to_string),
        };

        info!(
            "Transcribed {}: {} segment(s), language {}",
            audio_path.display(),
            segments.len(),
            language.as_deref().unwrap_or("unknown")
        );

        Ok(TranscriptionRun {
            segments,
            info: TranscriptionInfo {
                language,
                duration_seconds,
            },
        })
    }

    fn name(&self) -> &str {
        self.model_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("whisper")
    }
}
