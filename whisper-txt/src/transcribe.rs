use std::path::Path;

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::{self, AudioWaveform};
use crate::config::{TranscriberOptions, MODEL_NAME};
use crate::device::{self, Device};
use crate::error::{Error, Result};
use crate::model;
use crate::pipeline::Transcribe;
use crate::types::{self, Transcript};

/// A Whisper model loaded onto a device, ready to transcribe files.
///
/// The context holds both the mel feature extractor and the model weights.
/// Each call to [`transcribe`](Self::transcribe) runs on its own decoding
/// state, so the loaded model is never modified by inference.
pub struct AudioTranscriber {
    ctx: WhisperContext,
    device: Device,
}

impl AudioTranscriber {
    /// Resolve the model (downloading it on first use), pick a device and load.
    pub async fn initialize(options: &TranscriberOptions) -> Result<Self> {
        let cache_dir = options.resolve_cache_dir();
        let model_path = model::ensure_model(&cache_dir).await?;
        let device = device::select_device(options.device, options.gpu_device);
        Self::load(&model_path, device)
    }

    /// Load an already-downloaded model file onto `device`.
    pub fn load(model_path: &Path, device: Device) -> Result<Self> {
        info!(model = %model_path.display(), %device, "loading whisper model");

        let mut ctx_params = WhisperContextParameters::new();
        match device {
            Device::Gpu { index } => {
                ctx_params.use_gpu(true);
                ctx_params.gpu_device(index as i32);
            }
            Device::Cpu => {
                ctx_params.use_gpu(false);
            }
        }

        let ctx = WhisperContext::new_with_params(
            model_path
                .to_str()
                .ok_or_else(|| Error::Model("model path contains invalid UTF-8".into()))?,
            ctx_params,
        )?;

        Ok(Self { ctx, device })
    }

    /// Decode `audio_path` and transcribe it.
    pub fn transcribe_file(&self, audio_path: &Path) -> Result<Transcript> {
        info!(path = %audio_path.display(), "processing audio file");
        let waveform = audio::load_audio(audio_path)?;
        self.transcribe_waveform(&waveform)
    }

    /// Transcribe an already-decoded waveform. It must be 16kHz mono.
    pub fn transcribe_waveform(&self, waveform: &AudioWaveform) -> Result<Transcript> {
        waveform.ensure_whisper_rate()?;

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| Error::Transcription(format!("failed to create decoder state: {e}")))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 5 });
        params.set_language(Some("auto"));
        params.set_translate(false);

        // Keep special tokens out of the text and whisper.cpp off stdout
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        info!(samples = waveform.samples.len(), "generating transcription");
        state
            .full(params, &waveform.samples)
            .map_err(|e| Error::Transcription(format!("inference failed: {e}")))?;

        let num_segments = state.full_n_segments();
        debug!(num_segments, "generation complete");

        let mut texts = Vec::with_capacity(num_segments.max(0) as usize);
        for i in 0..num_segments {
            let segment = state
                .get_segment(i)
                .ok_or_else(|| Error::Transcription(format!("segment {i} not found")))?;
            let text = segment
                .to_str_lossy()
                .map_err(|e| Error::Transcription(format!("segment text error: {e}")))?;
            texts.push(text.into_owned());
        }

        let language = whisper_rs::get_lang_str(state.full_lang_id_from_state())
            .unwrap_or("unknown")
            .to_string();

        let transcript = Transcript {
            text: types::join_segments(&texts),
            language,
            duration: waveform.duration_secs(),
            model: MODEL_NAME.to_string(),
            device: self.device,
        };

        info!(
            chars = transcript.text.len(),
            language = %transcript.language,
            "transcription complete"
        );
        Ok(transcript)
    }
}

impl Transcribe for AudioTranscriber {
    fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        self.transcribe_file(audio_path)
    }
}
