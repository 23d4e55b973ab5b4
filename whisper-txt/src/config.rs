use std::path::PathBuf;

/// Name of the Whisper model every run uses.
pub const MODEL_NAME: &str = "large-v3";

/// ggml conversion of `openai/whisper-large-v3`, as published for whisper.cpp.
pub const MODEL_FILENAME: &str = "ggml-large-v3.bin";

/// Which compute device the caller is willing to run on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DevicePreference {
    /// Use an accelerator when one is available, otherwise the CPU.
    #[default]
    Auto,
    /// Always run on the CPU.
    Cpu,
}

/// Options for loading the transcriber.
#[derive(Debug, Clone, Default)]
pub struct TranscriberOptions {
    pub device: DevicePreference,
    pub gpu_device: u32,
    pub cache_dir: Option<PathBuf>,
}

impl TranscriberOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn device(mut self, device: DevicePreference) -> Self {
        self.device = device;
        self
    }

    pub fn gpu_device(mut self, index: u32) -> Self {
        self.gpu_device = index;
        self
    }

    pub fn cache_dir(mut self, dir: PathBuf) -> Self {
        self.cache_dir = Some(dir);
        self
    }

    /// Resolve the cache directory, defaulting to ~/.cache/whisper-txt/models.
    pub fn resolve_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("whisper-txt")
                .join("models")
        })
    }
}
