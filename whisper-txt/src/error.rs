use std::path::PathBuf;

/// All errors that can occur in whisper-txt.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("environment check failed: {0}")]
    Environment(String),

    #[error("model error: {0}")]
    Model(String),

    #[error("model download failed: {0}")]
    ModelDownload(String),

    #[error("audio decoding error: {0}")]
    AudioDecode(String),

    #[error("transcription error: {0}")]
    Transcription(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("whisper error: {0}")]
    Whisper(#[from] whisper_rs::WhisperError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
