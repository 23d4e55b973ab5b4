//! The single-file run: check input, load model, transcribe, write `.txt`.

use std::future::Future;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Error;
use crate::types::Transcript;
use crate::writer;

/// Something that can turn an audio file into a transcript.
pub trait Transcribe {
    fn transcribe(&self, audio_path: &Path) -> crate::Result<Transcript>;
}

/// A successful run.
#[derive(Debug, Clone)]
pub struct Completed {
    pub transcript: Transcript,
    pub output_path: PathBuf,
}

/// Which stage of the run failed, with the underlying cause.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    #[error("could not find {}", path.display())]
    InputMissing { path: PathBuf },

    #[error("error loading model: {0}")]
    ModelLoad(#[source] Error),

    #[error("error during transcription: {0}")]
    Transcription(#[source] Error),

    #[error("error saving transcription: {0}")]
    Write(#[source] Error),
}

impl Failure {
    /// A remedy to show the user, where there is an obvious one.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Failure::InputMissing { .. } => Some("pass the audio file path as the first argument"),
            Failure::ModelLoad(_) => {
                Some("make sure you have an internet connection and enough disk space")
            }
            Failure::Transcription(Error::AudioDecode(_)) => {
                Some("check that the file is a valid audio file ffmpeg can read")
            }
            _ => None,
        }
    }
}

/// First step of every run: the input file must exist.
pub fn ensure_input(audio_path: &Path) -> Result<(), Failure> {
    if audio_path.exists() {
        Ok(())
    } else {
        Err(Failure::InputMissing {
            path: audio_path.to_path_buf(),
        })
    }
}

/// Run the whole pipeline for one audio file.
///
/// `load` is only called once the input is known to exist, and the writer
/// only runs after a successful transcription. An empty transcript still
/// produces an (empty) output file.
pub async fn run<T, L, Fut>(audio_path: &Path, load: L) -> Result<Completed, Failure>
where
    T: Transcribe,
    L: FnOnce() -> Fut,
    Fut: Future<Output = crate::Result<T>>,
{
    ensure_input(audio_path)?;

    let transcriber = load().await.map_err(Failure::ModelLoad)?;

    info!(path = %audio_path.display(), "starting transcription");
    let transcript = transcriber
        .transcribe(audio_path)
        .map_err(Failure::Transcription)?;

    let output_path = writer::persist(&transcript.text, audio_path).map_err(Failure::Write)?;

    Ok(Completed {
        transcript,
        output_path,
    })
}
