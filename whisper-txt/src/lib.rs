//! Transcribe an audio file with Whisper and save the text next to it.
//!
//! **whisper-txt** decodes audio with ffmpeg (resampled to 16 kHz mono), runs a
//! whisper.cpp model on the best available device, and writes the transcript
//! to a `.txt` file with the same name as the audio.
//!
//! # Quick start
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> whisper_txt::Result<()> {
//! let options = whisper_txt::TranscriberOptions::default();
//! let transcriber = whisper_txt::AudioTranscriber::initialize(&options).await?;
//!
//! let transcript = transcriber.transcribe_file("audiofile.mp3".as_ref())?;
//! let saved = whisper_txt::writer::persist(&transcript.text, "audiofile.mp3".as_ref())?;
//! println!("{}", saved.display());
//! # Ok(())
//! # }
//! ```
//!
//! [`pipeline::run`] wraps the same steps with an input check and reports
//! which stage failed.

pub mod audio;
pub mod config;
pub mod device;
pub mod environment;
pub mod error;
pub mod model;
pub mod pipeline;
pub(crate) mod transcribe;
pub mod types;
pub mod writer;

pub use config::{DevicePreference, TranscriberOptions, MODEL_NAME};
pub use device::Device;
pub use error::{Error, Result};
pub use pipeline::{Completed, Failure, Transcribe};
pub use transcribe::AudioTranscriber;
pub use types::Transcript;

use std::path::Path;

/// Load the model described by `options`, transcribe `audio_path` and save
/// the result as `<audio_path>.txt`.
pub async fn transcribe_to_file(
    audio_path: impl AsRef<Path>,
    options: &TranscriberOptions,
) -> std::result::Result<Completed, Failure> {
    pipeline::run(audio_path.as_ref(), || AudioTranscriber::initialize(options)).await
}
