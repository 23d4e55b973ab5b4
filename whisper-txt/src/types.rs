use serde::Serialize;

use crate::device::Device;

/// Result of one successful transcription.
///
/// `text` is exactly what gets written to disk. An empty string is a valid
/// result (silent audio), not a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub text: String,
    /// Detected language code, or "unknown".
    pub language: String,
    /// Seconds of audio that were transcribed.
    pub duration: f64,
    pub model: String,
    pub device: Device,
}

impl Transcript {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Join whisper segment texts into one line of text.
///
/// whisper.cpp segments carry their own leading space; they are trimmed and
/// rejoined with single spaces, dropping segments that are blank.
pub(crate) fn join_segments<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    segments
        .into_iter()
        .filter_map(|s| {
            let trimmed = s.as_ref().trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}
