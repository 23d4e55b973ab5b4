use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Sample rate whisper.cpp expects.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Maximum audio duration in seconds (8 hours).
/// 8 hours at 16kHz mono f32 = ~1.8 GB.
const MAX_AUDIO_DURATION_SECS: f64 = 8.0 * 3600.0;

/// Decoded mono samples in [-1.0, 1.0] at a known sample rate.
#[derive(Debug, Clone)]
pub struct AudioWaveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioWaveform {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Check the waveform matches the rate the model was trained on.
    pub fn ensure_whisper_rate(&self) -> Result<()> {
        if self.sample_rate != WHISPER_SAMPLE_RATE {
            return Err(Error::Transcription(format!(
                "audio sample rate is {} Hz, model expects {} Hz",
                self.sample_rate, WHISPER_SAMPLE_RATE
            )));
        }
        Ok(())
    }
}

/// Decode an audio file to 16kHz mono f32 samples.
///
/// ffmpeg handles decoding, resampling and channel mixing, so every format it
/// supports works here (mp3, wav, ogg, opus, flac, m4a, ...). The path is not
/// checked up front; a missing file shows up as a decode error.
pub fn load_audio(path: &Path) -> Result<AudioWaveform> {
    info!(path = %path.display(), "loading audio");

    let pcm = decode_with_ffmpeg(path)?;
    let waveform = AudioWaveform {
        samples: pcm_s16le_to_f32(&pcm),
        sample_rate: WHISPER_SAMPLE_RATE,
    };

    let duration = waveform.duration_secs();
    debug!(
        samples = waveform.samples.len(),
        duration_secs = format!("{duration:.1}"),
        "decoded audio"
    );

    if duration > MAX_AUDIO_DURATION_SECS {
        return Err(Error::AudioDecode(format!(
            "audio too long ({:.0}s) — maximum supported duration is {:.0}s",
            duration, MAX_AUDIO_DURATION_SECS
        )));
    }

    Ok(waveform)
}

/// Run ffmpeg and return raw s16le PCM at 16kHz mono.
fn decode_with_ffmpeg(path: &Path) -> Result<Vec<u8>> {
    let output = Command::new("ffmpeg")
        .args(["-nostdin", "-threads", "0", "-i"])
        .arg(path)
        .args([
            "-f",
            "s16le",
            "-ac",
            "1",
            "-acodec",
            "pcm_s16le",
            "-ar",
            &WHISPER_SAMPLE_RATE.to_string(),
            "-",
        ])
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::AudioDecode("ffmpeg not found — install with: apt install ffmpeg".into())
            } else {
                Error::AudioDecode(format!("failed to run ffmpeg: {e}"))
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = stderr.lines().last().unwrap_or("unknown error");
        return Err(Error::AudioDecode(format!(
            "ffmpeg could not decode {}: {reason}",
            path.display()
        )));
    }

    if output.stdout.is_empty() {
        return Err(Error::AudioDecode("ffmpeg produced no output".into()));
    }

    Ok(output.stdout)
}

/// Convert signed 16-bit little-endian PCM to f32 in [-1.0, 1.0].
/// A trailing odd byte is ignored.
fn pcm_s16le_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]]) as f32 / 32768.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcm_conversion_extremes() {
        let bytes = [
            i16::MIN.to_le_bytes(),
            0i16.to_le_bytes(),
            i16::MAX.to_le_bytes(),
        ]
        .concat();
        let samples = pcm_s16le_to_f32(&bytes);
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0], -1.0);
        assert_eq!(samples[1], 0.0);
        assert!(samples[2] < 1.0 && samples[2] > 0.999);
    }

    #[test]
    fn test_pcm_conversion_ignores_odd_byte() {
        let samples = pcm_s16le_to_f32(&[0x00, 0x40, 0x7f]);
        assert_eq!(samples, vec![0.5]);
    }

    #[test]
    fn test_pcm_conversion_empty() {
        assert!(pcm_s16le_to_f32(&[]).is_empty());
    }

    #[test]
    fn test_waveform_duration() {
        let waveform = AudioWaveform {
            samples: vec![0.0; 32_000],
            sample_rate: WHISPER_SAMPLE_RATE,
        };
        assert!((waveform.duration_secs() - 2.0).abs() < 1e-9);

        let broken = AudioWaveform {
            samples: vec![0.0; 10],
            sample_rate: 0,
        };
        assert_eq!(broken.duration_secs(), 0.0);
    }

    #[test]
    fn test_ensure_whisper_rate() {
        let ok = AudioWaveform {
            samples: vec![],
            sample_rate: 16_000,
        };
        assert!(ok.ensure_whisper_rate().is_ok());

        let wrong = AudioWaveform {
            samples: vec![0.0; 44_100],
            sample_rate: 44_100,
        };
        let err = wrong.ensure_whisper_rate().unwrap_err();
        assert!(matches!(err, Error::Transcription(_)));
        assert!(err.to_string().contains("44100"));
    }

    #[test]
    fn test_load_missing_file_is_decode_error() {
        let path = std::env::temp_dir().join("whisper_txt_test_missing_audio.mp3");
        std::fs::remove_file(&path).ok();
        let result = load_audio(&path);
        assert!(matches!(result, Err(Error::AudioDecode(_))));
    }

    #[test]
    fn test_load_rejects_non_audio_file() {
        // Fails whether or not ffmpeg is installed
        let tmp = std::env::temp_dir().join("whisper_txt_test_not_audio.txt");
        std::fs::write(&tmp, "this is not audio").unwrap();
        let result = load_audio(&tmp);
        assert!(matches!(result, Err(Error::AudioDecode(_))));
        std::fs::remove_file(&tmp).ok();
    }
}
