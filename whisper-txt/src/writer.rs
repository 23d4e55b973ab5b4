use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};

/// Where the transcript of `audio_path` goes: same name, `.txt` extension.
///
/// `talk.mp3` becomes `talk.txt`; `talk` (no extension) becomes `talk.txt`.
pub fn output_path_for(audio_path: &Path) -> PathBuf {
    audio_path.with_extension("txt")
}

/// Write `text` as UTF-8 next to `audio_path`, replacing any previous transcript.
///
/// The text goes to a `.part` file first and is renamed into place, so a
/// failed write never leaves a truncated transcript behind.
pub fn persist(text: &str, audio_path: &Path) -> Result<PathBuf> {
    let output_path = output_path_for(audio_path);
    let part_path = output_path.with_extension("txt.part");

    let written = write_file(&part_path, text).and_then(|()| {
        std::fs::rename(&part_path, &output_path).map_err(|source| Error::Write {
            path: output_path.clone(),
            source,
        })
    });

    if let Err(e) = written {
        std::fs::remove_file(&part_path).ok();
        return Err(e);
    }

    info!(path = %output_path.display(), bytes = text.len(), "transcription saved");
    Ok(output_path)
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    let to_write_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(to_write_error)?;
    file.write_all(text.as_bytes()).map_err(to_write_error)?;
    file.sync_all().map_err(to_write_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("whisper_txt_writer_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_output_path_replaces_extension() {
        assert_eq!(
            output_path_for(Path::new("/data/Whisper/audiofile.mp3")),
            PathBuf::from("/data/Whisper/audiofile.txt")
        );
    }

    #[test]
    fn test_output_path_adds_missing_extension() {
        assert_eq!(
            output_path_for(Path::new("/data/Whisper/audiofile")),
            PathBuf::from("/data/Whisper/audiofile.txt")
        );
    }

    #[test]
    fn test_output_path_only_last_extension() {
        assert_eq!(
            output_path_for(Path::new("show.ep1.wav")),
            PathBuf::from("show.ep1.txt")
        );
    }

    #[test]
    fn test_persist_writes_utf8() {
        let dir = scratch_dir("utf8");
        let audio = dir.join("interview.m4a");

        let path = persist("Grüße aus Köln — 東京", &audio).unwrap();

        assert_eq!(path, dir.join("interview.txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "Grüße aus Köln — 東京");
        assert!(!dir.join("interview.txt.part").exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_persist_empty_text_creates_file() {
        let dir = scratch_dir("empty");
        let path = persist("", &dir.join("silence.wav")).unwrap();

        assert!(path.exists());
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_persist_overwrites_existing() {
        let dir = scratch_dir("overwrite");
        let audio = dir.join("audiofile.mp3");
        fs::write(dir.join("audiofile.txt"), "an older and much longer transcript").unwrap();

        let path = persist("new", &audio).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");

        persist("new", &audio).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_persist_missing_directory_is_write_error() {
        let dir = scratch_dir("no_parent");
        let audio = dir.join("gone").join("audiofile.mp3");

        let result = persist("text", &audio);
        match result {
            Err(Error::Write { path, .. }) => assert!(path.starts_with(dir.join("gone"))),
            other => panic!("expected write error, got {other:?}"),
        }

        fs::remove_dir_all(&dir).ok();
    }
}
