use std::io::Write;
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::config::{MODEL_FILENAME, MODEL_NAME};
use crate::error::{Error, Result};

const HUGGINGFACE_BASE: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// Anything smaller than this is an error page, not a model.
const MIN_MODEL_BYTES: u64 = 1_000_000;

/// Resolve the model to a local file, downloading it into `cache_dir` if needed.
pub async fn ensure_model(cache_dir: &Path) -> Result<PathBuf> {
    let model_path = cache_dir.join(MODEL_FILENAME);

    if model_path.is_file() {
        info!(path = %model_path.display(), "model already cached");
        return Ok(model_path);
    }

    std::fs::create_dir_all(cache_dir).map_err(|e| {
        Error::Model(format!("failed to create cache dir {}: {e}", cache_dir.display()))
    })?;

    let url = format!("{HUGGINGFACE_BASE}/{MODEL_FILENAME}");
    info!(%url, model = MODEL_NAME, "downloading model, this can take a while on first run");
    download_model(&url, &model_path).await?;

    Ok(model_path)
}

async fn download_model(url: &str, dest: &Path) -> Result<()> {
    let response = reqwest::Client::new()
        .get(url)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| Error::ModelDownload(format!("HTTP error: {e}")))?;

    let total_size = response.content_length().unwrap_or(0);

    let pb = ProgressBar::new(total_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
            .expect("valid template")
            .progress_chars("#>-"),
    );
    pb.set_message(format!(
        "Downloading {}",
        dest.file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default()
    ));

    let part_path = part_path_for(dest);
    let written = stream_to_file(response, &part_path, &pb).await;
    let file_size = match written {
        Ok(size) => size,
        Err(e) => {
            pb.abandon();
            std::fs::remove_file(&part_path).ok();
            return Err(e);
        }
    };

    if file_size < MIN_MODEL_BYTES {
        pb.abandon();
        std::fs::remove_file(&part_path).ok();
        return Err(Error::ModelDownload(format!(
            "downloaded file too small ({file_size} bytes) — likely an error page"
        )));
    }

    std::fs::rename(&part_path, dest)?;
    pb.finish_with_message("Download complete");

    if total_size > 0 && file_size != total_size {
        warn!(
            expected = total_size,
            actual = file_size,
            "file size mismatch — model may be corrupt"
        );
    }

    info!(path = %dest.display(), size = file_size, "model saved");
    Ok(())
}

async fn stream_to_file(response: reqwest::Response, path: &Path, pb: &ProgressBar) -> Result<u64> {
    let mut file = std::fs::File::create(path)?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }

    file.flush()?;
    Ok(downloaded)
}

/// In-progress download path: `ggml-large-v3.bin` -> `ggml-large-v3.bin.part`.
fn part_path_for(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
