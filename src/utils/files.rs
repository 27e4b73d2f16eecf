use crate::error::FetchError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

/// Extension given to every saved image
pub const IMAGE_EXTENSION: &str = "jpg";

/// Make sure `dir` exists, is a directory and accepts new files.
pub fn ensure_output_dir(dir: &Path) -> Result<PathBuf, FetchError> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        info!("Created directory: {}", dir.display());
    } else if !dir.is_dir() {
        return Err(FetchError::NotADirectory(dir.to_path_buf()));
    }

    // Probe with a throwaway file so a read-only directory fails up front
    let probe = dir.join(format!(".probe-{}", Uuid::new_v4()));
    fs::write(&probe, b"probe")?;
    let _ = fs::remove_file(&probe);

    Ok(dir.to_path_buf())
}

/// Fresh `<uuid>.jpg` path inside `dir`
pub fn unique_image_path(dir: &Path) -> PathBuf {
    dir.join(format!("{}.{}", Uuid::new_v4(), IMAGE_EXTENSION))
}

/// Write `bytes` to a new uniquely named image file under `dir`.
pub async fn save_image(dir: &Path, bytes: &[u8]) -> Result<PathBuf, FetchError> {
    let path = unique_image_path(dir);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Count the saved images in `dir`
pub fn count_saved_images(dir: &Path) -> io::Result<usize> {
    let count = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == IMAGE_EXTENSION)
        })
        .count();

    Ok(count)
}
