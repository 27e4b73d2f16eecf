use crate::error::FetchError;
use crate::utils::files::{count_saved_images, ensure_output_dir, save_image};
use crate::utils::http::{Fetcher, HttpFetcher};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Endpoint answering every GET with a different random image
pub const IMAGE_URL: &str = "https://picsum.photos/200/300";

pub const DEFAULT_OUTPUT_DIR: &str = "downloaded_images";

/// Wall-clock window the fetch loop runs for
pub const FETCH_WINDOW: Duration = Duration::from_secs(60);

/// Fetch a single image into memory.
///
/// Anything but a 200 is reported as [`FetchError::Status`].
pub async fn fetch_image<F: Fetcher>(fetcher: &F, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = fetcher.fetch(url).await?;

    if !response.is_ok() {
        return Err(FetchError::Status(response.status));
    }

    Ok(response.body)
}

async fn try_fetch_and_save<F: Fetcher>(
    fetcher: &F,
    url: &str,
    output_dir: &Path,
) -> Result<PathBuf, FetchError> {
    let body = fetch_image(fetcher, url).await?;
    save_image(output_dir, &body).await
}

/// Fetch one image and save it under `output_dir`.
///
/// Returns 1 when a file was written and 0 otherwise. Failures are logged,
/// never propagated, so a caller can keep looping. Logs are emitted with
/// `progress` suspended so they do not tear its line.
pub async fn fetch_and_save<F: Fetcher>(
    fetcher: &F,
    url: &str,
    output_dir: &Path,
    progress: &ProgressBar,
) -> usize {
    match try_fetch_and_save(fetcher, url, output_dir).await {
        Ok(path) => {
            progress.suspend(|| debug!("Saved image: {}", path.display()));
            1
        }
        Err(e) => {
            progress.suspend(|| error!("Error downloading or saving image: {}", e));
            0
        }
    }
}

/// Call [`fetch_and_save`] back to back until `duration` has elapsed.
///
/// The deadline is checked before each request, so a request already in
/// flight always completes. Returns the number of images saved.
pub async fn run_for_duration<F: Fetcher>(
    fetcher: &F,
    url: &str,
    output_dir: &Path,
    duration: Duration,
    progress: &ProgressBar,
) -> usize {
    let start = Instant::now();
    let mut image_count = 0;

    while start.elapsed() < duration {
        image_count += fetch_and_save(fetcher, url, output_dir, progress).await;
        progress.set_message(format!("{} images saved", image_count));
        progress.tick();
    }

    image_count
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Download random images into `output_dir` for one fetch window.
pub async fn run(output_dir: &str) -> Result<usize, FetchError> {
    let output_dir = ensure_output_dir(Path::new(output_dir))?;
    let fetcher = HttpFetcher::new()?;

    info!(
        "Downloading from {} into {} for {}s",
        IMAGE_URL,
        output_dir.display(),
        FETCH_WINDOW.as_secs()
    );

    let progress = spinner();
    let image_count =
        run_for_duration(&fetcher, IMAGE_URL, &output_dir, FETCH_WINDOW, &progress).await;
    progress.finish_and_clear();

    println!(
        "Completed downloading images for 1 minute. Total images downloaded: {}",
        image_count
    );

    match count_saved_images(&output_dir) {
        Ok(total) => info!("{} now holds {} images", output_dir.display(), total),
        Err(e) => warn!("Could not count images in {}: {}", output_dir.display(), e),
    }

    Ok(image_count)
}
