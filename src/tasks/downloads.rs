use crate::error::FetchError;
use crate::utils::http::{Fetcher, HttpFetcher};
use serde::Deserialize;
use std::fmt;
use tracing::{info, warn};

pub const REGISTRY_API: &str = "https://crates.io/api/v1/crates";

/// Crates whose totals are reported, in output order
pub const TRACKED_CRATES: [&str; 2] = ["reqwest", "hyper"];

/// Printed in place of a count that could not be fetched
pub const UNAVAILABLE: &str = "Error fetching data";

#[derive(Debug, Deserialize)]
struct CrateResponse {
    #[serde(rename = "crate")]
    krate: CrateSummary,
}

#[derive(Debug, Deserialize)]
struct CrateSummary {
    downloads: u64,
}

/// All-time download total of a crate, or the sentinel when the registry
/// could not be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadCount {
    Count(u64),
    Unavailable,
}

impl fmt::Display for DownloadCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadCount::Count(n) => write!(f, "{}", n),
            DownloadCount::Unavailable => f.write_str(UNAVAILABLE),
        }
    }
}

pub fn crate_url(name: &str) -> String {
    format!("{}/{}", REGISTRY_API, name)
}

/// Look up `crate.downloads` at `url`.
///
/// Non-200 statuses and transport failures are logged and reported as
/// [`DownloadCount::Unavailable`]. A 200 whose body has another shape is a
/// [`FetchError::Parse`].
pub async fn get_download_count<F: Fetcher>(
    fetcher: &F,
    url: &str,
) -> Result<DownloadCount, FetchError> {
    let response = match fetcher.fetch(url).await {
        Ok(response) => response,
        Err(e) => {
            warn!("Request to {} failed: {}", url, e);
            return Ok(DownloadCount::Unavailable);
        }
    };

    if !response.is_ok() {
        warn!("{} returned status {}", url, response.status);
        return Ok(DownloadCount::Unavailable);
    }

    let data: CrateResponse = serde_json::from_slice(&response.body)?;
    Ok(DownloadCount::Count(data.krate.downloads))
}

/// Fetch every URL in order and join the results with single spaces.
pub async fn report<F: Fetcher>(fetcher: &F, urls: &[String]) -> Result<String, FetchError> {
    let mut counts = Vec::with_capacity(urls.len());

    for url in urls {
        counts.push(get_download_count(fetcher, url).await?.to_string());
    }

    Ok(counts.join(" "))
}

/// Print the download totals of the tracked crates on one line.
pub async fn run() -> Result<(), FetchError> {
    let fetcher = HttpFetcher::new()?;
    let urls: Vec<String> = TRACKED_CRATES.iter().map(|name| crate_url(name)).collect();

    info!("Querying {} for {}", REGISTRY_API, TRACKED_CRATES.join(", "));

    let line = report(&fetcher, &urls).await?;
    println!("{}", line);

    Ok(())
}
