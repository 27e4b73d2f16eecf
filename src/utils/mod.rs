//! Utility modules for spike-fetch
//!
//! - `files`: output directory handling and image files
//! - `http`: HTTP client, retry policy and the `Fetcher` seam

pub mod files;
pub mod http;

#[cfg(test)]
pub mod mock_fetcher;
#[cfg(test)]
pub mod stub_server;
