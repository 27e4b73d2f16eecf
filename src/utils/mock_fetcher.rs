use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::http::{FetchedResponse, Fetcher};
use crate::error::FetchError;

/// Replays queued outcomes in order; fails like a refused connection once empty.
pub struct MockFetcher {
    responses: Mutex<VecDeque<Result<FetchedResponse, FetchError>>>,
    calls: AtomicUsize,
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, _url: &str) -> Result<FetchedResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut responses = self.responses.lock().unwrap();

        responses.pop_front().unwrap_or_else(|| {
            Err(FetchError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "no queued response",
            )))
        })
    }
}

impl MockFetcher {
    pub fn new(responses: Vec<Result<FetchedResponse, FetchError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn ok(responses: Vec<FetchedResponse>) -> Self {
        Self::new(responses.into_iter().map(Ok).collect())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FetchedResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, body.into())
    }

    pub fn status(status: u16) -> Self {
        Self::new(status, Vec::new())
    }
}
