//! One-shot HTTP server for tests.
//!
//! Answers each incoming connection with the next queued response, then
//! stops listening once the queue is drained.

use super::http::{FetchedResponse, HttpFetcher, RetryPolicy, Timeouts};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start serving `responses` in order and return the base URL.
pub async fn serve(responses: Vec<FetchedResponse>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        for response in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let head = format!(
                "HTTP/1.1 {} Stub\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                response.status,
                response.body.len()
            );
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(&response.body).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}", addr)
}

/// URL of a local port with nothing listening on it.
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    format!("http://{}", addr)
}

/// URL of a server that accepts connections but never answers.
pub async fn stalled() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{}", addr)
}

/// Real HTTP fetcher that ignores proxy settings, for talking to the stub.
pub fn fetcher(retry: RetryPolicy) -> HttpFetcher {
    fetcher_with_timeouts(retry, Timeouts::default())
}

pub fn fetcher_with_timeouts(retry: RetryPolicy, timeouts: Timeouts) -> HttpFetcher {
    HttpFetcher::from_builder(reqwest::Client::builder().no_proxy(), retry, timeouts).unwrap()
}
