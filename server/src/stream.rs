//! Unbounded, time-paced JSON event feed.
//!
//! Each `GET /stream` spawns a producer task that pushes one
//! newline-terminated JSON event per interval into a bounded channel. The
//! receiving end of the channel is the response body, so:
//!
//! - every event becomes its own chunk and is flushed as soon as it is sent
//! - when the peer disconnects the body is dropped, the channel closes, and
//!   the producer stops within one tick
//! - the producer also stops when the process-wide shutdown signal fires
//!
//! The feed never ends on its own.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tokio::sync::{mpsc, watch};

/// Per-server streaming settings, shared by every `/stream` request.
#[derive(Debug, Clone)]
pub struct StreamState {
    interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl StreamState {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);

    /// `shutdown` flips to `true` when open feeds should end.
    #[must_use]
    pub const fn new(interval: Duration, shutdown: watch::Receiver<bool>) -> Self {
        Self { interval, shutdown }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

#[derive(Debug, Serialize)]
struct Thing {
    #[serde(rename = "Name")]
    name: String,
}

/// `GET /stream`
pub async fn stream(State(state): State<StreamState>) -> Response {
    // Capacity 1: at most one event waits for a slow reader.
    let (tx, rx) = mpsc::channel::<Bytes>(1);
    tokio::spawn(produce(tx, state.interval, state.shutdown));

    let body = Body::from_stream(futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (Ok::<_, Infallible>(chunk), rx))
    }));

    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// Emit events until the receiver goes away or shutdown is signalled.
///
/// Returns the number of events delivered to the channel.
pub async fn produce(
    tx: mpsc::Sender<Bytes>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> u64 {
    tracing::debug!("stream opened");
    let mut sequence: u64 = 0;

    loop {
        let chunk = match encode_event(sequence + 1) {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::error!("failed to encode stream event: {e}");
                break;
            }
        };

        tokio::select! {
            sent = tx.send(chunk) => {
                if sent.is_err() {
                    tracing::debug!("stream peer disconnected");
                    break;
                }
                sequence += 1;
            }
            () = shutdown_requested(&mut shutdown) => break,
        }

        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            () = tx.closed() => {
                tracing::debug!("stream peer disconnected");
                break;
            }
            () = shutdown_requested(&mut shutdown) => break,
        }
    }

    tracing::debug!("stream closed after {sequence} events");
    sequence
}

fn encode_event(sequence: u64) -> serde_json::Result<Bytes> {
    let mut line = serde_json::to_vec(&Thing {
        name: format!("thing #{sequence}"),
    })?;
    line.push(b'\n');
    Ok(Bytes::from(line))
}

/// Resolves once shutdown is signalled. Never resolves if the signal's sender
/// is gone without having fired.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let signalled = shutdown.wait_for(|stop| *stop).await.is_ok();
    if !signalled {
        std::future::pending::<()>().await;
    }
}
