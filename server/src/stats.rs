//! Request statistics: counts per status code and cumulative response time.
//!
//! [`track`] wraps every route; [`stats`] serves the current snapshot.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::Serialize;

use crate::error::ApiError;
use crate::time::{SystemTimeSource, TimeSource};

#[derive(Debug, Default)]
struct Counters {
    status_code_count: BTreeMap<u16, u64>,
    total_count: u64,
    total_response_time: Duration,
}

/// Shared request counters.
#[derive(Debug)]
pub struct RequestStats {
    started: Instant,
    counters: Mutex<Counters>,
}

/// Point-in-time view of [`RequestStats`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatsSnapshot {
    pub pid: u32,
    pub up_time: String,
    pub up_time_sec: f64,
    pub time_unix: u64,
    pub status_code_count: BTreeMap<String, u64>,
    pub total_count: u64,
    pub total_response_time: String,
    pub total_response_time_sec: f64,
    pub average_response_time: String,
    pub average_response_time_sec: f64,
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestStats {
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            counters: Mutex::new(Counters::default()),
        }
    }

    /// Record one completed response.
    pub fn record(&self, status: u16, elapsed: Duration) {
        let Ok(mut counters) = self.counters.lock() else {
            tracing::warn!("request stats lock poisoned; dropping sample");
            return;
        };
        *counters.status_code_count.entry(status).or_insert(0) += 1;
        counters.total_count += 1;
        counters.total_response_time += elapsed;
    }

    pub fn snapshot(&self) -> Result<StatsSnapshot, ApiError> {
        let (status_code_count, total_count, total_response_time) = {
            let counters = self
                .counters
                .lock()
                .map_err(|_| ApiError::Internal("request stats lock poisoned".to_string()))?;
            (
                counters.status_code_count.clone(),
                counters.total_count,
                counters.total_response_time,
            )
        };

        let up_time = self.started.elapsed();
        let average_response_time = u32::try_from(total_count)
            .ok()
            .and_then(|count| total_response_time.checked_div(count))
            .unwrap_or_default();

        Ok(StatsSnapshot {
            pid: std::process::id(),
            up_time: format!("{up_time:?}"),
            up_time_sec: up_time.as_secs_f64(),
            time_unix: SystemTimeSource.now_secs(),
            status_code_count: status_code_count
                .into_iter()
                .map(|(status, count)| (status.to_string(), count))
                .collect(),
            total_count,
            total_response_time: format!("{total_response_time:?}"),
            total_response_time_sec: total_response_time.as_secs_f64(),
            average_response_time: format!("{average_response_time:?}"),
            average_response_time_sec: average_response_time.as_secs_f64(),
        })
    }
}

/// Middleware recording the status and latency of every response.
pub async fn track(State(stats): State<Arc<RequestStats>>, req: Request, next: Next) -> Response {
    let started = Instant::now();
    let response = next.run(req).await;
    stats.record(response.status().as_u16(), started.elapsed());
    response
}

/// `GET /stats`
pub async fn stats(State(stats): State<Arc<RequestStats>>) -> Result<Json<StatsSnapshot>, ApiError> {
    stats.snapshot().map(Json)
}
