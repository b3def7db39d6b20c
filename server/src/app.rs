//! Application state and routing table.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::{get, post},
};
use tokio::sync::watch;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::auth::{self, AuthConfig, AuthGate};
use crate::handlers::{self, countries, lookup};
use crate::registry::CountryRegistry;
use crate::stats::{self, RequestStats};
use crate::stream::{self, StreamState};

/// Options that shape the routing table.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub auth: AuthConfig,
    pub stream_interval: Duration,
    /// Put `/stream` behind the bearer-token gate.
    pub protect_stream: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            auth: AuthConfig::default(),
            stream_interval: StreamState::DEFAULT_INTERVAL,
            protect_stream: false,
        }
    }
}

/// State shared by every handler.
///
/// Handlers extract only the part they need through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<CountryRegistry>,
    gate: Arc<AuthGate>,
    stats: Arc<RequestStats>,
    stream: StreamState,
}

impl AppState {
    /// `shutdown` is forwarded to every open stream.
    #[must_use]
    pub fn new(gate: AuthGate, stream_interval: Duration, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            registry: Arc::new(CountryRegistry::new()),
            gate: Arc::new(gate),
            stats: Arc::new(RequestStats::new()),
            stream: StreamState::new(stream_interval, shutdown),
        }
    }

    #[must_use]
    pub const fn registry(&self) -> &Arc<CountryRegistry> {
        &self.registry
    }

    #[must_use]
    pub const fn stats(&self) -> &Arc<RequestStats> {
        &self.stats
    }
}

impl FromRef<AppState> for Arc<CountryRegistry> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.registry)
    }
}

impl FromRef<AppState> for Arc<AuthGate> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.gate)
    }
}

impl FromRef<AppState> for Arc<RequestStats> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.stats)
    }
}

impl FromRef<AppState> for StreamState {
    fn from_ref(state: &AppState) -> Self {
        state.stream.clone()
    }
}

/// Build the full router.
///
/// Layer order, outermost first: tracing, statistics, panic recovery.
pub fn router(state: AppState, protect_stream: bool) -> Router {
    let mut public = Router::new()
        .route("/", get(handlers::root))
        .route("/lookup/{host}", get(lookup::lookup))
        .route("/countries", get(countries::list).post(countries::create))
        .route(
            "/countries/{code}",
            get(countries::read).delete(countries::delete),
        )
        .route("/stats", get(stats::stats))
        .route("/login", post(auth::handlers::login))
        .route("/refresh_token", get(auth::handlers::refresh_token));

    let mut protected = Router::new().route("/auth_test", get(auth::handlers::auth_test));

    if protect_stream {
        protected = protected.route("/stream", get(stream::stream));
    } else {
        public = public.route("/stream", get(stream::stream));
    }

    let protected = protected.route_layer(middleware::from_fn_with_state(
        Arc::clone(&state.gate),
        auth::require_bearer,
    ));

    public
        .merge(protected)
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.stats),
            stats::track,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
