//! Common helpers for end-to-end tests.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, Response, header},
};
use tokio::sync::watch;
use tower::ServiceExt;

use crate::app::{AppState, router};
use crate::auth::{AuthConfig, AuthGate};
use crate::testing::ManualTimeSource;

pub const HOUR: u64 = 60 * 60;
pub const STREAM_INTERVAL: Duration = Duration::from_millis(50);

/// A fully wired router with a controllable clock.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub time: Arc<ManualTimeSource>,
    pub shutdown: watch::Sender<bool>,
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        Self::build(false)
    }

    #[must_use]
    pub fn with_protected_stream() -> Self {
        Self::build(true)
    }

    fn build(protect_stream: bool) -> Self {
        let time = Arc::new(ManualTimeSource::default());
        let gate = AuthGate::with_time_source(AuthConfig::default(), Arc::clone(&time) as _);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let state = AppState::new(gate, STREAM_INTERVAL, shutdown_rx);
        let router = router(state.clone(), protect_stream);

        Self {
            router,
            state,
            time,
            shutdown,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_with_token(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(
            Request::get(uri)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn delete(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Log in with the default credentials and return the token.
    pub async fn login(&self) -> String {
        let response = self
            .post_json("/login", r#"{"userid": "admin", "password": "admin"}"#)
            .await;
        assert_eq!(response.status(), 200);
        body_json(response).await["token"]
            .as_str()
            .expect("token is a string")
            .to_string()
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
