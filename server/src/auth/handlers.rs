//! Login, refresh and auth-check endpoints.

use std::sync::Arc;

use axum::{
    Extension, Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};

use crate::auth::gate::{AuthError, AuthGate};
use crate::auth::middleware::{Subject, extract_bearer};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default, alias = "username")]
    userid: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthedResponse {
    pub authed: String,
}

/// `POST /login`
///
/// An undecodable body is treated like a credential mismatch.
pub async fn login(
    State(gate): State<Arc<AuthGate>>,
    body: Bytes,
) -> Result<Json<TokenResponse>, ApiError> {
    let request: LoginRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("login rejected: undecodable body: {e}");
        gate.unauthorized()
    })?;

    match gate.login(&request.userid, &request.password) {
        Ok(token) => {
            tracing::info!("login succeeded for '{}'", request.userid);
            Ok(Json(TokenResponse { token }))
        }
        Err(e) => {
            tracing::warn!("login rejected for '{}': {e}", request.userid);
            Err(gate.unauthorized())
        }
    }
}

/// `GET /refresh_token`
///
/// Not wrapped by the bearer middleware: an expired token is still accepted
/// here as long as it is inside its refresh window.
pub async fn refresh_token(
    State(gate): State<Arc<AuthGate>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, ApiError> {
    extract_bearer(&headers)
        .ok_or(AuthError::MissingToken)
        .and_then(|token| gate.refresh(token))
        .map(|token| Json(TokenResponse { token }))
        .map_err(|e| {
            tracing::debug!("refresh rejected: {e}");
            gate.unauthorized()
        })
}

/// `GET /auth_test`
pub async fn auth_test(Extension(Subject(subject)): Extension<Subject>) -> Json<AuthedResponse> {
    Json(AuthedResponse { authed: subject })
}
