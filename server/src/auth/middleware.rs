//! Bearer-token middleware for protected routes.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::auth::gate::{AuthError, AuthGate};
use crate::error::ApiError;

/// The verified identity of the caller, attached to request extensions by
/// [`require_bearer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject(pub String);

/// Reject the request unless it carries a valid bearer token.
///
/// Fails closed: the wrapped handler never runs for a missing, malformed,
/// forged or expired token.
pub async fn require_bearer(
    State(gate): State<Arc<AuthGate>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let subject = extract_bearer(req.headers())
        .ok_or(AuthError::MissingToken)
        .and_then(|token| gate.verify(token))
        .map_err(|e| {
            tracing::debug!("rejected {} {}: {e}", req.method(), req.uri().path());
            gate.unauthorized()
        })?;

    req.extensions_mut().insert(Subject(subject));
    Ok(next.run(req).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
