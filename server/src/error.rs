//! HTTP error responses.
//!
//! Every per-request failure is converted into an `ApiError` at the handler
//! boundary. Bodies use the `{"Error": message}` envelope.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::registry::RegistryError;

/// Message carried by 404 responses.
pub const NOT_FOUND_MESSAGE: &str = "Resource not found";
/// Message carried by every 401 response, whatever check failed.
pub const UNAUTHORIZED_MESSAGE: &str = "Not Authorized";

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    #[serde(rename = "Error")]
    error: &'a str,
}

/// Error returned from request handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A required field is missing or empty.
    Validation(String),
    /// The request body could not be decoded.
    Decode(String),
    /// The requested resource does not exist.
    NotFound,
    /// Authentication failed. Carries the realm for `WWW-Authenticate`.
    Unauthorized { realm: String },
    /// An infrastructure failure (DNS, lock poisoning).
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            // Malformed bodies keep the server-error status existing clients rely on.
            Self::Decode(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Validation(message) | Self::Decode(message) | Self::Internal(message) => {
                message
            }
            Self::NotFound => NOT_FOUND_MESSAGE,
            Self::Unauthorized { .. } => UNAUTHORIZED_MESSAGE,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message(), self.status().as_u16())
    }
}

impl std::error::Error for ApiError {}

impl From<RegistryError> for ApiError {
    fn from(error: RegistryError) -> Self {
        Self::Internal(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(message) = &self {
            tracing::error!("internal error: {message}");
        }

        let mut response = (
            self.status(),
            Json(ErrorBody {
                error: self.message(),
            }),
        )
            .into_response();

        if let Self::Unauthorized { realm } = &self {
            match HeaderValue::from_str(&format!("JWT realm=\"{realm}\"")) {
                Ok(value) => {
                    response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
                }
                Err(e) => tracing::warn!("invalid realm for WWW-Authenticate: {e}"),
            }
        }

        response
    }
}
