//! JWT signing and verification module.
//!
//! Tokens are signed with HS256. Expiry is not checked here: callers compare
//! the decoded claims against their own time source so that tokens past
//! `exp` can still be inspected for refresh.
//!
//! # Pre-conditions
//! - The secret must be non-empty.
//!
//! # Post-conditions
//! - On success, `decode_claims` returns claims whose signature was verified.
//!
//! # Invariants
//! - Verification is stateless and does not modify any external state.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject claim containing the user identifier.
    pub sub: String,
    /// Issue time of this token, in seconds since Unix epoch.
    pub iat: u64,
    /// Expiry of this token, in seconds since Unix epoch.
    pub exp: u64,
    /// Issue time of the login that started this refresh chain.
    pub orig_iat: u64,
}

/// Error returned when JWT signing or verification fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwtError {
    /// The JWT signature is invalid.
    InvalidSignature,
    /// The JWT has expired.
    TokenExpired,
    /// The JWT is past its refresh window.
    RefreshExpired,
    /// The JWT is malformed or cannot be parsed.
    MalformedToken,
    /// The 'sub' claim is missing from the JWT.
    MissingSubClaim,
    /// The secret is unusable.
    InvalidKey(String),
    /// The token could not be signed.
    Encoding(String),
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSignature => write!(f, "invalid JWT signature"),
            Self::TokenExpired => write!(f, "JWT has expired"),
            Self::RefreshExpired => write!(f, "JWT is past its refresh window"),
            Self::MalformedToken => write!(f, "malformed JWT"),
            Self::MissingSubClaim => write!(f, "missing 'sub' claim in JWT"),
            Self::InvalidKey(reason) => write!(f, "invalid key: {reason}"),
            Self::Encoding(reason) => write!(f, "failed to sign JWT: {reason}"),
        }
    }
}

impl std::error::Error for JwtError {}

/// Signs claims with HS256.
///
/// # Errors
/// Returns `JwtError` if the secret is empty or signing fails.
pub fn sign(claims: &Claims, secret: &[u8]) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidKey("secret must be non-empty".to_string()));
    }

    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| JwtError::Encoding(e.to_string()))
}

/// Verifies the signature of an HS256 JWT and returns its claims.
///
/// Expiry is deliberately not validated; see the module docs.
///
/// # Errors
/// Returns `JwtError` if the token is malformed, the signature does not
/// match, or the subject is empty.
pub fn decode_claims(token: &str, secret: &[u8]) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidKey("secret must be non-empty".to_string()));
    }

    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(map_jwt_error)?;

    if token_data.claims.sub.is_empty() {
        return Err(JwtError::MissingSubClaim);
    }

    Ok(token_data.claims)
}

/// Maps jsonwebtoken errors to our JwtError type.
fn map_jwt_error(error: jsonwebtoken::errors::Error) -> JwtError {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        ErrorKind::MissingRequiredClaim(_) => JwtError::MissingSubClaim,
        _ => JwtError::MalformedToken,
    }
}
