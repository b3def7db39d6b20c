//! Token issuance, verification and refresh.
//!
//! Per-token lifecycle:
//! `issued -> valid -> (refreshed -> valid)* -> expired-but-refreshable -> expired-terminal`.
//!
//! Nothing is stored server-side; every decision is made from the token's
//! signed claims and the gate's time source.

use std::sync::Arc;

use crate::auth::config::AuthConfig;
use crate::auth::jwt::{self, Claims, JwtError};
use crate::error::ApiError;
use crate::time::{SystemTimeSource, TimeSource};

/// Reason an authentication attempt was rejected.
///
/// Only logged; clients always see the same unauthorized response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The login pair did not match the configured identity.
    InvalidCredentials,
    /// No bearer token was presented.
    MissingToken,
    /// The token failed verification.
    Token(JwtError),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::MissingToken => write!(f, "missing bearer token"),
            Self::Token(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<JwtError> for AuthError {
    fn from(error: JwtError) -> Self {
        Self::Token(error)
    }
}

/// Issues and verifies bearer tokens for a single configured identity.
pub struct AuthGate {
    config: AuthConfig,
    time: Arc<dyn TimeSource>,
}

impl AuthGate {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        Self::with_time_source(config, Arc::new(SystemTimeSource))
    }

    #[must_use]
    pub fn with_time_source(config: AuthConfig, time: Arc<dyn TimeSource>) -> Self {
        Self { config, time }
    }

    #[must_use]
    pub fn realm(&self) -> &str {
        self.config.realm()
    }

    /// The uniform rejection returned for every authentication failure.
    #[must_use]
    pub fn unauthorized(&self) -> ApiError {
        ApiError::Unauthorized {
            realm: self.config.realm().to_string(),
        }
    }

    /// Check a credential pair and mint a fresh token.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidCredentials` for any mismatch, without
    /// distinguishing an unknown user from a wrong password.
    pub fn login(&self, user_id: &str, password: &str) -> Result<String, AuthError> {
        let expected = self.config.credentials();
        // Evaluate both comparisons so the two failure modes take the same path.
        let user_matches = user_id == expected.user_id;
        let password_matches = password == expected.password;
        if !(user_matches & password_matches) {
            return Err(AuthError::InvalidCredentials);
        }

        let now = self.time.now_secs();
        self.mint(user_id, now, now)
    }

    /// Verify a token and return its subject.
    ///
    /// # Errors
    /// Returns an error if the token is malformed, signed with another key,
    /// or past its expiry.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let claims = jwt::decode_claims(token, self.config.secret())?;
        if self.time.now_secs() > claims.exp {
            return Err(JwtError::TokenExpired.into());
        }
        Ok(claims.sub)
    }

    /// Exchange a valid or recently expired token for a new one.
    ///
    /// The refresh window is measured from the original login, so a chain of
    /// refreshes cannot extend a session past `max_refresh`.
    ///
    /// # Errors
    /// Returns an error if the token is malformed, signed with another key,
    /// or past its refresh window.
    pub fn refresh(&self, token: &str) -> Result<String, AuthError> {
        let claims = jwt::decode_claims(token, self.config.secret())?;
        let now = self.time.now_secs();
        let refresh_deadline = claims
            .orig_iat
            .saturating_add(self.config.max_refresh().as_secs());
        if now > refresh_deadline {
            return Err(JwtError::RefreshExpired.into());
        }
        self.mint(&claims.sub, claims.orig_iat, now)
    }

    fn mint(&self, subject: &str, orig_iat: u64, now: u64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now.saturating_add(self.config.timeout().as_secs()),
            orig_iat,
        };
        Ok(jwt::sign(&claims, self.config.secret())?)
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
