//! Authentication configuration.
//!
//! # Pre-conditions
//! - The signing secret must be non-empty.
//! - The refresh window must be at least as long as the token timeout.
//!
//! # Post-conditions
//! - `AuthConfig` instances are immutable once created.
//!
//! # Invariants
//! - Exactly one identity/secret pair is accepted at login.

use std::time::Duration;

/// Error returned when authentication configuration is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthConfigError {
    /// The HS256 secret is empty.
    EmptySecret,
    /// The configured user id is empty.
    EmptyUserId,
    /// The refresh window is shorter than the token timeout.
    RefreshShorterThanTimeout,
}

impl std::fmt::Display for AuthConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySecret => write!(f, "HS256 secret must not be empty"),
            Self::EmptyUserId => write!(f, "user id must not be empty"),
            Self::RefreshShorterThanTimeout => {
                write!(f, "max refresh window must not be shorter than the token timeout")
            }
        }
    }
}

impl std::error::Error for AuthConfigError {}

/// The single identity accepted by the login endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Token signing and lifetime configuration.
#[derive(Clone)]
pub struct AuthConfig {
    secret: Vec<u8>,
    realm: String,
    timeout: Duration,
    max_refresh: Duration,
    credentials: Credentials,
}

impl AuthConfig {
    pub const DEFAULT_SECRET: &'static [u8] = b"secret key";
    pub const DEFAULT_REALM: &'static str = "jwt auth";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60 * 60);
    pub const DEFAULT_MAX_REFRESH: Duration = Duration::from_secs(24 * 60 * 60);
    pub const DEFAULT_USER_ID: &'static str = "admin";
    pub const DEFAULT_PASSWORD: &'static str = "admin";

    /// Create a configuration with the default realm and lifetimes.
    ///
    /// # Errors
    /// Returns an error if the secret or user id is empty.
    pub fn new(secret: Vec<u8>, credentials: Credentials) -> Result<Self, AuthConfigError> {
        if secret.is_empty() {
            return Err(AuthConfigError::EmptySecret);
        }
        if credentials.user_id.is_empty() {
            return Err(AuthConfigError::EmptyUserId);
        }
        Ok(Self {
            secret,
            realm: Self::DEFAULT_REALM.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
            max_refresh: Self::DEFAULT_MAX_REFRESH,
            credentials,
        })
    }

    /// Override the token timeout and refresh window.
    ///
    /// # Errors
    /// Returns an error if `max_refresh` is shorter than `timeout`.
    pub fn with_lifetimes(
        mut self,
        timeout: Duration,
        max_refresh: Duration,
    ) -> Result<Self, AuthConfigError> {
        if max_refresh < timeout {
            return Err(AuthConfigError::RefreshShorterThanTimeout);
        }
        self.timeout = timeout;
        self.max_refresh = max_refresh;
        Ok(self)
    }

    #[must_use]
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    #[must_use]
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    #[must_use]
    pub fn realm(&self) -> &str {
        &self.realm
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub const fn max_refresh(&self) -> Duration {
        self.max_refresh
    }

    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: Self::DEFAULT_SECRET.to_vec(),
            realm: Self::DEFAULT_REALM.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
            max_refresh: Self::DEFAULT_MAX_REFRESH,
            credentials: Credentials {
                user_id: Self::DEFAULT_USER_ID.to_string(),
                password: Self::DEFAULT_PASSWORD.to_string(),
            },
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("realm", &self.realm)
            .field("timeout", &self.timeout)
            .field("max_refresh", &self.max_refresh)
            .field("credentials", &self.credentials)
            .finish()
    }
}
