//! Authentication module.
//!
//! Stateless bearer-token authentication for a single configured identity.
//!
//! # Pre-conditions
//! - The signing secret is non-empty.
//!
//! # Post-conditions
//! - Authentication configuration is immutable once loaded.
//!
//! # Invariants
//! - Every authentication failure produces the same client-visible response.

pub mod config;
pub mod gate;
pub mod handlers;
pub mod jwt;
pub mod middleware;

pub use config::{AuthConfig, AuthConfigError, Credentials};
pub use gate::{AuthError, AuthGate};
pub use middleware::{Subject, require_bearer};
