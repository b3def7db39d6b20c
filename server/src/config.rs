//! Server configuration module.
//!
//! Configuration is read from the command line, with an environment variable
//! fallback.
//!
//! # Flags
//!
//! - `--port <PORT>` / `COUNTRY_SERVER_PORT`: Port to listen on (default: `9999`)
//!
//! # Invariants
//!
//! - `listen_port` is always a valid port number (1-65535)

use std::net::{Ipv4Addr, SocketAddr};

use clap::Parser;

/// Server configuration.
///
/// # Post-conditions
///
/// - `listen_port` is always in the valid range (1-65535)
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "country-server", about = "In-memory country registry over HTTP")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(
        long = "port",
        env = "COUNTRY_SERVER_PORT",
        default_value = "9999",
        value_parser = parse_port
    )]
    pub listen_port: u16,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A value could not be parsed.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    /// Default port for the server.
    pub const DEFAULT_PORT: u16 = 9999;

    /// Parse configuration from the given arguments (first item is the binary name).
    ///
    /// # Errors
    ///
    /// Returns an error if an argument is unknown or the port is not a valid port number.
    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    /// Address the server binds: all IPv4 interfaces on `listen_port`.
    #[must_use]
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.listen_port))
    }
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    match value.parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(ConfigError::InvalidValue {
            name: "port".to_string(),
            message: format!("'{value}' is not a valid port number (must be 1-65535)"),
        }),
    }
}
