//! DNS lookup utility endpoint.

use std::net::IpAddr;

use axum::{Json, extract::Path};

use crate::error::ApiError;

/// `GET /lookup/{host}`
///
/// Resolves `host` with the system resolver and returns the distinct
/// addresses in resolver order.
pub async fn lookup(Path(host): Path<String>) -> Result<Json<Vec<String>>, ApiError> {
    let addresses = resolve(&host).await.map_err(|e| {
        tracing::warn!("lookup of '{host}' failed: {e}");
        ApiError::Internal(format!("lookup {host}: {e}"))
    })?;

    Ok(Json(addresses.iter().map(ToString::to_string).collect()))
}

async fn resolve(host: &str) -> std::io::Result<Vec<IpAddr>> {
    let mut addresses: Vec<IpAddr> = Vec::new();
    // The port is required by the resolver API and ignored here.
    for socket_addr in tokio::net::lookup_host((host, 0)).await? {
        let ip = socket_addr.ip();
        if !addresses.contains(&ip) {
            addresses.push(ip);
        }
    }

    if addresses.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such host",
        ));
    }
    Ok(addresses)
}
