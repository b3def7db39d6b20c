//! CRUD endpoints over the country registry.
//!
//! Registry calls return owned copies, so no lock is held while the response
//! is serialized.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};

use crate::error::ApiError;
use crate::registry::{Country, CountryRegistry};

/// `GET /countries`
pub async fn list(
    State(registry): State<Arc<CountryRegistry>>,
) -> Result<Json<Vec<Country>>, ApiError> {
    Ok(Json(registry.get_all()?))
}

/// `GET /countries/{code}`
pub async fn read(
    State(registry): State<Arc<CountryRegistry>>,
    Path(code): Path<String>,
) -> Result<Json<Country>, ApiError> {
    registry.get(&code)?.map(Json).ok_or(ApiError::NotFound)
}

/// `POST /countries`
///
/// Creates or fully replaces the country at the posted code.
pub async fn create(
    State(registry): State<Arc<CountryRegistry>>,
    body: Bytes,
) -> Result<Json<Country>, ApiError> {
    let country: Country =
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
    validate(&country)?;

    registry.put(country.clone())?;
    tracing::debug!("stored country '{}'", country.code);
    Ok(Json(country))
}

/// `DELETE /countries/{code}`
///
/// Succeeds whether or not the code was present.
pub async fn delete(
    State(registry): State<Arc<CountryRegistry>>,
    Path(code): Path<String>,
) -> Result<(), ApiError> {
    if registry.delete(&code)? {
        tracing::debug!("deleted country '{code}'");
    }
    Ok(())
}

/// Checked in a fixed order: code first, then name.
fn validate(country: &Country) -> Result<(), ApiError> {
    if country.code.is_empty() {
        return Err(ApiError::Validation("country code required".to_string()));
    }
    if country.name.is_empty() {
        return Err(ApiError::Validation("country name required".to_string()));
    }
    Ok(())
}
