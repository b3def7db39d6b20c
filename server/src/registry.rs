//! In-memory registry of countries, keyed by country code.
//!
//! # Thread Safety
//!
//! The registry uses a single `RwLock` over the whole map:
//! - Multiple threads can read simultaneously
//! - Writes acquire exclusive access, excluding readers and other writers
//!
//! # Invariants
//!
//! - Each code maps to exactly one `Country`
//! - Every read returns an owned copy; callers never hold references into the map
//! - The lock is held only for the map access itself, never across serialization

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// A country record.
///
/// Serialized as `{"Code": ..., "Name": ...}`. Lowercase field names are
/// accepted on input, and missing fields decode as empty strings so that
/// validation (not the decoder) reports them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Country {
    #[serde(default, alias = "code")]
    pub code: String,
    #[serde(default, alias = "name")]
    pub name: String,
}

impl Country {
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Error returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A thread panicked while holding the registry lock.
    LockPoisoned,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LockPoisoned => write!(f, "country registry lock poisoned"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Thread-safe store of countries.
///
/// Constructed explicitly and shared through `Arc`; there is no global instance.
#[derive(Debug, Default)]
pub struct CountryRegistry {
    countries: RwLock<HashMap<String, Country>>,
}

impl CountryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a country by code.
    ///
    /// Returns a copy of the stored record, or `None` if the code is absent.
    pub fn get(&self, code: &str) -> Result<Option<Country>, RegistryError> {
        let countries = self
            .countries
            .read()
            .map_err(|_| RegistryError::LockPoisoned)?;
        Ok(countries.get(code).cloned())
    }

    /// Snapshot every country at one instant.
    ///
    /// Order is unspecified.
    pub fn get_all(&self) -> Result<Vec<Country>, RegistryError> {
        let countries = self
            .countries
            .read()
            .map_err(|_| RegistryError::LockPoisoned)?;
        Ok(countries.values().cloned().collect())
    }

    /// Insert a country, fully replacing any record with the same code.
    ///
    /// # Pre-conditions
    ///
    /// - `country.code` and `country.name` are non-empty. Callers validate
    ///   before writing; the registry does not re-check.
    pub fn put(&self, country: Country) -> Result<(), RegistryError> {
        debug_assert!(!country.code.is_empty(), "country code must not be empty");
        let mut countries = self
            .countries
            .write()
            .map_err(|_| RegistryError::LockPoisoned)?;
        countries.insert(country.code.clone(), country);
        Ok(())
    }

    /// Remove a country. Removing an absent code is not an error.
    ///
    /// Returns whether a record was removed.
    pub fn delete(&self, code: &str) -> Result<bool, RegistryError> {
        let mut countries = self
            .countries
            .write()
            .map_err(|_| RegistryError::LockPoisoned)?;
        Ok(countries.remove(code).is_some())
    }

    /// Number of countries at one instant.
    pub fn len(&self) -> Result<usize, RegistryError> {
        let countries = self
            .countries
            .read()
            .map_err(|_| RegistryError::LockPoisoned)?;
        Ok(countries.len())
    }

    pub fn is_empty(&self) -> Result<bool, RegistryError> {
        Ok(self.len()? == 0)
    }
}
