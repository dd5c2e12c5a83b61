//! Service configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.

use crate::auth::Capability;
use crate::error::ConfigError;
use mapsweep_catalog::SQLITE_MAX_PARAMS;
use mapsweep_ingest::DEFAULT_MAX_ENTRY_BYTES;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Multipart field carrying the annotation file
pub const DEFAULT_UPLOAD_FIELD: &str = "kmlFile";

/// Default upload ceiling (50 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Runtime configuration for the reconciliation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,
    /// SQLite catalog file
    pub database_path: PathBuf,
    /// Multipart field name for the uploaded file
    pub upload_field: String,
    /// Largest accepted upload
    pub max_upload_bytes: u64,
    /// Largest accepted KML entry inside a KMZ
    pub max_entry_bytes: u64,
    /// Parameter ceiling per catalog statement
    pub max_query_params: usize,
    /// Principal name → granted capabilities
    pub permissions: BTreeMap<String, Vec<Capability>>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            database_path: PathBuf::from("mapsweep.db"),
            upload_field: DEFAULT_UPLOAD_FIELD.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
            max_query_params: SQLITE_MAX_PARAMS,
            permissions: BTreeMap::new(),
        }
    }
}

impl ServiceConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on malformed TOML or unknown values
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// With listen address
    #[inline]
    #[must_use]
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// With catalog database path
    #[inline]
    #[must_use]
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// With KML entry ceiling
    #[inline]
    #[must_use]
    pub fn with_max_entry_bytes(mut self, limit: u64) -> Self {
        self.max_entry_bytes = limit;
        self
    }

    /// With a capability granted to a principal
    #[must_use]
    pub fn with_grant(mut self, principal: impl Into<String>, capability: Capability) -> Self {
        let caps = self.permissions.entry(principal.into()).or_default();
        if !caps.contains(&capability) {
            caps.push(capability);
        }
        self
    }
}
