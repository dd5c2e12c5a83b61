//! Error types for Mapsweep Core
//!
//! Every failure is terminal for the request and reported once:
//! - Permission denials (403)
//! - Validation failures on the upload or its content (400)
//! - Catalog failures (500), logged and never retried

use mapsweep_catalog::CatalogError;
use mapsweep_ingest::IngestError;
use std::path::PathBuf;

/// Main reconciliation error type
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// Permission collaborator denied the request
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Upload or its content failed validation
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationFailure),

    /// Catalog query or delete failed
    #[error("store failure: {0}")]
    Store(#[from] CatalogError),
}

impl ReconcileError {
    /// HTTP-equivalent status for this error
    #[inline]
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 403,
            Self::Validation(_) => 400,
            Self::Store(_) => 500,
        }
    }

    /// Human-readable message for the caller
    ///
    /// Store failures carry an opaque diagnostic that clients must not parse.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized(reason) => reason.clone(),
            Self::Validation(failure) => failure.to_string(),
            Self::Store(err) => format!("Error deleting maps: {err}"),
        }
    }
}

impl From<IngestError> for ReconcileError {
    fn from(err: IngestError) -> Self {
        Self::Validation(err.into())
    }
}

/// Reasons an upload is rejected before the catalog is touched
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    /// No file under the upload field
    #[error("No file uploaded")]
    MissingFile,

    /// Extension is neither `.kml` nor `.kmz`
    #[error("Invalid file type. Only .kml and .kmz files are allowed")]
    UnsupportedFormat,

    /// KMZ could not be opened as an archive
    #[error("Could not read KMZ archive: {0}")]
    MalformedArchive(String),

    /// KMZ holds no `.kml` entry
    #[error("No KML file found inside the KMZ archive")]
    NoMarkupEntryFound,

    /// Upload or archive entry exceeds a configured ceiling
    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    /// Multipart body could not be read
    #[error("Could not read uploaded file: {0}")]
    UnreadableUpload(String),

    /// Extraction produced an empty candidate set
    #[error("No area names found in the KML file")]
    NoAreaNames,
}

impl From<IngestError> for ValidationFailure {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::UnsupportedFormat { .. } => Self::UnsupportedFormat,
            IngestError::MalformedArchive(detail) => Self::MalformedArchive(detail),
            IngestError::NoMarkupEntryFound => Self::NoMarkupEntryFound,
            IngestError::EntryTooLarge { entry, limit, .. } => {
                Self::PayloadTooLarge(format!("'{entry}' exceeds the {limit} byte limit"))
            }
        }
    }
}

/// Errors while loading service configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::ServiceConfig`]
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type alias for reconciliation operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ReconcileError::Unauthorized("no".into()).status_code(), 403);
        assert_eq!(ReconcileError::from(ValidationFailure::NoAreaNames).status_code(), 400);
        let store: ReconcileError = CatalogError::Unavailable("down".into()).into();
        assert_eq!(store.status_code(), 500);
    }

    #[test]
    fn ingest_errors_become_validation_failures() {
        let err: ReconcileError = IngestError::NoMarkupEntryFound.into();
        assert_eq!(err.user_message(), "No KML file found inside the KMZ archive");

        let err: ReconcileError = IngestError::unsupported("x.shp").into();
        assert!(matches!(
            err,
            ReconcileError::Validation(ValidationFailure::UnsupportedFormat)
        ));
    }

    #[test]
    fn unauthorized_message_passes_through() {
        let err = ReconcileError::Unauthorized("You do not have permission to delete maps".into());
        assert_eq!(err.user_message(), "You do not have permission to delete maps");
    }

    #[test]
    fn store_message_is_prefixed() {
        let err: ReconcileError = CatalogError::TaskFailed("worker panicked".into()).into();
        assert!(err.user_message().starts_with("Error deleting maps:"));
    }
}
