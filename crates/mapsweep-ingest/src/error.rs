//! Error types for the ingest layer
//!
//! Covers the failures an uploaded annotation file can produce before any
//! area names are extracted:
//! - Unsupported file extensions
//! - Archives that cannot be opened or read
//! - Archives without a KML entry
//! - Entries exceeding the configured size ceiling

/// Errors raised while turning an upload into a markup payload
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Filename does not end in `.kml` or `.kmz`
    #[error("unsupported file format: '{filename}'")]
    UnsupportedFormat {
        /// Filename as uploaded
        filename: String,
    },

    /// The KMZ payload is not a readable zip archive
    #[error("malformed archive: {0}")]
    MalformedArchive(String),

    /// The KMZ archive holds no entry ending in `.kml`
    #[error("no KML entry found inside the KMZ archive")]
    NoMarkupEntryFound,

    /// The selected KML entry is larger than the configured ceiling
    #[error("archive entry '{entry}' is {size} bytes, limit is {limit}")]
    EntryTooLarge {
        /// Entry name inside the archive
        entry: String,
        /// Declared uncompressed size
        size: u64,
        /// Configured ceiling
        limit: u64,
    },
}

impl IngestError {
    /// Create unsupported-format error for a filename
    pub fn unsupported(filename: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            filename: filename.into(),
        }
    }

    /// Create malformed-archive error from any displayable cause
    pub fn malformed(cause: impl std::fmt::Display) -> Self {
        Self::MalformedArchive(cause.to_string())
    }
}

impl From<zip::result::ZipError> for IngestError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::malformed(err)
    }
}

/// Result type alias for ingest operations
pub type IngestResult<T> = Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_display() {
        let err = IngestError::unsupported("zones.shp");
        assert_eq!(err.to_string(), "unsupported file format: 'zones.shp'");
    }

    #[test]
    fn entry_too_large_display() {
        let err = IngestError::EntryTooLarge {
            entry: "doc.kml".to_string(),
            size: 10,
            limit: 5,
        };
        assert!(err.to_string().contains("doc.kml"));
        assert!(err.to_string().contains("limit is 5"));
    }

    #[test]
    fn zip_error_becomes_malformed() {
        let err: IngestError = zip::result::ZipError::InvalidArchive("bad header".into()).into();
        assert!(matches!(err, IngestError::MalformedArchive(_)));
    }
}
