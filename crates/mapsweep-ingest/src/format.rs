//! Upload classification by filename extension

use crate::error::{IngestError, IngestResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Plain-markup extension (without dot)
pub const KML_EXTENSION: &str = "kml";

/// Compressed-container extension (without dot)
pub const KMZ_EXTENSION: &str = "kmz";

/// Kind of annotation file, derived from the final filename extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnnotationKind {
    /// Plain KML markup
    Kml,
    /// Zip container wrapping a KML document
    Kmz,
}

impl AnnotationKind {
    /// Classify a filename, case-insensitively on its final extension
    ///
    /// # Errors
    /// Returns [`IngestError::UnsupportedFormat`] for any other extension
    pub fn from_filename(filename: &str) -> IngestResult<Self> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some(KML_EXTENSION) => Ok(Self::Kml),
            Some(KMZ_EXTENSION) => Ok(Self::Kmz),
            _ => Err(IngestError::unsupported(filename)),
        }
    }

    /// Label used in reconciliation reports
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Kml => "KML",
            Self::Kmz => "KMZ",
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw uploaded annotation file, alive for one request
#[derive(Debug, Clone)]
pub struct UploadedAnnotation {
    /// Filename as declared by the client
    pub filename: String,
    /// Raw file bytes
    pub bytes: Vec<u8>,
}

impl UploadedAnnotation {
    /// Create upload from filename and bytes
    #[inline]
    #[must_use]
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Classify this upload by its filename
    ///
    /// # Errors
    /// Returns [`IngestError::UnsupportedFormat`] for non-KML/KMZ names
    pub fn kind(&self) -> IngestResult<AnnotationKind> {
        AnnotationKind::from_filename(&self.filename)
    }
}
