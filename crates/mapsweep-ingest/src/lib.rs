//! Mapsweep Ingest Layer
//!
//! The boundary between uploaded annotation files and the reconciliation
//! pipeline.
//!
//! # Core Operations
//!
//! - **Normalize**: turn a `.kml` or `.kmz` upload into one markup payload
//! - **Extract**: pull a deduplicated set of candidate area names out of
//!   the markup, tolerating malformed regions
//!
//! # Architecture
//!
//! ```text
//! Upload (.kml | .kmz) → ArchiveNormalizer → MarkupPayload → AreaNameExtractor → CandidateSet
//!                                                              ├ NamedElementPass
//!                                                              ├ SimpleDataPass
//!                                                              └ ShortDescriptionPass
//! ```
//!
//! # Example
//!
//! ```rust
//! use mapsweep_ingest::{AreaNameExtractor, ArchiveNormalizer, UploadedAnnotation};
//!
//! let upload = UploadedAnnotation::new("wards.kml", "<name>Ward 7</name><name>Ward 7</name>");
//! let payload = ArchiveNormalizer::new().normalize(&upload).unwrap();
//! let names = AreaNameExtractor::new().extract(&payload.text);
//!
//! assert_eq!(names.len(), 1);
//! assert!(names.contains("Ward 7"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod candidates;
pub mod error;
pub mod extractor;
pub mod format;
pub mod markup;
pub mod normalizer;
pub mod passes;

// Re-exports for convenience
pub use candidates::CandidateSet;
pub use error::{IngestError, IngestResult};
pub use extractor::AreaNameExtractor;
pub use format::{AnnotationKind, UploadedAnnotation};
pub use normalizer::{ArchiveNormalizer, MarkupPayload, DEFAULT_MAX_ENTRY_BYTES};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
