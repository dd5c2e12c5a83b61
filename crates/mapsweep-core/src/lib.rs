//! Mapsweep Core - delete maps by annotation file
//!
//! Ties the ingest layer to the catalog:
//! - Checks the caller's capability before reading the upload
//! - Normalizes `.kml`/`.kmz` and extracts candidate area names
//! - Matches candidates exactly against the catalog and deletes by `MapID`
//! - Reports the candidates, the pre-deletion matches and the deleted count
//!
//! # Example
//!
//! ```rust
//! use mapsweep_catalog::{InMemoryCatalog, NewMapRecord};
//! use mapsweep_core::{AllowAll, AnnotationReconciler};
//! use mapsweep_ingest::UploadedAnnotation;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let catalog = Arc::new(InMemoryCatalog::new());
//! catalog.insert(NewMapRecord::new("Ward 7"));
//!
//! let reconciler = AnnotationReconciler::new(catalog.clone(), Arc::new(AllowAll));
//! let upload = UploadedAnnotation::new("wards.kml", "<name>Ward 7</name><name>Ward 9</name>");
//! let report = reconciler
//!     .delete_by_annotation_file(Some("ops"), Some(upload))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(report.deleted_count, 1);
//! assert!(catalog.is_empty());
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod auth;
pub mod config;
pub mod error;
pub mod reconciler;
pub mod report;

// Re-exports for convenience
pub use auth::{AccessDecision, AllowAll, Capability, PermissionChecker, StaticPermissions};
pub use config::{ServiceConfig, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_UPLOAD_FIELD};
pub use error::{ConfigError, ReconcileError, ReconcileResult, ValidationFailure};
pub use reconciler::AnnotationReconciler;
pub use report::{ApiReply, FailureResponse, ReconciliationReport};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running reconciliations
    pub use crate::{
        AnnotationReconciler, ApiReply, Capability, PermissionChecker, ReconcileError,
        ReconciliationReport, ServiceConfig, StaticPermissions,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
