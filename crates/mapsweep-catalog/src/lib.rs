//! Mapsweep Catalog
//!
//! The persisted map catalog, seen from the reconciliation pipeline: find
//! records by exact area name, then delete exactly those records by
//! identifier.
//!
//! # Overview
//!
//! - **MapCatalog**: async store trait (match, delete, match-then-delete)
//! - **SqliteCatalog**: SQLite store, one transaction per sweep
//! - **InMemoryCatalog**: lock-guarded store for tests and dry runs
//! - **BoundedBatch**: chunked `IN (...)` statement builder
//!
//! # Example
//!
//! ```rust
//! use mapsweep_catalog::{InMemoryCatalog, MapCatalog, NewMapRecord};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let catalog = InMemoryCatalog::new();
//! catalog.insert(NewMapRecord::new("Ward 7"));
//!
//! let outcome = catalog
//!     .find_and_delete(&["Ward 7".to_string(), "Ward 9".to_string()])
//!     .await
//!     .unwrap();
//! assert_eq!(outcome.matched.len(), 1);
//! assert_eq!(outcome.deleted, 1);
//! # }
//! ```

#![warn(missing_docs)]

pub mod batch;
pub mod error;
pub mod memory;
pub mod record;
pub mod sqlite;
pub mod store;

// Re-exports
pub use batch::{BoundedBatch, SQLITE_MAX_PARAMS};
pub use error::{CatalogError, CatalogResult};
pub use memory::InMemoryCatalog;
pub use record::{MapId, MapRecord, NewMapRecord};
pub use sqlite::SqliteCatalog;
pub use store::{MapCatalog, SweepOutcome};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for catalog operations
    pub use crate::{
        CatalogError, CatalogResult, InMemoryCatalog, MapCatalog, MapId, MapRecord, NewMapRecord,
        SqliteCatalog, SweepOutcome,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
