//! Mapsweep Server
//!
//! Transport and process plumbing around [`mapsweep_core::AnnotationReconciler`]:
//! warp routes for the multipart upload endpoint, `tracing` subscriber
//! setup, and catalog bootstrapping shared by the `mapsweep` binary.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod logging;
pub mod routes;

use mapsweep_catalog::{BoundedBatch, SqliteCatalog};
use mapsweep_core::ServiceConfig;

pub use routes::{routes, OPERATOR_HEADER};

/// Open the SQLite catalog named by the config, creating the schema if absent
///
/// # Errors
/// Returns an error if the database file cannot be opened or initialized
pub fn open_catalog(config: &ServiceConfig) -> anyhow::Result<SqliteCatalog> {
    let catalog = SqliteCatalog::open(&config.database_path)?
        .with_batch(BoundedBatch::new(config.max_query_params));
    tracing::debug!(path = %config.database_path.display(), "opened map catalog");
    Ok(catalog)
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
