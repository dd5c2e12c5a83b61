//! Catalog store trait
//!
//! The reconciliation pipeline only ever reads and deletes. Matching is
//! exact (case- and whitespace-sensitive); deletion targets identifiers
//! returned by a prior match, never names.

use crate::error::CatalogResult;
use crate::record::{MapId, MapRecord};
use serde::Serialize;

/// What one select-then-delete pass saw and removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepOutcome {
    /// Records matched before deletion, ordered by identifier
    pub matched: Vec<MapRecord>,
    /// Rows actually removed
    pub deleted: u64,
}

impl SweepOutcome {
    /// Identifiers of the matched records
    #[must_use]
    pub fn matched_ids(&self) -> Vec<MapId> {
        self.matched.iter().map(|r| r.map_id).collect()
    }
}

/// Persisted map catalog
///
/// Implement this trait to reconcile against a different store.
#[async_trait::async_trait]
pub trait MapCatalog: Send + Sync {
    /// Every record whose area name equals one of `names` exactly
    ///
    /// Records sharing an area name are all returned. An empty `names`
    /// slice returns an empty list without touching the store.
    async fn find_by_area_names(&self, names: &[String]) -> CatalogResult<Vec<MapRecord>>;

    /// Delete the given identifiers, returning rows actually removed
    ///
    /// An empty `ids` slice is a no-op returning zero.
    async fn delete_by_ids(&self, ids: &[MapId]) -> CatalogResult<u64>;

    /// Match then delete exactly the matched identifiers
    ///
    /// The default runs the two steps back to back. Stores that can should
    /// override this to run both inside one transaction.
    async fn find_and_delete(&self, names: &[String]) -> CatalogResult<SweepOutcome> {
        let matched = self.find_by_area_names(names).await?;
        let ids: Vec<MapId> = matched.iter().map(|r| r.map_id).collect();
        let deleted = if ids.is_empty() {
            0
        } else {
            self.delete_by_ids(&ids).await?
        };
        Ok(SweepOutcome { matched, deleted })
    }
}
