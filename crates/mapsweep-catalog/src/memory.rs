//! In-memory catalog
//!
//! Backs tests and local dry runs. A single write lock covers the
//! whole of [`MapCatalog::find_and_delete`], so sweeps are serialized.

use crate::error::CatalogResult;
use crate::record::{MapId, MapRecord, NewMapRecord};
use crate::store::{MapCatalog, SweepOutcome};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

/// Map catalog held in process memory
#[derive(Debug)]
pub struct InMemoryCatalog {
    rows: RwLock<BTreeMap<MapId, MapRecord>>,
    next_id: AtomicI64,
    statements: AtomicUsize,
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCatalog {
    /// Create empty catalog; identifiers start at 1
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            statements: AtomicUsize::new(0),
        }
    }

    /// Insert a record, assigning the next identifier
    pub fn insert(&self, record: NewMapRecord) -> MapRecord {
        let id = MapId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let record = record.into_record(id);
        self.rows.write().insert(id, record.clone());
        record
    }

    /// Look up one record
    #[must_use]
    pub fn get(&self, id: MapId) -> Option<MapRecord> {
        self.rows.read().get(&id).cloned()
    }

    /// Number of records held
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// True when the catalog holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Select/delete statements issued so far
    #[must_use]
    pub fn statements_issued(&self) -> usize {
        self.statements.load(Ordering::Relaxed)
    }

    fn select(rows: &BTreeMap<MapId, MapRecord>, names: &[String]) -> Vec<MapRecord> {
        let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
        rows.values()
            .filter(|r| wanted.contains(r.area_name.as_str()))
            .cloned()
            .collect()
    }

    fn remove(rows: &mut BTreeMap<MapId, MapRecord>, ids: &[MapId]) -> u64 {
        ids.iter().filter(|id| rows.remove(*id).is_some()).count() as u64
    }
}

#[async_trait::async_trait]
impl MapCatalog for InMemoryCatalog {
    async fn find_by_area_names(&self, names: &[String]) -> CatalogResult<Vec<MapRecord>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        self.statements.fetch_add(1, Ordering::Relaxed);
        Ok(Self::select(&self.rows.read(), names))
    }

    async fn delete_by_ids(&self, ids: &[MapId]) -> CatalogResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.statements.fetch_add(1, Ordering::Relaxed);
        Ok(Self::remove(&mut self.rows.write(), ids))
    }

    async fn find_and_delete(&self, names: &[String]) -> CatalogResult<SweepOutcome> {
        if names.is_empty() {
            return Ok(SweepOutcome::default());
        }

        let mut rows = self.rows.write();
        self.statements.fetch_add(1, Ordering::Relaxed);
        let matched = Self::select(&rows, names);
        let ids: Vec<MapId> = matched.iter().map(|r| r.map_id).collect();
        let deleted = if ids.is_empty() {
            0
        } else {
            self.statements.fetch_add(1, Ordering::Relaxed);
            Self::remove(&mut rows, &ids)
        };

        Ok(SweepOutcome { matched, deleted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[tokio::test]
    async fn matching_is_exact() {
        let catalog = InMemoryCatalog::new();
        catalog.insert(NewMapRecord::new("North Zone"));
        catalog.insert(NewMapRecord::new("north zone"));
        catalog.insert(NewMapRecord::new("North Zone "));

        let found = catalog.find_by_area_names(&names(&["North Zone"])).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].area_name, "North Zone");
    }

    #[tokio::test]
    async fn shared_area_names_all_deleted() {
        let catalog = InMemoryCatalog::new();
        let a = catalog.insert(NewMapRecord::new("Ward 7").with_map_type("Zoning"));
        let b = catalog.insert(NewMapRecord::new("Ward 7").with_map_type("Roads"));
        let keep = catalog.insert(NewMapRecord::new("Ward 8"));

        let outcome = catalog.find_and_delete(&names(&["Ward 7"])).await.unwrap();
        assert_eq!(outcome.matched_ids(), vec![a.map_id, b.map_id]);
        assert_eq!(outcome.deleted, 2);
        assert_eq!(catalog.get(keep.map_id), Some(keep));
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn empty_inputs_issue_no_statements() {
        let catalog = InMemoryCatalog::new();
        catalog.insert(NewMapRecord::new("Ward 7"));

        assert!(catalog.find_by_area_names(&[]).await.unwrap().is_empty());
        assert_eq!(catalog.delete_by_ids(&[]).await.unwrap(), 0);
        assert_eq!(catalog.find_and_delete(&[]).await.unwrap(), SweepOutcome::default());
        assert_eq!(catalog.statements_issued(), 0);
    }

    #[tokio::test]
    async fn deleting_missing_ids_counts_only_removed_rows() {
        let catalog = InMemoryCatalog::new();
        let rec = catalog.insert(NewMapRecord::new("Ward 7"));

        let removed = catalog.delete_by_ids(&[rec.map_id, MapId(999)]).await.unwrap();
        assert_eq!(removed, 1);
    }
}
