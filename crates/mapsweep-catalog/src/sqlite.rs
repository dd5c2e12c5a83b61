//! SQLite-backed catalog
//!
//! Statements run on a blocking worker. `find_and_delete` takes the write
//! lock up front (`BEGIN IMMEDIATE`) and runs the select and every delete
//! chunk in one transaction, so a failed chunk rolls the whole sweep back.

use crate::batch::BoundedBatch;
use crate::error::{CatalogError, CatalogResult};
use crate::record::{MapId, MapRecord, NewMapRecord};
use crate::store::{MapCatalog, SweepOutcome};
use parking_lot::Mutex;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;
use std::sync::Arc;

/// Catalog schema; `AreaName` uses the default BINARY collation
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS maps (
    MapID    INTEGER PRIMARY KEY AUTOINCREMENT,
    AreaName TEXT NOT NULL,
    MapType  TEXT NOT NULL DEFAULT '',
    FileName TEXT NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS idx_maps_area_name ON maps(AreaName);
";

const SELECT_BY_NAMES: &str =
    "SELECT MapID, AreaName, MapType, FileName FROM maps WHERE AreaName IN ({params})";
const DELETE_BY_IDS: &str = "DELETE FROM maps WHERE MapID IN ({params})";

/// Map catalog stored in a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    conn: Arc<Mutex<Connection>>,
    batch: BoundedBatch,
}

impl SqliteCatalog {
    /// Open (or create) a catalog database and ensure the schema exists
    ///
    /// # Errors
    /// Returns [`CatalogError::Sqlite`] if the file cannot be opened or the
    /// schema cannot be created
    pub fn open(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    ///
    /// # Errors
    /// Returns [`CatalogError::Sqlite`] if the schema cannot be created
    pub fn open_in_memory() -> CatalogResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> CatalogResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            batch: BoundedBatch::default(),
        })
    }

    /// With a custom parameter ceiling per statement
    #[inline]
    #[must_use]
    pub fn with_batch(mut self, batch: BoundedBatch) -> Self {
        self.batch = batch;
        self
    }

    /// Insert a record, returning it with its assigned identifier
    ///
    /// # Errors
    /// Returns [`CatalogError`] if the insert fails
    pub async fn insert(&self, record: NewMapRecord) -> CatalogResult<MapRecord> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO maps (AreaName, MapType, FileName) VALUES (?1, ?2, ?3)",
                params![record.area_name, record.map_type, record.file_name],
            )?;
            Ok(record.into_record(MapId(conn.last_insert_rowid())))
        })
        .await
    }

    /// Look up one record
    ///
    /// # Errors
    /// Returns [`CatalogError`] if the query fails
    pub async fn get(&self, id: MapId) -> CatalogResult<Option<MapRecord>> {
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT MapID, AreaName, MapType, FileName FROM maps WHERE MapID = ?1",
                params![id.0],
                read_record,
            )
            .optional()
            .map_err(CatalogError::from)
        })
        .await
    }

    /// Number of records held
    ///
    /// # Errors
    /// Returns [`CatalogError`] if the query fails
    pub async fn count(&self) -> CatalogResult<u64> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM maps", [], |row| row.get(0))?;
            Ok(u64::try_from(n).unwrap_or_default())
        })
        .await
    }

    async fn with_conn<T, F>(&self, f: F) -> CatalogResult<T>
    where
        F: FnOnce(&mut Connection) -> CatalogResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock();
            f(&mut guard)
        })
        .await
        .map_err(|e| CatalogError::TaskFailed(e.to_string()))?
    }
}

fn read_record(row: &Row<'_>) -> rusqlite::Result<MapRecord> {
    Ok(MapRecord {
        map_id: MapId(row.get(0)?),
        area_name: row.get(1)?,
        map_type: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        file_name: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
    })
}

fn select_by_names(
    conn: &Connection,
    batch: BoundedBatch,
    names: &[String],
) -> CatalogResult<Vec<MapRecord>> {
    let mut matched = Vec::new();
    for (sql, chunk) in batch.statements(SELECT_BY_NAMES, names) {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(chunk.iter()), read_record)?;
        for row in rows {
            matched.push(row?);
        }
    }
    matched.sort_by_key(|r| r.map_id);
    Ok(matched)
}

fn delete_by_ids(conn: &Connection, batch: BoundedBatch, ids: &[MapId]) -> CatalogResult<u64> {
    let raw: Vec<i64> = ids.iter().map(|id| id.0).collect();
    let mut deleted = 0u64;
    for (sql, chunk) in batch.statements(DELETE_BY_IDS, &raw) {
        deleted += conn.execute(&sql, params_from_iter(chunk.iter()))? as u64;
    }
    Ok(deleted)
}

#[async_trait::async_trait]
impl MapCatalog for SqliteCatalog {
    async fn find_by_area_names(&self, names: &[String]) -> CatalogResult<Vec<MapRecord>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let names = names.to_vec();
        let batch = self.batch;
        self.with_conn(move |conn| select_by_names(conn, batch, &names)).await
    }

    async fn delete_by_ids(&self, ids: &[MapId]) -> CatalogResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let ids = ids.to_vec();
        let batch = self.batch;
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let deleted = delete_by_ids(&tx, batch, &ids)?;
            tx.commit()?;
            Ok(deleted)
        })
        .await
    }

    async fn find_and_delete(&self, names: &[String]) -> CatalogResult<SweepOutcome> {
        if names.is_empty() {
            return Ok(SweepOutcome::default());
        }
        let names = names.to_vec();
        let batch = self.batch;
        self.with_conn(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let matched = select_by_names(&tx, batch, &names)?;
            let ids: Vec<MapId> = matched.iter().map(|r| r.map_id).collect();
            let deleted = if ids.is_empty() {
                0
            } else {
                delete_by_ids(&tx, batch, &ids)?
            };
            tx.commit()?;
            tracing::debug!(matched = matched.len(), deleted, "catalog sweep committed");
            Ok(SweepOutcome { matched, deleted })
        })
        .await
    }
}
