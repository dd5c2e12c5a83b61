//! Error types for catalog operations

/// Errors raised by a catalog store
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Query or statement failed in SQLite
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Blocking worker running the query panicked or was cancelled
    #[error("catalog task failed: {0}")]
    TaskFailed(String),

    /// Store rejected the operation for a store-specific reason
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = CatalogError::Unavailable("read-only replica".to_string());
        assert_eq!(err.to_string(), "catalog unavailable: read-only replica");
    }

    #[test]
    fn sqlite_conversion() {
        let err: CatalogError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, CatalogError::Sqlite(_)));
    }
}
