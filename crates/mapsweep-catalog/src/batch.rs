//! Bounded batch queries
//!
//! Builds `IN (?, ?, ...)` statements for variable-length inputs, split
//! into chunks so no statement binds more parameters than the store allows.
//! Callers run all chunks inside one transaction so a batch call is
//! all-or-nothing.

/// SQLite's historical host-parameter ceiling (`SQLITE_MAX_VARIABLE_NUMBER`)
pub const SQLITE_MAX_PARAMS: usize = 999;

/// Token in a statement template replaced by the placeholder list
pub const PARAMS_TOKEN: &str = "{params}";

/// Splits parameter lists into statements under a parameter ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedBatch {
    max_params: usize,
}

impl Default for BoundedBatch {
    fn default() -> Self {
        Self::new(SQLITE_MAX_PARAMS)
    }
}

impl BoundedBatch {
    /// Create a batcher; a ceiling of zero is raised to one
    #[inline]
    #[must_use]
    pub fn new(max_params: usize) -> Self {
        Self {
            max_params: max_params.max(1),
        }
    }

    /// Parameter ceiling per statement
    #[inline]
    #[must_use]
    pub fn max_params(&self) -> usize {
        self.max_params
    }

    /// `?, ?, ?` for `count` parameters
    #[must_use]
    pub fn placeholders(count: usize) -> String {
        vec!["?"; count].join(", ")
    }

    /// One `(sql, chunk)` pair per chunk of `items`
    ///
    /// `template` must contain [`PARAMS_TOKEN`] exactly where the
    /// placeholder list belongs, e.g. `DELETE FROM t WHERE id IN ({params})`.
    pub fn statements<'a, T>(
        &self,
        template: &'a str,
        items: &'a [T],
    ) -> impl Iterator<Item = (String, &'a [T])> + 'a {
        items.chunks(self.max_params).map(move |chunk| {
            (
                template.replace(PARAMS_TOKEN, &Self::placeholders(chunk.len())),
                chunk,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn placeholder_list() {
        assert_eq!(BoundedBatch::placeholders(1), "?");
        assert_eq!(BoundedBatch::placeholders(3), "?, ?, ?");
    }

    #[test]
    fn zero_ceiling_raised() {
        assert_eq!(BoundedBatch::new(0).max_params(), 1);
    }

    #[test]
    fn splits_at_ceiling() {
        let ids: Vec<i64> = (0..5).collect();
        let batch = BoundedBatch::new(2);

        let statements: Vec<_> = batch.statements("DELETE FROM maps WHERE MapID IN ({params})", &ids).collect();
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].0, "DELETE FROM maps WHERE MapID IN (?, ?)");
        assert_eq!(statements[2].0, "DELETE FROM maps WHERE MapID IN (?)");
        assert_eq!(statements[2].1, &[4]);
    }

    #[test]
    fn empty_input_yields_no_statements() {
        let none: [i64; 0] = [];
        assert_eq!(BoundedBatch::default().statements("{params}", &none).count(), 0);
    }

    proptest! {
        #[test]
        fn prop_chunks_cover_input_under_ceiling(len in 0usize..500, ceiling in 1usize..64) {
            let items: Vec<usize> = (0..len).collect();
            let batch = BoundedBatch::new(ceiling);

            let mut seen = Vec::new();
            for (sql, chunk) in batch.statements("IN ({params})", &items) {
                prop_assert!(chunk.len() <= ceiling);
                prop_assert!(!chunk.is_empty());
                prop_assert_eq!(sql.matches('?').count(), chunk.len());
                seen.extend_from_slice(chunk);
            }
            prop_assert_eq!(seen, items);
        }
    }
}
