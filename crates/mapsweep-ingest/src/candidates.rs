//! Candidate area-name set

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Deduplicated set of area names extracted from one document
///
/// Uniqueness is by exact string value. Members are always non-empty and
/// trimmed. Iteration order is sorted so reports are stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateSet {
    names: BTreeSet<String>,
}

impl CandidateSet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a candidate after trimming; blank values are dropped
    ///
    /// Returns `true` if the value was newly added.
    pub fn insert(&mut self, raw: &str) -> bool {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.names.insert(trimmed.to_string())
    }

    /// Number of distinct candidates
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when nothing identifiable was extracted
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Exact membership check
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Iterate candidates in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Owned candidates, sorted
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    /// Merge another set into this one
    pub fn extend(&mut self, other: CandidateSet) {
        self.names.extend(other.names);
    }
}

impl<'a> FromIterator<&'a str> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

impl IntoIterator for CandidateSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_collapse() {
        let set: CandidateSet = ["Ward 7", "Ward 7", " Ward 7 "].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert!(set.contains("Ward 7"));
    }

    #[test]
    fn blank_values_dropped() {
        let mut set = CandidateSet::new();
        assert!(!set.insert("   "));
        assert!(!set.insert(""));
        assert!(set.is_empty());
    }

    #[test]
    fn case_is_significant() {
        let set: CandidateSet = ["North Zone", "north zone"].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn iterates_in_sorted_order() {
        let set: CandidateSet = ["Ward 9", "Ward 7"].into_iter().collect();
        assert_eq!(set.to_vec(), vec!["Ward 7".to_string(), "Ward 9".to_string()]);
    }
}
