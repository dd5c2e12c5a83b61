//! Area-name extractor
//!
//! Strips namespaces once, then runs every registered pass over the same
//! text and unions the results. Extraction never fails: a document with
//! nothing recognisable yields an empty set.

use crate::candidates::CandidateSet;
use crate::markup::strip_namespaces;
use crate::passes::{default_passes, PassRegistry};

/// Runs the extraction passes over markup text
#[derive(Debug, Default)]
pub struct AreaNameExtractor {
    passes: PassRegistry,
}

impl AreaNameExtractor {
    /// Create extractor with the built-in passes
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            passes: default_passes(),
        }
    }

    /// Create extractor with a custom pass registry
    #[inline]
    #[must_use]
    pub fn with_passes(passes: PassRegistry) -> Self {
        Self { passes }
    }

    /// Extract the candidate area names from markup text
    #[must_use]
    pub fn extract(&self, markup: &str) -> CandidateSet {
        let text = strip_namespaces(markup);
        let mut names = CandidateSet::new();

        for pass in self.passes.iter() {
            let before = names.len();
            pass.extract(&text, &mut names);
            tracing::trace!(pass = pass.name(), added = names.len() - before, "extraction pass done");
        }

        tracing::debug!(candidates = names.len(), "extracted area names");
        names
    }
}
