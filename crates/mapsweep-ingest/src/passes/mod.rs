//! Extraction passes over KML markup
//!
//! Each pass scans the whole document independently and contributes
//! candidates to a shared set:
//! - `<name>` element text
//! - `<SimpleData name="...">` values
//! - short, plain-text `<description>` elements
//!
//! Passes match one element at a time. An element that never closes, or
//! holds nested markup where text was expected, simply fails to match and
//! the scan resumes after it.

use crate::candidates::CandidateSet;

mod description;
mod named;
mod simple_data;

pub use description::{ShortDescriptionPass, DESCRIPTION_MAX_CHARS};
pub use named::NamedElementPass;
pub use simple_data::SimpleDataPass;

/// Regex fragment for element content: one CDATA section, or plain text
/// with no nested tags
///
/// The CDATA body cannot contain `]]>`, so a section whose element never
/// closes does not run on into the next element.
pub(crate) const CONTENT: &str =
    r"(\s*<!\[CDATA\[(?:[^\]]|\][^\]]|\]\]+[^\]>])*\]+\]>\s*|[^<]*)";

/// A single extraction strategy over namespace-stripped markup
///
/// Implement this trait to add a new source of area names.
pub trait ExtractionPass: Send + Sync + 'static {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Add every candidate found in `markup` to `out`
    fn extract(&self, markup: &str, out: &mut CandidateSet);
}

/// Ordered collection of passes
pub struct PassRegistry {
    passes: Vec<Box<dyn ExtractionPass>>,
}

impl Default for PassRegistry {
    fn default() -> Self {
        default_passes()
    }
}

impl std::fmt::Debug for PassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassRegistry")
            .field("passes", &self.names())
            .finish()
    }
}

impl PassRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    /// Register a pass
    pub fn register<P: ExtractionPass>(&mut self, pass: P) {
        self.passes.push(Box::new(pass));
    }

    /// Names of registered passes, in run order
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Iterate registered passes
    pub fn iter(&self) -> impl Iterator<Item = &dyn ExtractionPass> {
        self.passes.iter().map(|p| &**p)
    }
}

/// Registry with the three built-in passes
#[must_use]
pub fn default_passes() -> PassRegistry {
    let mut registry = PassRegistry::new();
    registry.register(NamedElementPass);
    registry.register(SimpleDataPass);
    registry.register(ShortDescriptionPass::default());
    registry
}
