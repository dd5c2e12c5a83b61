//! `<SimpleData name="...">` pass
//!
//! The attribute is a field label (`AREA_NAME`, `ward`, ...); the element
//! text is the area identifier, so only the text is captured.

use super::{ExtractionPass, CONTENT};
use crate::candidates::CandidateSet;
use crate::markup::element_text;
use once_cell::sync::Lazy;
use regex::Regex;

// Attributes before `name` are skipped whole, so `data-name` or a quoted
// value containing `name=` never counts as the name attribute.
static SIMPLE_DATA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"<SimpleData(?:\s+[\w:.-]+\s*=\s*(?:"[^"]*"|'[^']*'))*?\s+name\s*=\s*(?:"[^"]*"|'[^']*')[^>]*>{CONTENT}</SimpleData\s*>"#
    ))
    .expect("simple data pattern is valid")
});

/// Captures the value of every named `<SimpleData>` entry
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleDataPass;

impl ExtractionPass for SimpleDataPass {
    fn name(&self) -> &'static str {
        "simple-data"
    }

    fn extract(&self, markup: &str, out: &mut CandidateSet) {
        for caps in SIMPLE_DATA.captures_iter(markup) {
            out.insert(&element_text(&caps[1]));
        }
    }
}
