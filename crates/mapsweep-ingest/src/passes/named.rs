//! `<name>` element pass

use super::{ExtractionPass, CONTENT};
use crate::candidates::CandidateSet;
use crate::markup::element_text;
use once_cell::sync::Lazy;
use regex::Regex;

static NAME_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"<name(?:\s[^>]*)?>{CONTENT}</name\s*>"))
        .expect("name element pattern is valid")
});

/// Captures the text of every `<name>` element; attributes are ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedElementPass;

impl ExtractionPass for NamedElementPass {
    fn name(&self) -> &'static str {
        "named-element"
    }

    fn extract(&self, markup: &str, out: &mut CandidateSet) {
        for caps in NAME_ELEMENT.captures_iter(markup) {
            out.insert(&element_text(&caps[1]));
        }
    }
}
