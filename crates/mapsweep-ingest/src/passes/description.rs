//! Short `<description>` pass
//!
//! Descriptions are usually HTML balloons. Only short plain labels are
//! kept, since those tend to be alternate area names.

use super::{ExtractionPass, CONTENT};
use crate::candidates::CandidateSet;
use crate::markup::element_text;
use once_cell::sync::Lazy;
use regex::Regex;

/// Descriptions must be strictly shorter than this (in characters)
pub const DESCRIPTION_MAX_CHARS: usize = 100;

static DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"<description(?:\s[^>]*)?>{CONTENT}</description\s*>"))
        .expect("description pattern is valid")
});

/// Captures descriptions that look like labels rather than prose or HTML
#[derive(Debug, Clone, Copy)]
pub struct ShortDescriptionPass {
    max_chars: usize,
}

impl Default for ShortDescriptionPass {
    fn default() -> Self {
        Self {
            max_chars: DESCRIPTION_MAX_CHARS,
        }
    }
}

impl ShortDescriptionPass {
    /// Whether a trimmed description qualifies as a candidate
    #[must_use]
    pub fn accepts(&self, text: &str) -> bool {
        !text.is_empty()
            && text.chars().count() < self.max_chars
            && !text.contains(['<', '>'])
    }
}

impl ExtractionPass for ShortDescriptionPass {
    fn name(&self) -> &'static str {
        "short-description"
    }

    fn extract(&self, markup: &str, out: &mut CandidateSet) {
        for caps in DESCRIPTION.captures_iter(markup) {
            let text = element_text(&caps[1]);
            if self.accepts(&text) {
                out.insert(&text);
            } else if !text.is_empty() {
                tracing::trace!(chars = text.chars().count(), "description rejected as area name");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(markup: &str) -> CandidateSet {
        let mut out = CandidateSet::new();
        ShortDescriptionPass::default().extract(markup, &mut out);
        out
    }

    #[test]
    fn short_plain_description_accepted() {
        let out = run("<description>Riverside Ward</description>");
        assert!(out.contains("Riverside Ward"));
    }

    #[test]
    fn threshold_is_strict() {
        let pass = ShortDescriptionPass::default();
        assert!(pass.accepts(&"a".repeat(99)));
        assert!(!pass.accepts(&"a".repeat(100)));
    }

    #[test]
    fn counts_characters_not_bytes() {
        let pass = ShortDescriptionPass::default();
        assert!(pass.accepts(&"é".repeat(99)));
    }

    #[test]
    fn long_description_rejected() {
        let body = "x".repeat(150);
        assert!(run(&format!("<description>{body}</description>")).is_empty());
    }

    #[test]
    fn html_descriptions_rejected() {
        assert!(run("<description><![CDATA[<b>Ward 4</b>]]></description>").is_empty());
        assert!(run("<description>&lt;b&gt;Ward 4&lt;/b&gt;</description>").is_empty());
        assert!(run("<description><b>Ward 4</b></description>").is_empty());
    }

    #[test]
    fn trims_before_measuring() {
        let padded = format!("   {}   ", "y".repeat(98));
        let out = run(&format!("<description>{padded}</description>"));
        assert_eq!(out.len(), 1);
    }
}
