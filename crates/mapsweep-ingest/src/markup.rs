//! Lenient markup helpers shared by the extraction passes
//!
//! None of these functions parse XML. They rewrite or decode text in place
//! so that regex passes can run over namespaced, CDATA-wrapped or partly
//! broken documents alike.

use once_cell::sync::Lazy;
use quick_xml::escape::unescape;
use regex::Regex;
use std::borrow::Cow;

/// `xmlns` / `xmlns:prefix` declarations inside opening tags
static NAMESPACE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\s+xmlns(?::[A-Za-z_][\w.\-]*)?\s*=\s*(?:"[^"]*"|'[^']*')"#)
        .expect("namespace declaration pattern is valid")
});

/// Prefix on an element name: `<kml:name` or `</kml:name`
static ELEMENT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(/?)[A-Za-z_][\w.\-]*:([A-Za-z_])")
        .expect("element prefix pattern is valid")
});

/// Strip namespace declarations and element prefixes
///
/// `<kml:Placemark xmlns:kml="...">` becomes `<Placemark>`, so every pass
/// can match unprefixed tag names. Attribute prefixes are left alone.
#[must_use]
pub fn strip_namespaces(markup: &str) -> Cow<'_, str> {
    let without_decls = NAMESPACE_DECL.replace_all(markup, "");
    let rewritten = match ELEMENT_PREFIX.replace_all(&without_decls, "<$1$2") {
        Cow::Borrowed(_) => None,
        Cow::Owned(text) => Some(text),
    };
    rewritten.map_or(without_decls, Cow::Owned)
}

/// Unwrap a `<![CDATA[...]]>` section if the text is exactly one
pub(crate) fn unwrap_cdata(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("<![CDATA[")
        .and_then(|rest| rest.strip_suffix("]]>"))
        .unwrap_or(text)
}

/// Decode predefined XML entities and numeric character references
///
/// Text with an unknown entity or a bare `&` is kept verbatim.
pub(crate) fn decode_entities(text: &str) -> Cow<'_, str> {
    unescape(text).unwrap_or(Cow::Borrowed(text))
}

/// Turn captured element content into candidate text: unwrap CDATA,
/// decode entities, trim
pub(crate) fn element_text(raw: &str) -> String {
    let inner = unwrap_cdata(raw);
    decode_entities(inner).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_prefixes_and_declarations() {
        let input = r#"<kml:kml xmlns:kml="http://www.opengis.net/kml/2.2"><kml:name>Ward 7</kml:name></kml:kml>"#;
        assert_eq!(strip_namespaces(input), "<kml><name>Ward 7</name></kml>");
    }

    #[test]
    fn strips_default_namespace() {
        let input = r#"<kml xmlns="http://www.opengis.net/kml/2.2"><name>A</name></kml>"#;
        assert_eq!(strip_namespaces(input), "<kml><name>A</name></kml>");
    }

    #[test]
    fn unprefixed_markup_is_borrowed() {
        let input = "<name>Ward 7</name>";
        assert!(matches!(strip_namespaces(input), Cow::Borrowed(_)));
    }

    #[test]
    fn text_content_with_colon_untouched() {
        let input = "<name>Zone: North</name>";
        assert_eq!(strip_namespaces(input), input);
    }

    #[test]
    fn cdata_unwrapped() {
        assert_eq!(unwrap_cdata("<![CDATA[Ward 7]]>"), "Ward 7");
        assert_eq!(unwrap_cdata("  <![CDATA[Ward 7]]>\n"), "Ward 7");
        assert_eq!(unwrap_cdata("Ward 7"), "Ward 7");
    }

    #[test]
    fn entities_decoded() {
        assert_eq!(decode_entities("A &amp; B"), "A & B");
        assert_eq!(decode_entities("&lt;b&gt;"), "<b>");
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
        assert_eq!(decode_entities("fish & chips"), "fish & chips");
        assert_eq!(decode_entities("&bogus; &"), "&bogus; &");
        assert_eq!(decode_entities("Ward &amp; Co & sons"), "Ward &amp; Co & sons");
    }

    #[test]
    fn element_text_trims_after_decoding() {
        assert_eq!(element_text("  <![CDATA[ Ward 7 ]]> "), "Ward 7");
        assert_eq!(element_text("\n  North &amp; South\t"), "North & South");
    }
}
