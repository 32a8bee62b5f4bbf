//! Quick-XML based favicon link discovery
//!
//! Streaming scan over an HTML document that extracts only the `<link>`
//! elements we care about. The reader runs in a lenient configuration
//! because real-world HTML is rarely well-formed XML; if the scanner does
//! hit something it cannot read past, it stops and keeps whatever
//! candidates it found up to that point.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use tracing::trace;

/// A favicon reference extracted from document markup
///
/// Lives only for the duration of link discovery within a single fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaviconCandidate {
    /// Raw `href` value, relative or absolute
    pub href: String,
    /// The `rel` token that qualified this element (`icon` or
    /// `apple-touch-icon`)
    pub rel: String,
}

/// Scan an HTML document for qualifying favicon `<link>` elements,
/// in document order.
///
/// An element qualifies when any whitespace-separated `rel` token equals
/// `icon` or `apple-touch-icon` (case-insensitive), its `href` is
/// non-empty, and the `href` does not end in `.svg` (only raster formats
/// survive the resize step downstream).
pub fn find_icon_links(html: &str) -> Vec<FaviconCandidate> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.trim_text(true);

    let mut candidates = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.name().as_ref().eq_ignore_ascii_case(b"link") {
                    if let Some(candidate) = candidate_from_link(e) {
                        candidates.push(candidate);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                // Sloppy markup past this point; keep what we have.
                trace!("Stopping HTML scan on parse error: {e}");
                break;
            }
            _ => {}
        }
    }

    candidates
}

/// Evaluate one `<link>` element against the candidate rules.
fn candidate_from_link(element: &BytesStart) -> Option<FaviconCandidate> {
    let attrs = parse_attributes(element);

    let rel = attrs
        .get("rel")?
        .split_whitespace()
        .map(|token| token.to_ascii_lowercase())
        .find(|token| token == "icon" || token == "apple-touch-icon")?;

    let href = attrs.get("href")?;
    if href.is_empty() || href.ends_with(".svg") {
        return None;
    }

    Some(FaviconCandidate {
        href: href.clone(),
        rel,
    })
}

/// Parse element attributes into a HashMap, lower-casing keys since HTML
/// attribute names are case-insensitive. Unreadable attributes are skipped.
fn parse_attributes(element: &BytesStart) -> HashMap<String, String> {
    let mut attrs = HashMap::new();

    for attr in element.attributes().flatten() {
        if let (Ok(key), Ok(value)) = (
            std::str::from_utf8(attr.key.as_ref()),
            std::str::from_utf8(&attr.value),
        ) {
            attrs.insert(key.to_ascii_lowercase(), value.to_string());
        }
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_basic_icon_link() {
        let html = r#"<html><head><link rel="icon" href="favicon32.png"></head></html>"#;
        let links = find_icon_links(html);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].href, "favicon32.png");
        assert_eq!(links[0].rel, "icon");
    }

    #[test]
    fn finds_apple_touch_icon() {
        let html = r#"<link rel="apple-touch-icon" href="/touch.png"/>"#;
        let links = find_icon_links(html);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].rel, "apple-touch-icon");
    }

    #[test]
    fn rel_matching_is_case_insensitive() {
        let html = r#"<link rel="ICON" href="/i.png">"#;
        assert_eq!(find_icon_links(html).len(), 1);
    }

    #[test]
    fn matches_any_rel_token() {
        // "shortcut icon" is the classic legacy form
        let html = r#"<link rel="shortcut icon" href="/favicon.ico">"#;
        let links = find_icon_links(html);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].rel, "icon");
    }

    #[test]
    fn skips_svg_and_unrelated_links() {
        let html = r#"
            <head>
                <link rel="stylesheet" href="style.css">
                <link rel="icon" href="vector.svg">
                <link rel="icon">
                <link rel="icon" href="">
            </head>
        "#;
        assert!(find_icon_links(html).is_empty());
    }

    #[test]
    fn preserves_document_order() {
        let html = r#"
            <link rel="apple-touch-icon" href="/first.png">
            <link rel="icon" href="/second.png">
        "#;
        let links = find_icon_links(html);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].href, "/first.png");
        assert_eq!(links[1].href, "/second.png");
    }

    #[test]
    fn survives_unclosed_html_tags() {
        let html = r#"
            <!DOCTYPE html>
            <html>
            <head>
                <meta charset="utf-8">
                <link rel="icon" href="/icon.png">
            </head>
            <body>
                <p>Unclosed paragraph
                <br>
            </body>
            </html>
        "#;
        let links = find_icon_links(html);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].href, "/icon.png");
    }
}
