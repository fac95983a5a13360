//! Link extraction from directory index pages.
//!
//! Matches `<a href="...">` anchors the way Apache/Nginx autoindex pages emit
//! them. Extraction is best-effort: anything that doesn't look like an anchor is
//! skipped silently.

use once_cell::sync::Lazy;
use regex::Regex;

/// Anchor with an href that is not a query-only (`?C=M;O=A`) or fragment link.
static ANCHOR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<a\s[^>]*?href\s*=\s*"([^"?#][^"]*)""#).expect("anchor regex should compile")
});

/// One or more dot-only segments at the start of an href (`../`, `./`, `../../`).
static NAVIGATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\.+/)+|^\.+$").expect("navigation regex should compile")
});

/// A child link advertised by an index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// The href exactly as it appears in the page (entities decoded).
    pub href: String,
    /// Whether the link points at a sub-directory.
    pub is_dir: bool,
}

/// Check whether an href navigates to the current or a parent directory.
pub fn is_navigation_link(href: &str) -> bool {
    NAVIGATION_PATTERN.is_match(href)
}

/// Extract child links from a page body or a single line of it.
pub fn extract_links(html: &str) -> impl Iterator<Item = Link> + '_ {
    ANCHOR_PATTERN
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| unescape_href(m.as_str()))
        .filter(|href| !is_navigation_link(href))
        .map(|href| Link {
            is_dir: href.ends_with('/'),
            href,
        })
}

/// Decode the HTML entities autoindex pages put in attribute values.
fn unescape_href(href: &str) -> String {
    if !href.contains('&') {
        return href.to_string();
    }

    href.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
