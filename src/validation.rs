//! Hostname validation
//!
//! Request-entry guard that keeps malformed domains from ever reaching an
//! outbound request. Validation is purely syntactic; no DNS lookup happens
//! here.

use regex::Regex;
use std::sync::OnceLock;

/// A single DNS label: 1-63 alphanumeric-or-hyphen characters, with no
/// leading or trailing hyphen.
fn label_pattern() -> &'static Regex {
    static LABEL: OnceLock<Regex> = OnceLock::new();
    LABEL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?$")
            .expect("hostname label pattern is valid")
    })
}

/// Check whether `hostname` is a syntactically valid DNS hostname.
///
/// The total length must not exceed 255 characters (checked before any
/// normalization). Exactly one trailing dot is stripped, so
/// `"example.com."` validates the same as `"example.com"` while
/// `"example.com.."` fails on its empty final label.
pub fn is_valid_hostname(hostname: &str) -> bool {
    if hostname.len() > 255 {
        return false;
    }

    let hostname = hostname.strip_suffix('.').unwrap_or(hostname);

    hostname
        .split('.')
        .all(|label| label_pattern().is_match(label))
}
