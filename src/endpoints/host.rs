//! Canonical hostname form.
//!
//! Table hosts and request hosts go through the same normalization, so the
//! tree's exact host match compares like with like.

use std::borrow::Cow;

/// Strip surrounding whitespace, port, IPv6 brackets and trailing dot;
/// lowercase the rest.
pub fn normalize_host(host: &str) -> Cow<'_, str> {
    let host = host.trim();
    let host = if let Some(rest) = host.strip_prefix('[') {
        rest.split(']').next().unwrap_or_default()
    } else {
        match host.rsplit_once(':') {
            Some((name, port)) if port.bytes().all(|b| b.is_ascii_digit()) => name,
            _ => host,
        }
    };
    let host = host.strip_suffix('.').unwrap_or(host);

    if host.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(host.to_ascii_lowercase())
    } else {
        Cow::Borrowed(host)
    }
}
