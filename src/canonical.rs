//! URL canonicalization for fingerprinting.
//!
//! Two URLs that name the same resource must serialize identically before
//! hashing. Parsing through the `url` crate already lowercases the scheme
//! and host, drops default ports, and turns an empty path into `/`; on top
//! of that the query string is reordered into a stable form and the
//! fragment is kept or stripped depending on whether the render mode can
//! see it.

use url::Url;

use crate::error::Result;

/// Canonical serialized form of `raw`.
///
/// The query string is treated as an unordered multiset of components:
/// `?a=1&b=2` and `?b=2&a=1` canonicalize identically. Repeated keys are
/// preserved, and a valueless key (`?a`) stays distinct from an empty value
/// (`?a=`). The fragment is kept verbatim only when `keep_fragment` is set;
/// a bare `#` counts as no fragment either way.
pub fn canonicalize(raw: &str, keep_fragment: bool) -> Result<String> {
    let mut url = Url::parse(raw)?;

    if let Some(query) = url.query() {
        if query.is_empty() {
            // A lone `?` marker carries no pairs.
            url.set_query(None);
        } else {
            url.set_query(Some(&sort_query(query)));
        }
    }

    match url.fragment() {
        Some(fragment) if keep_fragment && !fragment.is_empty() => {}
        _ => url.set_fragment(None),
    }

    Ok(url.into())
}

/// Sort `&`-separated query components by (name, value), with valueless
/// components ordering before empty-valued ones.
fn sort_query(query: &str) -> String {
    let mut components: Vec<(&str, Option<&str>)> = query
        .split('&')
        .map(|component| match component.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (component, None),
        })
        .collect();
    components.sort_unstable();
    let sorted: Vec<String> = components
        .into_iter()
        .map(|(name, value)| match value {
            Some(value) => format!("{name}={value}"),
            None => name.to_string(),
        })
        .collect();
    sorted.join("&")
}
