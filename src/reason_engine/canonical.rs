//! Canonical URL form for deduplication (spec.md §4.3 step 3): lowercase
//! scheme/host, strip default ports, drop the fragment, strip a documented
//! allowlist of tracking query params, and sort the remaining query keys.
//! Two candidates sharing a canonical URL are merged by the pipeline.

use url::Url;

/// Query parameters known to track clicks rather than identify content.
/// Stripped unconditionally before comparison.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "ref",
    "fbclid",
    "gclid",
    "igshid",
];

/// Returns `None` if `raw` is not a well-formed http/https URL.
pub fn canonicalize(raw: &str) -> Option<String> {
    let mut url = Url::parse(raw).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);

    let default_port = match url.scheme() {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    };
    if url.port() == default_port {
        let _ = url.set_port(None);
    }

    let mut kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !TRACKING_PARAMS.contains(&k.to_ascii_lowercase().as_str()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    kept.sort();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        let query = kept
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&query));
    }

    let host = url.host_str()?.to_ascii_lowercase();
    url.set_host(Some(&host)).ok()?;

    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_default_port_fragment_and_tracking_params() {
        let a = canonicalize("https://X.com:443/a?id=1#frag").unwrap();
        let b = canonicalize("https://x.com/a?utm_source=z&id=1").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        assert!(canonicalize("ftp://example.com/file").is_none());
    }

    #[test]
    fn query_keys_are_sorted() {
        let a = canonicalize("https://x.com/a?b=2&a=1").unwrap();
        assert!(a.ends_with("a=1&b=2") || a.contains("?a=1&b=2"));
    }
}
