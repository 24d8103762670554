use url::Url;

/// Canonical absolute http(s) form of `raw`, or `None` when it cannot be one.
///
/// Bare hosts get `https://`; any other explicit scheme is refused. The
/// fragment is dropped, the query kept.
pub fn normalize_url(raw: &str) -> Option<String> {
    parse_normalized(raw).map(String::from)
}

pub(crate) fn parse_normalized(raw: &str) -> Option<Url> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let with_scheme = if has_http_scheme(s) {
        s.to_string()
    } else if s.contains("://") {
        return None;
    } else {
        format!("https://{}", s)
    };

    let mut url = Url::parse(&with_scheme).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    match url.host_str() {
        Some(h) if !h.is_empty() => {}
        _ => return None,
    }
    url.set_fragment(None);
    Some(url)
}

fn has_http_scheme(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Lowercased host of an already-normalized url.
pub fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed.host_str().map(|h| h.to_ascii_lowercase())
}

/// Canonical form of a configured allowlist entry.
pub fn canonical_host_entry(raw: &str) -> String {
    raw.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// True when `host` is an allowlisted entry or a proper subdomain of one.
pub fn is_allowed_host<S: AsRef<str>>(host: &str, allowed: &[S]) -> bool {
    let h = canonical_host_entry(host);
    if h.is_empty() {
        return false;
    }
    allowed.iter().any(|entry| {
        let d = canonical_host_entry(entry.as_ref());
        if d.is_empty() {
            return false;
        }
        h == d || h.strip_suffix(d.as_str()).is_some_and(|rest| rest.ends_with('.'))
    })
}
