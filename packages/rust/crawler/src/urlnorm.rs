//! URL canonicalization and depth helpers.
//!
//! Normalized URLs are the deduplication keys shared by the link crawler,
//! the sitemap discoverer, and the merge step, so all three must agree on
//! one canonical form: no fragment, lower-case host, no trailing slash on
//! non-root paths, query parameters sorted by key.

use url::Url;

/// File extensions the crawler never fetches as content pages.
const EXCLUDED_EXTENSIONS: &[&str] = &[
    ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".zip", ".mp4", ".mp3", ".kml",
];

/// Canonicalize a URL for deduplication and comparison.
///
/// Fails soft: an unparseable input is returned unchanged, never an error.
pub fn normalize(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };

    parsed.set_fragment(None);

    // The url crate already lower-cases the host on parse.
    let path = parsed.path().to_string();
    if path != "/" && path.ends_with('/') {
        parsed.set_path(&path[..path.len() - 1]);
    }

    if parsed.query().is_some() {
        let mut pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if pairs.is_empty() {
            parsed.set_query(None);
        } else {
            // Stable sort keeps the relative order of repeated keys.
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs)
                .finish();
            parsed.set_query(Some(&query));
        }
    }

    parsed.to_string()
}

/// True when `url` has the same host (and effective port) as `origin`.
/// Parse failure means "not the same host".
pub fn same_host(url: &str, origin: &Url) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            parsed.host_str() == origin.host_str()
                && parsed.port_or_known_default() == origin.port_or_known_default()
        }
        Err(_) => false,
    }
}

/// Number of non-empty path segments in a URL.
pub fn path_depth(url: &str) -> usize {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().split('/').filter(|s| !s.is_empty()).count(),
        Err(_) => 0,
    }
}

/// True when the URL's path nesting exceeds `max_depth`.
/// Parse failure fails open (the URL is not rejected for depth).
pub fn is_too_deep(url: &str, max_depth: u32) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            let depth = parsed.path().split('/').filter(|s| !s.is_empty()).count();
            depth > max_depth as usize
        }
        Err(_) => false,
    }
}

/// Basic check to avoid fetching binary resources during a crawl.
pub fn is_likely_file(url: &str) -> bool {
    let lower = url.to_lowercase();
    EXCLUDED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
