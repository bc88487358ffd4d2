//! Sitemap-based page discovery.
//!
//! Before (and alongside) link-following, sitekb checks whether the site
//! publishes an XML sitemap. If found, its `<loc>` entries provide a
//! candidate page list that is usually more complete than what BFS link
//! extraction reaches within the same budget.
//!
//! Sitemap absence is a normal outcome, not a failure: discovery then
//! returns an empty result and the caller relies on pure link-crawling.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, instrument, warn};
use url::Url;

use sitekb_crawler::urlnorm::{is_likely_file, is_too_deep, normalize};
use sitekb_crawler::HtmlFetcher;
use sitekb_shared::{CrawlError, CrawlOptions, CrawlResult, CrawledPage};

/// Canonical sitemap locations, tried in fixed order.
const SITEMAP_CANDIDATES: &[&str] = &["/sitemap.xml", "/sitemap_index.xml", "/sitemap-index.xml"];

/// Maximum levels of sitemap-index nesting. The visited set already breaks
/// cycles; this caps pathological chains of distinct index files.
const MAX_SITEMAP_NESTING: usize = 5;

/// Matches `<loc>…</loc>` entries. Real-world sitemaps are frequently not
/// well-formed XML, so a tolerant regex scan beats a strict parser here.
static LOC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<loc>\s*([^<]+?)\s*</loc>").expect("loc regex"));

/// Discover pages via the site's XML sitemap(s).
///
/// Tries each canonical location in order and takes the first one that
/// yields at least one URL within the budget. The collected URLs are then
/// fetched; per-URL failures become [`CrawlError`]s. All sitemap pages are
/// reported at depth 0.
#[instrument(skip_all, fields(start = %start, max_pages = options.max_pages))]
pub async fn discover(start: &Url, options: CrawlOptions, fetcher: &HtmlFetcher) -> CrawlResult {
    let Some(origin) = origin_of(start) else {
        warn!(%start, "start URL has no host, skipping sitemap discovery");
        return CrawlResult::default();
    };

    let urls = load_sitemap_urls(&origin, options, fetcher).await;
    if urls.is_empty() {
        debug!("no sitemap found, falling back to link crawl only");
        return CrawlResult::default();
    }

    info!(candidates = urls.len(), "sitemap URLs discovered");

    let mut pages: Vec<CrawledPage> = Vec::new();
    let mut errors: Vec<CrawlError> = Vec::new();

    for url in urls.into_iter().take(options.max_pages) {
        match fetcher.fetch(&url).await {
            Ok(html) => pages.push(CrawledPage {
                url,
                depth: 0,
                html,
            }),
            Err(e) => errors.push(CrawlError {
                url,
                message: e.to_string(),
            }),
        }
    }

    CrawlResult { pages, errors }
}

/// Strip a URL down to its origin (scheme + host + optional port).
fn origin_of(url: &Url) -> Option<Url> {
    url.host_str()?;
    let mut origin = url.clone();
    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    Some(origin)
}

/// Try each candidate sitemap location; return the first non-empty URL
/// list, capped at `max_pages`.
async fn load_sitemap_urls(
    origin: &Url,
    options: CrawlOptions,
    fetcher: &HtmlFetcher,
) -> Vec<String> {
    for candidate in SITEMAP_CANDIDATES {
        let sitemap_url = format!(
            "{}{}",
            origin.as_str().trim_end_matches('/'),
            candidate
        );

        let xml = match fetcher.fetch(&sitemap_url).await {
            Ok(xml) => xml,
            Err(e) => {
                debug!(url = %sitemap_url, error = %e, "sitemap candidate not available");
                continue;
            }
        };

        // One visited set across the whole recursive parse prevents cycles
        // and duplicate work between nested index files.
        let mut visited: HashSet<String> = HashSet::new();
        let mut urls: Vec<String> = Vec::new();
        collect_locs(fetcher, xml, origin, options, &mut visited, &mut urls, 0).await;

        if !urls.is_empty() {
            debug!(url = %sitemap_url, count = urls.len(), "sitemap parsed");
            urls.truncate(options.max_pages);
            return urls;
        }
    }

    Vec::new()
}

/// Recursively scan one sitemap document in document order.
///
/// A `<loc>` pointing at another `.xml` resource is treated as a nested
/// sitemap (sitemap-index pattern) and descended into; anything else is a
/// content-page candidate filtered by depth budget and file extension.
/// Malformed entries are skipped silently.
fn collect_locs<'a>(
    fetcher: &'a HtmlFetcher,
    xml: String,
    origin: &'a Url,
    options: CrawlOptions,
    visited: &'a mut HashSet<String>,
    urls: &'a mut Vec<String>,
    nesting: usize,
) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
    Box::pin(async move {
        for caps in LOC_RE.captures_iter(&xml) {
            if urls.len() >= options.max_pages {
                break;
            }

            let raw = caps[1].trim();
            if raw.is_empty() {
                continue;
            }

            let Ok(resolved) = origin.join(raw) else {
                continue;
            };

            if resolved.host_str() != origin.host_str()
                || resolved.port_or_known_default() != origin.port_or_known_default()
            {
                continue;
            }

            let normalized = normalize(resolved.as_str());
            if !visited.insert(normalized.clone()) {
                continue;
            }

            if resolved.path().to_lowercase().ends_with(".xml") {
                if nesting >= MAX_SITEMAP_NESTING {
                    warn!(url = %normalized, "sitemap nesting limit reached, skipping");
                    continue;
                }
                match fetcher.fetch(&normalized).await {
                    Ok(child_xml) => {
                        collect_locs(
                            fetcher,
                            child_xml,
                            origin,
                            options,
                            visited,
                            urls,
                            nesting + 1,
                        )
                        .await;
                    }
                    Err(e) => {
                        debug!(url = %normalized, error = %e, "nested sitemap fetch failed");
                    }
                }
                continue;
            }

            if is_too_deep(&normalized, options.max_depth) {
                continue;
            }
            if is_likely_file(&normalized) {
                continue;
            }

            urls.push(normalized);
        }
    })
}
