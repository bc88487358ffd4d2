//! Combines the two discovery strategies into one deduplicated page set.

use std::collections::HashSet;

use sitekb_shared::CrawlResult;

use crate::urlnorm::normalize;

/// Merge sitemap-derived and link-crawl-derived results under one page cap.
///
/// Sitemap pages come first, so on a duplicate normalized URL the
/// sitemap-sourced page wins. Errors from both strategies are concatenated
/// without deduplication — the same URL failing in both strategies is
/// acceptable and informative.
pub fn merge_crawl_results(
    sitemap: CrawlResult,
    html: CrawlResult,
    max_pages: usize,
) -> CrawlResult {
    let mut seen: HashSet<String> = HashSet::new();
    let mut pages = Vec::new();

    for page in sitemap.pages.into_iter().chain(html.pages) {
        if seen.insert(normalize(&page.url)) {
            pages.push(page);
        }
    }
    pages.truncate(max_pages);

    let mut errors = sitemap.errors;
    errors.extend(html.errors);

    CrawlResult { pages, errors }
}
