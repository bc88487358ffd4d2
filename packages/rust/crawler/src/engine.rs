//! Breadth-first, same-host link crawler.
//!
//! The crawler starts from a given URL, follows in-page links in document
//! order up to a depth/page budget, and stays on the start URL's host.
//! Order is deterministic: a FIFO queue plus document-order link extraction
//! gives a stable BFS, which the downstream merge step relies on.

use std::collections::{HashSet, VecDeque};

use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};
use url::Url;

use sitekb_shared::{CrawlError, CrawlOptions, CrawlResult, CrawledPage};

use crate::fetch::HtmlFetcher;
use crate::urlnorm::{is_likely_file, normalize, same_host};

/// One pending traversal step. Owned exclusively by the active run's queue.
struct QueueItem {
    url: String,
    depth: u32,
}

/// Breadth-first HTML crawler bounded by [`CrawlOptions`].
pub struct LinkCrawler<'a> {
    fetcher: &'a HtmlFetcher,
    options: CrawlOptions,
}

impl<'a> LinkCrawler<'a> {
    pub fn new(fetcher: &'a HtmlFetcher, options: CrawlOptions) -> Self {
        Self { fetcher, options }
    }

    /// Crawl starting from `start`, returning all fetched pages plus the
    /// per-URL errors encountered along the way.
    ///
    /// The visited set and queue live for exactly one invocation; nothing
    /// is shared across runs. A fetch failure records a [`CrawlError`] and
    /// traversal continues — the run itself never fails.
    #[instrument(skip_all, fields(start = %start, max_depth = self.options.max_depth, max_pages = self.options.max_pages))]
    pub async fn crawl(&self, start: &Url) -> CrawlResult {
        let mut visited: HashSet<String> = HashSet::new();
        let mut pages: Vec<CrawledPage> = Vec::new();
        let mut errors: Vec<CrawlError> = Vec::new();

        let mut queue: VecDeque<QueueItem> = VecDeque::new();
        queue.push_back(QueueItem {
            url: normalize(start.as_str()),
            depth: 0,
        });

        loop {
            if pages.len() >= self.options.max_pages {
                break;
            }
            let Some(item) = queue.pop_front() else {
                break;
            };

            // Mark immediately so duplicates already queued are dropped here.
            if !visited.insert(item.url.clone()) {
                continue;
            }
            if item.depth > self.options.max_depth {
                continue;
            }

            match self.fetcher.fetch(&item.url).await {
                Ok(html) => {
                    // Only expand links on levels below max_depth.
                    if item.depth < self.options.max_depth {
                        for link in extract_links(&html, &item.url) {
                            // Scope is the *original* start host, so redirects
                            // to other domains cannot widen the crawl.
                            if !same_host(&link, start) {
                                continue;
                            }
                            let normalized = normalize(&link);
                            if !visited.contains(&normalized) {
                                queue.push_back(QueueItem {
                                    url: normalized,
                                    depth: item.depth + 1,
                                });
                            }
                        }
                    }

                    debug!(url = %item.url, depth = item.depth, "page fetched");
                    pages.push(CrawledPage {
                        url: item.url,
                        depth: item.depth,
                        html,
                    });
                }
                Err(e) => {
                    warn!(url = %item.url, error = %e, "fetch failed, continuing");
                    errors.push(CrawlError {
                        url: item.url,
                        message: e.to_string(),
                    });
                }
            }
        }

        CrawlResult { pages, errors }
    }
}

/// Extract navigable links from a page, resolved against the base URL and
/// returned in document order (first occurrence wins).
///
/// Malformed hrefs are extremely common in real-world HTML; they are
/// skipped silently rather than recorded as errors.
fn extract_links(html: &str, base_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(base_url) else {
        return Vec::new();
    };

    let doc = Html::parse_document(html);
    let link_sel = Selector::parse("a[href]").expect("valid selector");

    let mut seen: HashSet<String> = HashSet::new();
    let mut links: Vec<String> = Vec::new();

    for el in doc.select(&link_sel) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let trimmed = href.trim();

        if trimmed.starts_with('#')
            || trimmed.starts_with("mailto:")
            || trimmed.starts_with("tel:")
            || trimmed.starts_with("javascript:")
        {
            continue;
        }

        let Ok(mut resolved) = base.join(trimmed) else {
            continue;
        };

        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            continue;
        }

        // Fragments never distinguish pages.
        resolved.set_fragment(None);
        let link = resolved.to_string();

        // Avoid crawling documents and media files.
        if is_likely_file(&link) {
            continue;
        }

        if seen.insert(link.clone()) {
            links.push(link);
        }
    }

    links
}
