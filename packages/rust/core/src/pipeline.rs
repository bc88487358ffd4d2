//! End-to-end pipeline: URL → discovery + crawl → extraction → knowledge base.

use std::time::{Duration, Instant};

use tracing::{info, instrument};
use url::Url;

use sitekb_crawler::{FetchOptions, HtmlFetcher, LinkCrawler, merge_crawl_results};
use sitekb_discovery::discover;
use sitekb_extract::extract_page;
use sitekb_shared::{CrawlError, CrawlOptions, CrawlResult, KnowledgeBase, Result, SitekbError};

use crate::aggregate::aggregate;
use crate::assemble::assemble;

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _result: &BuildResult) {}
}

/// Result of a full knowledge-base build.
#[derive(Debug)]
pub struct BuildResult {
    /// The assembled knowledge base.
    pub knowledge_base: KnowledgeBase,
    /// Per-URL fetch failures encountered during the crawl.
    pub errors: Vec<CrawlError>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Validate the start URL into a crawl origin.
///
/// This is the only fatal parse path: per-link and per-sitemap-entry
/// failures are skipped or recorded downstream, but a start URL without a
/// usable http(s) origin fails the whole invocation.
fn parse_start_url(start_url: &str) -> Result<Url> {
    let url = Url::parse(start_url)
        .map_err(|e| SitekbError::parse(format!("invalid start URL {start_url}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SitekbError::validation(format!(
            "start URL must be http(s), got {}",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(SitekbError::parse(format!(
            "start URL {start_url} has no host"
        )));
    }
    Ok(url)
}

/// Crawl one site with both discovery strategies.
///
/// Sitemap discovery and BFS link-following run concurrently with fully
/// independent state; their results merge with sitemap pages taking
/// priority. Never fails for "no pages found".
#[instrument(skip_all, fields(url = start_url))]
pub async fn crawl_site(
    start_url: &str,
    options: CrawlOptions,
    fetch: &FetchOptions,
) -> Result<CrawlResult> {
    let start = parse_start_url(start_url)?;
    let fetcher = HtmlFetcher::new(fetch)?;
    let crawler = LinkCrawler::new(&fetcher, options);

    let (sitemap, links) = tokio::join!(discover(&start, options, &fetcher), crawler.crawl(&start));

    info!(
        sitemap_pages = sitemap.pages.len(),
        crawled_pages = links.pages.len(),
        "merging discovery strategies"
    );

    Ok(merge_crawl_results(sitemap, links, options.max_pages))
}

/// Run the full pipeline.
///
/// 1. Crawl (sitemap + link-following, merged)
/// 2. Extract business facts per page
/// 3. Aggregate and assemble the knowledge base
#[instrument(skip_all, fields(url = start_url))]
pub async fn build_knowledge_base(
    start_url: &str,
    options: CrawlOptions,
    fetch: &FetchOptions,
    progress: &dyn ProgressReporter,
) -> Result<BuildResult> {
    let started = Instant::now();

    progress.phase("Crawling site");
    let crawl = crawl_site(start_url, options, fetch).await?;

    progress.phase("Extracting content");
    let extractions: Vec<_> = crawl.pages.iter().map(extract_page).collect();

    progress.phase("Assembling knowledge base");
    let site = aggregate(&extractions);
    let knowledge_base = assemble(start_url, &site);

    let result = BuildResult {
        knowledge_base,
        errors: crawl.errors,
        elapsed: started.elapsed(),
    };

    info!(
        pages = result.knowledge_base.pages.len(),
        errors = result.errors.len(),
        elapsed_ms = result.elapsed.as_millis() as u64,
        "knowledge base built"
    );
    progress.done(&result);

    Ok(result)
}
