//! Bounded, polite HTML crawling for sitekb.
//!
//! This crate provides the link-following half of page discovery:
//! - [`HtmlFetcher`] — HTTP client with timeout/redirect/user-agent policy
//! - [`urlnorm`] — URL canonicalization and depth helpers
//! - [`LinkCrawler`] — breadth-first, same-host crawl under depth/page budgets
//! - [`merge_crawl_results`] — combines sitemap- and link-derived results
//!
//! Fetch failures never abort a crawl; they are recorded per URL as
//! `CrawlError`s and traversal continues.

pub mod engine;
pub mod fetch;
pub mod merge;
pub mod urlnorm;

pub use engine::LinkCrawler;
pub use fetch::{FetchOptions, HtmlFetcher};
pub use merge::merge_crawl_results;
