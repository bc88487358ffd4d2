//! Shared types, error model, and configuration for sitekb.
//!
//! This crate is the foundation depended on by all other sitekb crates.
//! It provides:
//! - [`SitekbError`] — the unified error type
//! - Domain types ([`CrawlResult`], [`ContactInfo`], [`KnowledgeBase`], …)
//! - Configuration ([`AppConfig`], [`CrawlConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CrawlConfig, DefaultsConfig, FetchDefaultsConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{Result, SitekbError};
pub use types::{
    ContactInfo, CrawlError, CrawlOptions, CrawlResult, CrawledPage, KnowledgeBase,
    OpeningHoursEntry, PageExtraction, PageSummary, ServiceEntry, SiteExtraction,
};
