//! Core domain types for the sitekb crawl/extraction pipeline.
//!
//! Wire-facing types serialize with camelCase field names so the exported
//! JSON document keeps the shape downstream consumers already expect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Crawl types
// ---------------------------------------------------------------------------

/// Bounds for a single crawl run. Both limits are enforced independently;
/// the crawl halts as soon as either is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlOptions {
    /// Maximum link-following depth from the start URL (0 = start page only).
    pub max_depth: u32,
    /// Maximum number of pages to fetch.
    pub max_pages: usize,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_pages: 25,
        }
    }
}

/// A successfully fetched page. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawledPage {
    /// Canonical (normalized) URL the page was fetched from.
    pub url: String,
    /// Link depth at which the page was discovered (sitemap pages are 0).
    pub depth: u32,
    /// Raw HTML body.
    pub html: String,
}

/// A per-URL fetch failure. Recorded once, never retried within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlError {
    pub url: String,
    pub message: String,
}

/// Outcome of one discovery strategy (or of the merged crawl).
///
/// Created fresh per crawl invocation and read-only to callers. Page order
/// is deterministic: BFS order for the link crawler, sitemap-document order
/// for the sitemap discoverer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlResult {
    pub pages: Vec<CrawledPage>,
    pub errors: Vec<CrawlError>,
}

// ---------------------------------------------------------------------------
// Extracted business facts
// ---------------------------------------------------------------------------

/// Partial contact record extracted from page content. Every field is
/// independently optional; an all-empty record collapses to "no contact
/// found" (see [`ContactInfo::is_empty`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_or_company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl ContactInfo {
    /// True when no field carries a value. Used for the explicit
    /// collapse-to-`None` post-check after extraction.
    pub fn is_empty(&self) -> bool {
        self.name_or_company.is_none()
            && self.street_address.is_none()
            && self.postal_code.is_none()
            && self.city.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.website.is_none()
    }
}

/// One normalized opening-hours line, e.g. `Montag 09:00-17:00`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHoursEntry {
    pub day: String,
    pub opens: String,
    pub closes: String,
    /// The source line as captured, for debugging or fallback usage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl OpeningHoursEntry {
    /// Uniqueness key for cross-page deduplication.
    pub fn key(&self) -> (String, String, String) {
        (self.day.clone(), self.opens.clone(), self.closes.clone())
    }
}

/// A service or offering of the business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ServiceEntry {
    /// Uniqueness key: case-insensitive name.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

// ---------------------------------------------------------------------------
// Extraction results
// ---------------------------------------------------------------------------

/// Lightweight per-page summary carried into the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Short preview of the main content (first prose block).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Everything extracted from a single crawled page.
#[derive(Debug, Clone)]
pub struct PageExtraction {
    pub page: PageSummary,
    pub contact: Option<ContactInfo>,
    pub opening_hours: Vec<OpeningHoursEntry>,
    pub services: Vec<ServiceEntry>,
    /// Full readable text of the page, space-joined.
    pub raw_text: Option<String>,
}

/// Per-page extractions merged across the whole crawl.
#[derive(Debug, Clone, Default)]
pub struct SiteExtraction {
    pub pages: Vec<PageSummary>,
    pub contact: Option<ContactInfo>,
    pub opening_hours: Vec<OpeningHoursEntry>,
    pub services: Vec<ServiceEntry>,
    pub raw_text_concat: Option<String>,
}

// ---------------------------------------------------------------------------
// KnowledgeBase
// ---------------------------------------------------------------------------

/// The final artifact handed to downstream consumers (prompt builder,
/// file export). Created once per crawl request; immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBase {
    /// The crawl root as entered by the caller.
    pub source_url: String,
    /// When this knowledge-base snapshot was generated.
    pub generated_at: DateTime<Utc>,
    /// Summaries of all pages that contributed to the knowledge base.
    pub pages: Vec<PageSummary>,
    /// Best contact candidate across all pages; `null` when nothing was found.
    pub contact: Option<ContactInfo>,
    pub opening_hours: Vec<OpeningHoursEntry>,
    pub services: Vec<ServiceEntry>,
    /// Concatenation of all per-page readable text, blank-line separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text_concat: Option<String>,
}
