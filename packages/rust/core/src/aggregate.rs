//! Merges per-page extractions into one site-level extraction.

use std::collections::HashSet;

use tracing::{debug, instrument};
use url::Url;

use sitekb_shared::{PageExtraction, SiteExtraction};

/// How likely a page's URL is to carry the authoritative contact record.
///
/// Dedicated contact pages beat legal pages beat the site root; anything
/// else scores zero and only wins when nothing better exists.
pub fn contact_score(url: &str) -> u32 {
    let lower = url.to_lowercase();
    let mut score = 0;
    if lower.contains("kontakt") || lower.contains("contact") {
        score += 3;
    }
    if lower.contains("impressum") || lower.contains("legal") {
        score += 2;
    }
    if is_site_root(&lower) {
        score += 1;
    }
    score
}

fn is_site_root(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.path(), "" | "/") && u.query().is_none())
        .unwrap_or(false)
}

/// Combine all per-page extractions for one crawl.
///
/// Contact: highest-scoring candidate, first-seen on ties. Hours and
/// services: concatenated and deduplicated by their keys, first-seen order.
/// Raw text: non-empty page texts joined with a blank line.
#[instrument(skip_all, fields(pages = extractions.len()))]
pub fn aggregate(extractions: &[PageExtraction]) -> SiteExtraction {
    let mut site = SiteExtraction::default();

    let mut best_score = 0u32;
    let mut seen_hours = HashSet::new();
    let mut seen_services = HashSet::new();
    let mut texts: Vec<&str> = Vec::new();

    for extraction in extractions {
        site.pages.push(extraction.page.clone());

        if let Some(contact) = &extraction.contact {
            let score = contact_score(&extraction.page.url);
            if site.contact.is_none() || score > best_score {
                debug!(url = %extraction.page.url, score, "new best contact candidate");
                site.contact = Some(contact.clone());
                best_score = score;
            }
        }

        for entry in &extraction.opening_hours {
            if seen_hours.insert(entry.key()) {
                site.opening_hours.push(entry.clone());
            }
        }
        for service in &extraction.services {
            if seen_services.insert(service.key()) {
                site.services.push(service.clone());
            }
        }

        if let Some(text) = extraction.raw_text.as_deref().filter(|t| !t.is_empty()) {
            texts.push(text);
        }
    }

    if !texts.is_empty() {
        site.raw_text_concat = Some(texts.join("\n\n"));
    }

    site
}
