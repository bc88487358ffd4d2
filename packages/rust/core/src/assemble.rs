//! Final knowledge-base assembly.

use chrono::Utc;
use tracing::{info, instrument};

use sitekb_shared::{KnowledgeBase, SiteExtraction};

/// Attach the source URL and a generation timestamp to the aggregated
/// extraction. Pure assembly; the input is not consumed or mutated.
#[instrument(skip_all, fields(source_url, pages = extraction.pages.len()))]
pub fn assemble(source_url: &str, extraction: &SiteExtraction) -> KnowledgeBase {
    info!(
        pages = extraction.pages.len(),
        hours = extraction.opening_hours.len(),
        services = extraction.services.len(),
        has_contact = extraction.contact.is_some(),
        "assembling knowledge base"
    );

    KnowledgeBase {
        source_url: source_url.to_string(),
        generated_at: Utc::now(),
        pages: extraction.pages.clone(),
        contact: extraction.contact.clone(),
        opening_hours: extraction.opening_hours.clone(),
        services: extraction.services.clone(),
        raw_text_concat: extraction.raw_text_concat.clone(),
    }
}
