//! Knowledge-base file export (JSON and readable plain text).

use std::fs;
use std::path::Path;

use tracing::{info, instrument};

use sitekb_shared::{KnowledgeBase, Result, SitekbError};

/// Render the knowledge base as a readable plain-text report.
pub fn knowledge_base_to_plain_text(kb: &KnowledgeBase) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# Knowledge Base".to_string());
    lines.push(format!("Source URL: {}", kb.source_url));
    lines.push(format!("Generated at: {}", kb.generated_at.to_rfc3339()));
    lines.push(String::new());

    if let Some(contact) = &kb.contact {
        lines.push("## Kontakt".to_string());
        if let Some(name) = &contact.name_or_company {
            lines.push(format!("Firma: {name}"));
        }
        if let Some(street) = &contact.street_address {
            lines.push(format!("Adresse: {street}"));
        }
        if let (Some(postal), Some(city)) = (&contact.postal_code, &contact.city) {
            lines.push(format!("Stadt: {postal} {city}"));
        }
        if let Some(phone) = &contact.phone {
            lines.push(format!("Telefon: {phone}"));
        }
        if let Some(email) = &contact.email {
            lines.push(format!("E-Mail: {email}"));
        }
        if let Some(website) = &contact.website {
            lines.push(format!("Website: {website}"));
        }
        lines.push(String::new());
    }

    if !kb.opening_hours.is_empty() {
        lines.push("## Öffnungszeiten".to_string());
        for entry in &kb.opening_hours {
            lines.push(format!("{}: {} - {}", entry.day, entry.opens, entry.closes));
        }
        lines.push(String::new());
    }

    if !kb.services.is_empty() {
        lines.push("## Leistungen".to_string());
        for service in &kb.services {
            match &service.description {
                Some(desc) => lines.push(format!("- {}: {desc}", service.name)),
                None => lines.push(format!("- {}", service.name)),
            }
        }
        lines.push(String::new());
    }

    lines.push("## Seiten".to_string());
    for (index, page) in kb.pages.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!(
            "### Seite {}: {}",
            index + 1,
            page.title.as_deref().unwrap_or(&page.url)
        ));
        lines.push(format!("URL: {}", page.url));
        if let Some(snippet) = &page.snippet {
            lines.push(snippet.clone());
        }
    }

    if let Some(raw) = &kb.raw_text_concat {
        lines.push(String::new());
        lines.push("## Rohtext".to_string());
        lines.push(raw.clone());
    }

    lines.join("\n")
}

/// Write the knowledge base as pretty-printed JSON.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn write_json_file(kb: &KnowledgeBase, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SitekbError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(kb)
        .map_err(|e| SitekbError::parse(format!("serializing knowledge base: {e}")))?;
    fs::write(path, json).map_err(|e| SitekbError::io(path, e))?;
    info!("wrote knowledge base JSON");
    Ok(())
}

/// Write the plain-text rendering next to (or instead of) the JSON file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn write_text_file(kb: &KnowledgeBase, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SitekbError::io(parent, e))?;
    }
    fs::write(path, knowledge_base_to_plain_text(kb)).map_err(|e| SitekbError::io(path, e))?;
    info!("wrote knowledge base text");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sitekb_shared::{ContactInfo, OpeningHoursEntry, PageSummary, ServiceEntry};

    fn sample_kb() -> KnowledgeBase {
        KnowledgeBase {
            source_url: "https://muster.de".to_string(),
            generated_at: Utc::now(),
            pages: vec![PageSummary {
                url: "https://muster.de/".to_string(),
                title: Some("Muster GmbH".to_string()),
                snippet: Some("Wir sind Ihr Partner.".to_string()),
            }],
            contact: Some(ContactInfo {
                name_or_company: Some("Muster GmbH".to_string()),
                postal_code: Some("12345".to_string()),
                city: Some("Berlin".to_string()),
                email: Some("info@muster.de".to_string()),
                ..Default::default()
            }),
            opening_hours: vec![OpeningHoursEntry {
                day: "Montag".to_string(),
                opens: "09:00".to_string(),
                closes: "17:00".to_string(),
                raw: None,
            }],
            services: vec![ServiceEntry {
                name: "Beratung".to_string(),
                description: Some("Persönlich vor Ort.".to_string()),
            }],
            raw_text_concat: None,
        }
    }

    #[test]
    fn plain_text_sections() {
        let text = knowledge_base_to_plain_text(&sample_kb());

        assert!(text.starts_with("# Knowledge Base\nSource URL: https://muster.de"));
        assert!(text.contains("## Kontakt\nFirma: Muster GmbH"));
        assert!(text.contains("Stadt: 12345 Berlin"));
        assert!(text.contains("## Öffnungszeiten\nMontag: 09:00 - 17:00"));
        assert!(text.contains("- Beratung: Persönlich vor Ort."));
        assert!(text.contains("### Seite 1: Muster GmbH"));
        assert!(!text.contains("## Rohtext"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let mut kb = sample_kb();
        kb.contact = None;
        kb.opening_hours.clear();
        kb.services.clear();

        let text = knowledge_base_to_plain_text(&kb);
        assert!(!text.contains("## Kontakt"));
        assert!(!text.contains("## Öffnungszeiten"));
        assert!(!text.contains("## Leistungen"));
        assert!(text.contains("## Seiten"));
    }

    #[test]
    fn json_file_round_trips() {
        // Unique per process so parallel test invocations cannot race.
        let dir = std::env::temp_dir().join(format!(
            "sitekb-export-test-{}-{}",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let path = dir.join("kb.json");

        let kb = sample_kb();
        write_json_file(&kb, &path).unwrap();

        let loaded: KnowledgeBase =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.source_url, kb.source_url);
        assert_eq!(loaded.pages.len(), 1);

        fs::remove_dir_all(&dir).ok();
    }
}
