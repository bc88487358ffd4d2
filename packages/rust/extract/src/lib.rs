//! Heuristic content extraction from crawled HTML.
//!
//! One page in, one [`PageExtraction`] out: a summary (title + snippet),
//! optional contact record, opening hours, services, and the readable body
//! text. All heuristics fail soft; a page that yields nothing still yields a
//! well-formed extraction with empty parts.

mod contact;
mod hours;
mod sanitize;
mod services;
mod text;

use scraper::{Html, Selector};
use tracing::debug;

use sitekb_shared::{CrawledPage, PageExtraction, PageSummary};

pub use contact::extract_contact;
pub use hours::extract_opening_hours;
pub use services::extract_services;
pub use text::{Line, body_text, readable_lines};

/// Snippet length in readable lines.
const SNIPPET_LINES: usize = 6;

/// Run all extractors over one crawled page.
pub fn extract_page(page: &CrawledPage) -> PageExtraction {
    let doc = Html::parse_document(&page.html);
    let lines = readable_lines(&doc);
    let full_text = body_text(&doc);

    let contact = extract_contact(&doc, &lines, &full_text);
    let opening_hours = extract_opening_hours(&lines);
    let services = extract_services(&lines);

    let prose_start = lines.iter().position(|l| is_prose(&l.text));
    let snippet = prose_start.map(|start| {
        lines[start..]
            .iter()
            .take(SNIPPET_LINES)
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    });
    let raw_text = prose_start.map(|start| {
        lines[start..]
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    });

    debug!(
        url = %page.url,
        lines = lines.len(),
        hours = opening_hours.len(),
        services = services.len(),
        has_contact = contact.is_some(),
        "extracted page"
    );

    PageExtraction {
        page: PageSummary {
            url: page.url.clone(),
            title: extract_title(&doc),
            snippet,
        },
        contact,
        opening_hours,
        services,
        raw_text,
    }
}

/// The trimmed `<title>`, if non-empty.
fn extract_title(doc: &Html) -> Option<String> {
    let sel = Selector::parse("title").expect("title selector");
    doc.select(&sel)
        .next()
        .map(|el| el.text().collect::<String>())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Sentence-like text, or anything long enough to be body copy.
fn is_prose(text: &str) -> bool {
    let len = text.chars().count();
    (len >= 20 && text.contains(['.', '!', '?'])) || len > 40
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(html: &str) -> CrawledPage {
        CrawledPage {
            url: "https://muster.de/".to_string(),
            depth: 0,
            html: html.to_string(),
        }
    }

    #[test]
    fn title_is_trimmed_and_empty_title_dropped() {
        let doc = Html::parse_document("<html><head><title>  Muster GmbH  </title></head></html>");
        assert_eq!(extract_title(&doc).as_deref(), Some("Muster GmbH"));

        let doc = Html::parse_document("<html><head><title>   </title></head></html>");
        assert_eq!(extract_title(&doc), None);
    }

    #[test]
    fn snippet_starts_at_first_prose_line() {
        let html = r#"<html><head><title>Muster</title></head><body>
            <a href="/start">Start</a>
            <a href="/kontakt">Kontaktseite</a>
            <p>Wir sind seit 1995 Ihr Partner für Haustechnik in Berlin.</p>
            <p>Unser Team berät Sie gern persönlich vor Ort.</p>
        </body></html>"#;

        let extraction = extract_page(&page(html));
        let snippet = extraction.page.snippet.unwrap();
        assert!(snippet.starts_with("Wir sind seit 1995"));
        assert!(snippet.contains("berät Sie gern"));
    }

    #[test]
    fn page_without_prose_has_no_snippet_or_raw_text() {
        let html = r#"<html><body><a href="/a">Hier klicken bitte</a></body></html>"#;
        let extraction = extract_page(&page(html));

        assert_eq!(extraction.page.snippet, None);
        assert_eq!(extraction.raw_text, None);
    }

    #[test]
    fn full_extraction_over_a_realistic_page() {
        let html = r#"<html><head><title>Muster Haustechnik</title></head><body>
            <main>
                <h1>Muster Haustechnik GmbH</h1>
                <p>Wir sind seit 1995 Ihr Partner für Heizung und Sanitär in Berlin.</p>
                <h2>Unsere Leistungen</h2>
                <ul><li>Beratung</li><li>Reparatur</li></ul>
                <h2>Öffnungszeiten</h2>
                <p>Montag: 09:00 - 17:00</p>
                <h2>Kontakt</h2>
                <p>Musterstraße 12</p>
                <p>12345 Berlin</p>
                <p>Telefon: 030 / 5550123</p>
                <a href="mailto:info@muster.de">info@muster.de</a>
            </main>
        </body></html>"#;

        let extraction = extract_page(&page(html));

        assert_eq!(extraction.page.title.as_deref(), Some("Muster Haustechnik"));

        let contact = extraction.contact.expect("contact");
        assert_eq!(contact.email.as_deref(), Some("info@muster.de"));
        assert_eq!(contact.postal_code.as_deref(), Some("12345"));
        assert_eq!(
            contact.name_or_company.as_deref(),
            Some("Muster Haustechnik GmbH")
        );

        assert_eq!(extraction.opening_hours.len(), 1);
        assert_eq!(extraction.opening_hours[0].day, "Montag");

        let names: Vec<_> = extraction.services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Beratung", "Reparatur"]);

        let raw = extraction.raw_text.expect("raw text");
        assert!(raw.contains("seit 1995"));
    }

    #[test]
    fn prose_detection() {
        assert!(is_prose("Wir freuen uns auf Ihren Besuch."));
        assert!(is_prose(
            "Eine recht lange Zeile ganz ohne Satzzeichen aber mit vielen Worten"
        ));
        assert!(!is_prose("Kontakt"));
        assert!(!is_prose("Mehr erfahren Sie hier"));
    }
}
