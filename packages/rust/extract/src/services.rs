//! Service-catalog extraction.
//!
//! Services are harvested from windows below headings that look like a
//! service section ("Unsere Leistungen", "Services", ...). Within a window,
//! short list-like lines become service names and a longer following line
//! may become the description.

use std::sync::LazyLock;

use regex::Regex;

use sitekb_shared::ServiceEntry;

use crate::text::Line;

static SERVICE_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bleistungen\b|\bservices?\b|\bangebote?\b|\bprodukte\b|\bour services\b")
        .expect("service heading regex")
});

static TIME_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}:\d{2}").expect("time token regex"));

/// Nav and legal labels that slip into lists but are never services.
static NON_SERVICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(kontakt|impressum|datenschutz|agb|home|startseite|mehr|weiter|zurück|login|anmelden|suche|sitemap|cookie)",
    )
    .expect("non-service regex")
});

/// Lines after a heading are considered until the next heading or this cap.
const WINDOW_LINES: usize = 12;

/// Harvest service entries below service-section headings, case-insensitively
/// de-duplicated by name across all windows.
pub fn extract_services(lines: &[Line]) -> Vec<ServiceEntry> {
    let mut services: Vec<ServiceEntry> = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    for (idx, heading) in lines.iter().enumerate() {
        if !heading.is_heading() || !SERVICE_HEADING_RE.is_match(&heading.text) {
            continue;
        }

        let window = lines[idx + 1..]
            .iter()
            .take_while(|l| !l.is_heading())
            .take(WINDOW_LINES)
            .collect::<Vec<_>>();

        let mut i = 0;
        while i < window.len() {
            let line = window[i];
            i += 1;
            if !is_service_name(&line.text) {
                continue;
            }

            // A longer following line that is not itself name-shaped
            // becomes the description and is consumed.
            let description = window.get(i).and_then(|next| {
                let len = next.text.chars().count();
                if (25..=220).contains(&len) && !is_service_name(&next.text) {
                    Some(next.text.clone())
                } else {
                    None
                }
            });
            if description.is_some() {
                i += 1;
            }

            let key = line.text.to_lowercase();
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            services.push(ServiceEntry {
                name: line.text.clone(),
                description,
            });
        }
    }

    services
}

/// Short, few-word, non-navigational text without times or URLs.
fn is_service_name(text: &str) -> bool {
    let len = text.chars().count();
    if !(4..=80).contains(&len) {
        return false;
    }
    if text.split_whitespace().count() > 6 {
        return false;
    }
    if TIME_TOKEN_RE.is_match(text) {
        return false;
    }
    if NON_SERVICE_RE.is_match(text) {
        return false;
    }
    if text.contains("http://") || text.contains("https://") || text.contains("www.") {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(text: &str) -> Line {
        Line {
            tag: "h2".to_string(),
            text: text.to_string(),
        }
    }

    fn item(text: &str) -> Line {
        Line {
            tag: "li".to_string(),
            text: text.to_string(),
        }
    }

    fn para(text: &str) -> Line {
        Line {
            tag: "p".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn list_under_service_heading() {
        let lines = vec![
            heading("Unsere Leistungen"),
            item("Beratung"),
            item("Reparatur"),
        ];
        let services = extract_services(&lines);

        assert_eq!(services.len(), 2);
        assert_eq!(services[0].name, "Beratung");
        assert_eq!(services[1].name, "Reparatur");
        assert_eq!(services[0].description, None);
    }

    #[test]
    fn long_following_line_becomes_description() {
        let lines = vec![
            heading("Unsere Leistungen"),
            item("Heizungswartung"),
            para("Wir warten Ihre Heizungsanlage jährlich und dokumentieren alle Messwerte."),
            item("Rohrreinigung"),
        ];
        let services = extract_services(&lines);

        assert_eq!(services.len(), 2);
        assert_eq!(
            services[0].description.as_deref(),
            Some("Wir warten Ihre Heizungsanlage jährlich und dokumentieren alle Messwerte.")
        );
        assert_eq!(services[1].name, "Rohrreinigung");
        assert_eq!(services[1].description, None);
    }

    #[test]
    fn window_ends_at_next_heading() {
        let lines = vec![
            heading("Unsere Leistungen"),
            item("Beratung"),
            heading("Öffnungszeiten"),
            item("Montagsrabatt"),
        ];
        let services = extract_services(&lines);

        assert_eq!(services.len(), 1);
        assert_eq!(services[0].name, "Beratung");
    }

    #[test]
    fn no_heading_no_services() {
        let lines = vec![item("Beratung"), item("Reparatur")];
        assert!(extract_services(&lines).is_empty());
    }

    #[test]
    fn nav_labels_and_times_are_rejected() {
        let lines = vec![
            heading("Services"),
            item("Kontakt"),
            item("Mo 09:00-17:00"),
            item("Gartenpflege"),
        ];
        let services = extract_services(&lines);

        assert_eq!(services.len(), 1);
        assert_eq!(services[0].name, "Gartenpflege");
    }

    #[test]
    fn duplicate_names_across_windows_collapse() {
        let lines = vec![
            heading("Unsere Leistungen"),
            item("Beratung"),
            heading("Angebote"),
            item("beratung"),
            item("Montage"),
        ];
        let services = extract_services(&lines);

        assert_eq!(services.len(), 2);
        assert_eq!(services[0].name, "Beratung");
        assert_eq!(services[1].name, "Montage");
    }

    #[test]
    fn window_is_capped() {
        let mut lines = vec![heading("Leistungen")];
        for i in 0..20 {
            lines.push(item(&format!("Dienstleistung Nummer {i}")));
        }
        let services = extract_services(&lines);

        assert_eq!(services.len(), WINDOW_LINES);
    }
}
