//! Contact extraction heuristics.
//!
//! Each field is pursued independently: explicit `mailto:`/`tel:` links are
//! preferred over regex matches in body text, and every rule fails soft to
//! `None`. An all-empty record collapses to no contact at all.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use sitekb_shared::ContactInfo;

use crate::sanitize::in_excluded_context;
use crate::text::Line;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email regex")
});

/// Loose phone-shaped substrings; candidates are validated separately.
static PHONE_CANDIDATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+?\d{2,4}[\s/-]{0,3})?(\(?\d{2,5}\)?[\s/-]{0,3}){1,4}\d{2,5}")
        .expect("phone regex")
});

/// Acceptable phone shapes: country-code prefix, slash groups, hyphen
/// groups, or a parenthesized area code.
static PHONE_COUNTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\+|00)\d").expect("country regex"));
static PHONE_SLASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d\s*/\s*\d").expect("slash regex"));
static PHONE_HYPHEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d\s*-\s*\d").expect("hyphen regex"));
static PHONE_PARENS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\d{2,5}\)").expect("parens regex"));

static POSTAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{5})\b").expect("postal regex"));

/// Legal-boilerplate lines never serve as a street address.
static LEGAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)impressum|datenschutz|agb|haftung|copyright|alle rechte|©")
        .expect("legal regex")
});

/// Generic site-chrome headings that are never a company name.
const NAME_BLACKLIST: &[&str] = &[
    "kontakt",
    "contact",
    "impressum",
    "jobs",
    "agb",
    "datenschutz",
    "home",
    "startseite",
    "willkommen",
    "herzlich willkommen",
    "news",
    "blog",
    "faq",
    "öffnungszeiten",
    "leistungen",
    "unsere leistungen",
    "services",
    "angebote",
    "produkte",
    "über uns",
    "anfahrt",
];

/// Extract a contact record from one page.
///
/// Returns `None` (not an object of empties) when nothing was found.
pub fn extract_contact(doc: &Html, lines: &[Line], body_text: &str) -> Option<ContactInfo> {
    let mut contact = ContactInfo {
        email: extract_email(doc, body_text),
        phone: extract_phone(doc, body_text),
        website: extract_website(doc),
        name_or_company: extract_company_name(lines),
        ..Default::default()
    };

    if let Some((street, postal, city)) = extract_address(lines) {
        contact.street_address = street;
        contact.postal_code = Some(postal);
        contact.city = city;
    }

    if contact.is_empty() { None } else { Some(contact) }
}

/// Prefer the first `mailto:` target, else the first email-shaped token.
fn extract_email(doc: &Html, body_text: &str) -> Option<String> {
    let sel = Selector::parse(r#"a[href^="mailto:"]"#).expect("mailto selector");
    for el in doc.select(&sel) {
        if in_excluded_context(el) {
            continue;
        }
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let addr = href
            .trim_start_matches("mailto:")
            .split('?')
            .next()
            .unwrap_or("")
            .trim();
        if EMAIL_RE.is_match(addr) {
            return Some(addr.to_string());
        }
    }

    EMAIL_RE
        .find(body_text)
        .map(|m| m.as_str().to_string())
}

fn digit_count(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Prefer the first `tel:` link with enough digits, else a validated
/// phone-shaped substring from the body text.
fn extract_phone(doc: &Html, body_text: &str) -> Option<String> {
    let sel = Selector::parse(r#"a[href^="tel:"]"#).expect("tel selector");
    for el in doc.select(&sel) {
        if in_excluded_context(el) {
            continue;
        }
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let number = href.trim_start_matches("tel:").trim();
        if digit_count(number) >= 5 {
            return Some(number.to_string());
        }
    }

    PHONE_CANDIDATE_RE
        .find_iter(body_text)
        .map(|m| m.as_str().trim().to_string())
        .find(|c| is_plausible_phone(c))
}

/// Weed out years, prices, and other number-shaped noise.
fn is_plausible_phone(candidate: &str) -> bool {
    let digits = digit_count(candidate);

    // Bare 4-6 digit numbers are postal codes, years, or house numbers.
    if candidate.chars().all(|c| c.is_ascii_digit()) && (4..=6).contains(&digits) {
        return false;
    }
    if candidate.contains('.') {
        return false;
    }
    if digits < 6 {
        return false;
    }

    PHONE_COUNTRY_RE.is_match(candidate)
        || PHONE_SLASH_RE.is_match(candidate)
        || PHONE_HYPHEN_RE.is_match(candidate)
        || PHONE_PARENS_RE.is_match(candidate)
}

/// The first absolute http(s) link on the page.
fn extract_website(doc: &Html) -> Option<String> {
    let sel = Selector::parse("a[href]").expect("href selector");
    for el in doc.select(&sel) {
        if in_excluded_context(el) {
            continue;
        }
        let Some(href) = el.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.starts_with("http://") || href.starts_with("https://") {
            return Some(href.to_string());
        }
    }
    None
}

/// Street/postal/city from the first line carrying a 5-digit postal token.
///
/// The text after the token up to the next comma is the city; the nearest
/// preceding non-boilerplate line of plausible length is the street.
fn extract_address(lines: &[Line]) -> Option<(Option<String>, String, Option<String>)> {
    let (idx, caps) = lines.iter().enumerate().find_map(|(i, line)| {
        if line.text.chars().count() > 120 {
            return None;
        }
        POSTAL_RE.captures(&line.text).map(|caps| (i, caps))
    })?;

    let postal = caps[1].to_string();
    let after = &lines[idx].text[caps.get(1).expect("postal group").end()..];
    let city = after
        .split(',')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);

    let street = lines[..idx]
        .iter()
        .rev()
        .map(|l| l.text.as_str())
        .find(|text| {
            let len = text.chars().count();
            (5..=120).contains(&len) && !LEGAL_RE.is_match(text)
        })
        .map(String::from);

    Some((street, postal, city))
}

/// The first h1/h2 whose text plausibly names the business.
fn extract_company_name(lines: &[Line]) -> Option<String> {
    lines
        .iter()
        .filter(|l| matches!(l.tag.as_str(), "h1" | "h2"))
        .find(|l| {
            let len = l.text.chars().count();
            (3..=80).contains(&len) && !NAME_BLACKLIST.contains(&l.text.to_lowercase().as_str())
        })
        .map(|l| l.text.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{body_text, readable_lines};

    fn extract(html: &str) -> Option<ContactInfo> {
        let doc = Html::parse_document(html);
        let lines = readable_lines(&doc);
        let text = body_text(&doc);
        extract_contact(&doc, &lines, &text)
    }

    #[test]
    fn empty_page_collapses_to_none() {
        let html = r#"<html><body><p>Nur ein wenig Text ohne Kontaktdaten hier.</p></body></html>"#;
        assert_eq!(extract(html), None);
    }

    #[test]
    fn mailto_beats_body_text_email() {
        let html = r#"<html><body>
            <p>Schreiben Sie an andere@beispiel.de oder nutzen Sie den Link.</p>
            <a href="mailto:info@muster.de?subject=Anfrage">E-Mail senden</a>
        </body></html>"#;

        let contact = extract(html).unwrap();
        assert_eq!(contact.email.as_deref(), Some("info@muster.de"));
    }

    #[test]
    fn unusable_links_skip_to_the_fallbacks() {
        // Empty link targets must not short-circuit extraction; the
        // body-text fallbacks still run.
        let html = r#"<html><body>
            <a href="mailto:">Leer</a>
            <a href="tel:">Auch leer</a>
            <p>Erreichbar unter 030 / 5550123 oder kontakt@muster.de jederzeit.</p>
        </body></html>"#;

        let contact = extract(html).unwrap();
        assert_eq!(contact.email.as_deref(), Some("kontakt@muster.de"));
        assert!(contact.phone.unwrap().contains("5550123"));
    }

    #[test]
    fn email_falls_back_to_body_text() {
        let html = r#"<html><body><p>Kontaktieren Sie uns unter kontakt@muster-gmbh.de jederzeit.</p></body></html>"#;
        let contact = extract(html).unwrap();
        assert_eq!(contact.email.as_deref(), Some("kontakt@muster-gmbh.de"));
    }

    #[test]
    fn tel_link_wins_when_it_has_enough_digits() {
        let html = r#"<html><body>
            <a href="tel:+4930123456">Jetzt anrufen</a>
            <p>Oder Telefon: 030 / 987654</p>
        </body></html>"#;

        let contact = extract(html).unwrap();
        assert_eq!(contact.phone.as_deref(), Some("+4930123456"));
    }

    #[test]
    fn phone_shapes() {
        assert!(is_plausible_phone("+49 30 1234567"));
        assert!(is_plausible_phone("0049 30 1234567"));
        assert!(is_plausible_phone("030 / 1234567"));
        assert!(is_plausible_phone("030-123456"));
        assert!(is_plausible_phone("(030) 123456"));

        // Years, prices, postal codes, too-short fragments.
        assert!(!is_plausible_phone("12345"));
        assert!(!is_plausible_phone("2024"));
        assert!(!is_plausible_phone("19.99"));
        assert!(!is_plausible_phone("123 45"));
    }

    #[test]
    fn body_phone_requires_accepted_shape() {
        let html = r#"<html><body><p>Rufen Sie an: 030 / 5550123 und fragen Sie nach Herrn Muster.</p></body></html>"#;
        let contact = extract(html).unwrap();
        let phone = contact.phone.unwrap();
        assert!(phone.contains("030"));
        assert!(phone.contains('/'));
    }

    #[test]
    fn address_line_parsing() {
        let html = r#"<html><body>
            <p>Muster Autowerkstatt GmbH</p>
            <p>Musterstraße 12</p>
            <p>12345 Berlin, Deutschland</p>
        </body></html>"#;

        let contact = extract(html).unwrap();
        assert_eq!(contact.postal_code.as_deref(), Some("12345"));
        assert_eq!(contact.city.as_deref(), Some("Berlin"));
        assert_eq!(contact.street_address.as_deref(), Some("Musterstraße 12"));
    }

    #[test]
    fn legal_boilerplate_is_not_a_street() {
        let html = r#"<html><body>
            <p>Impressum und Datenschutz</p>
            <p>10115 Berlin</p>
        </body></html>"#;

        let contact = extract(html).unwrap();
        assert_eq!(contact.postal_code.as_deref(), Some("10115"));
        assert_eq!(contact.street_address, None);
    }

    #[test]
    fn company_name_skips_site_chrome_headings() {
        let html = r#"<html><body>
            <h1>Kontakt</h1>
            <h2>Muster Sanitärtechnik GmbH</h2>
        </body></html>"#;

        let contact = extract(html).unwrap();
        assert_eq!(
            contact.name_or_company.as_deref(),
            Some("Muster Sanitärtechnik GmbH")
        );
    }

    #[test]
    fn website_is_first_absolute_link() {
        let html = r#"<html><body>
            <a href="/intern">Interne Seite hier entlang</a>
            <a href="https://www.muster.de">www.muster.de</a>
        </body></html>"#;

        let contact = extract(html).unwrap();
        assert_eq!(contact.website.as_deref(), Some("https://www.muster.de"));
    }
}
