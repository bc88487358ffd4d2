//! Readable-text collection.
//!
//! Produces the per-page line list that all downstream heuristics (contact,
//! opening hours, services, preview) operate on. Each filter is a small
//! named predicate so the pipeline stays easy to tune.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::sanitize::{in_excluded_context, is_excluded, normalize_text, visible_text};

/// One whitespace-normalized line of readable text, tagged with the element
/// it came from (heading lines anchor service/company-name extraction).
#[derive(Debug, Clone)]
pub struct Line {
    pub tag: String,
    pub text: String,
}

impl Line {
    pub fn is_heading(&self) -> bool {
        matches!(self.tag.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
    }
}

/// Assignment/bracket/call patterns plus DOM API names that indicate a line
/// of leaked markup or script rather than prose.
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[{}<>;]|=>|function\s*\(|\bconst\s|\blet\s|\bvar\s|\breturn\s|document\.|querySelector|=\S",
    )
    .expect("code regex")
});

/// Long base64-ish runs (inline images, tokens).
static BASE64_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9+/]{60,}={0,2}").expect("base64 regex"));

/// Cookie-banner and consent boilerplate.
static CONSENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)cookie|consent|einwilligung|gdpr|dsgvo|recaptcha").expect("consent regex")
});

/// Short call-to-action anchor texts that carry no information.
static READ_MORE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(mehr|mehr erfahren|weiterlesen|weiter|jetzt kaufen|details|read more|learn more)$")
        .expect("read-more regex")
});

fn looks_like_code(line: &str) -> bool {
    CODE_RE.is_match(line) || BASE64_RE.is_match(line)
}

fn looks_like_consent_boilerplate(line: &str) -> bool {
    CONSENT_RE.is_match(line)
}

/// Collect readable lines from the content roots of a document.
///
/// Roots are `main`/`article`/`[role=main]` when present, else `body`.
/// Only content-bearing tags contribute; duplicates are dropped
/// case-insensitively, preserving first-seen order.
pub fn readable_lines(doc: &Html) -> Vec<Line> {
    let root_sel = Selector::parse("main, article, [role='main']").expect("root selector");
    let body_sel = Selector::parse("body").expect("body selector");
    let content_sel =
        Selector::parse("h1, h2, h3, h4, h5, h6, p, li, a").expect("content selector");

    let roots: Vec<_> = {
        let main_roots: Vec<_> = doc.select(&root_sel).collect();
        if main_roots.is_empty() {
            doc.select(&body_sel).collect()
        } else {
            main_roots
        }
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut lines: Vec<Line> = Vec::new();

    for root in roots {
        for el in root.select(&content_sel) {
            if in_excluded_context(el) {
                continue;
            }

            let text = normalize_text(&visible_text(el));
            let len = text.chars().count();
            if len < 3 || len > 1200 {
                continue;
            }
            if looks_like_code(&text) || looks_like_consent_boilerplate(&text) {
                continue;
            }

            let tag = el.value().name().to_string();
            if tag == "a" && (len < 8 || READ_MORE_RE.is_match(&text)) {
                continue;
            }

            if seen.insert(text.to_lowercase()) {
                lines.push(Line { tag, text });
            }
        }
    }

    lines
}

/// The full visible body text as one whitespace-normalized string.
/// Email/phone fallbacks scan this rather than the filtered line list,
/// since contact data often hides in footers and address blocks.
pub fn body_text(doc: &Html) -> String {
    let body_sel = Selector::parse("body").expect("body selector");
    doc.select(&body_sel)
        .filter(|el| !is_excluded(*el))
        .map(|el| normalize_text(&visible_text(el)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_of(html: &str) -> Vec<String> {
        let doc = Html::parse_document(html);
        readable_lines(&doc).into_iter().map(|l| l.text).collect()
    }

    #[test]
    fn prefers_main_over_body() {
        let html = r#"<html><body>
            <nav><p>Navigation text that is long enough</p></nav>
            <main><p>Main content paragraph here.</p></main>
        </body></html>"#;

        let lines = lines_of(html);
        assert_eq!(lines, vec!["Main content paragraph here.".to_string()]);
    }

    #[test]
    fn rejects_short_long_and_codey_lines() {
        let long = "x".repeat(1300);
        let html = format!(
            r#"<html><body>
                <p>ab</p>
                <p>{long}</p>
                <p>var foo = bar;</p>
                <p>A perfectly normal sentence about the business.</p>
            </body></html>"#
        );

        let lines = lines_of(&html);
        assert_eq!(
            lines,
            vec!["A perfectly normal sentence about the business.".to_string()]
        );
    }

    #[test]
    fn rejects_consent_boilerplate() {
        let html = r#"<html><body>
            <p>Wir verwenden Cookies zur Analyse des Nutzerverhaltens.</p>
            <p>Unsere Werkstatt ist seit 1995 für Sie da.</p>
        </body></html>"#;

        let lines = lines_of(html);
        assert_eq!(
            lines,
            vec!["Unsere Werkstatt ist seit 1995 für Sie da.".to_string()]
        );
    }

    #[test]
    fn anchor_lines_need_substance() {
        let html = r#"<html><body>
            <a href="/x">Mehr</a>
            <a href="/y">Weiterlesen</a>
            <a href="/z">Unsere Leistungen im Überblick</a>
        </body></html>"#;

        let lines = lines_of(html);
        assert_eq!(lines, vec!["Unsere Leistungen im Überblick".to_string()]);
    }

    #[test]
    fn deduplicates_case_insensitively() {
        let html = r#"<html><body>
            <p>Herzlich Willkommen bei Muster GmbH</p>
            <p>HERZLICH WILLKOMMEN BEI MUSTER GMBH</p>
        </body></html>"#;

        let lines = lines_of(html);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], "Herzlich Willkommen bei Muster GmbH");
    }

    #[test]
    fn hidden_subtrees_do_not_leak() {
        let html = r#"<html><body>
            <div style="display:none"><p>Secret internal note for editors</p></div>
            <p>Visible sentence for every visitor.</p>
        </body></html>"#;

        let lines = lines_of(html);
        assert_eq!(lines, vec!["Visible sentence for every visitor.".to_string()]);
    }

    #[test]
    fn body_text_includes_footer_content() {
        let html = r#"<html><body>
            <main><p>Main text.</p></main>
            <footer>Musterstraße 1, 12345 Berlin</footer>
        </body></html>"#;

        let doc = Html::parse_document(html);
        let text = body_text(&doc);
        assert!(text.contains("Musterstraße 1, 12345 Berlin"));
    }
}
