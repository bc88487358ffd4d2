//! Visibility filtering and text normalization.
//!
//! Text is only ever collected from elements a human visitor would see:
//! script/style/media subtrees and elements hidden via attributes or
//! inline styles are skipped during traversal.

use scraper::ElementRef;

/// Obvious non-content elements that should never contribute text.
const EXCLUDED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "iframe", "svg", "canvas", "video", "audio",
    "source", "track",
];

/// True when this element itself must not contribute text.
pub(crate) fn is_excluded(el: ElementRef<'_>) -> bool {
    let v = el.value();

    if EXCLUDED_TAGS.contains(&v.name()) {
        return true;
    }
    if v.attr("hidden").is_some() {
        return true;
    }
    if v.attr("aria-hidden") == Some("true") {
        return true;
    }
    if let Some(style) = v.attr("style") {
        let style: String = style.to_lowercase().split_whitespace().collect();
        if style.contains("display:none") || style.contains("visibility:hidden") {
            return true;
        }
    }

    false
}

/// True when the element or any ancestor is excluded/hidden.
pub(crate) fn in_excluded_context(el: ElementRef<'_>) -> bool {
    if is_excluded(el) {
        return true;
    }
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(is_excluded)
}

/// Collect the visible text of an element, skipping excluded subtrees.
pub(crate) fn visible_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_text(el, &mut out);
    out
}

fn collect_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            if !is_excluded(child_el) {
                collect_text(child_el, out);
            }
        }
    }
}

/// Collapse all whitespace (including NBSP) to single spaces and trim.
pub(crate) fn normalize_text(text: &str) -> String {
    text.replace('\u{00A0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
