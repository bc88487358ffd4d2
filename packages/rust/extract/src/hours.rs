//! Opening-hours extraction.
//!
//! A line yields an entry when it pairs a recognized day token (German or
//! English, long or abbreviated) with an `HH:MM-HH:MM` range. One entry per
//! line; ranges without a day token are ignored.

use std::sync::LazyLock;

use regex::Regex;

use sitekb_shared::OpeningHoursEntry;

use crate::text::Line;

/// Longest alternatives first so "Montag" is not cut to "Mo".
static DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(Montag|Dienstag|Mittwoch|Donnerstag|Freitag|Samstag|Sonntag|Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday|Mon|Tue|Wed|Thu|Fri|Sat|Sun|Mo|Di|Mi|Do|Fr|Sa|So)\b",
    )
    .expect("day regex")
});

static TIME_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-2]?\d:[0-5]\d)\s*[\u{2013}-]\s*([0-2]?\d:[0-5]\d)").expect("time range regex")
});

/// Scan readable lines for day + time-range pairs.
pub fn extract_opening_hours(lines: &[Line]) -> Vec<OpeningHoursEntry> {
    lines
        .iter()
        .filter(|line| line.text.chars().count() <= 120)
        .filter_map(|line| {
            let day = DAY_RE.find(&line.text)?;
            let range = TIME_RANGE_RE.captures(&line.text)?;
            Some(OpeningHoursEntry {
                day: day.as_str().to_string(),
                opens: range[1].to_string(),
                closes: range[2].to_string(),
                raw: Some(line.text.clone()),
            })
        })
        .collect()
}
