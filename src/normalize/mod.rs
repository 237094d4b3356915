// * Text normalization: diacritic stripping, date canonicalization, and the
// * positional country code used as the record id prefix.

pub mod tokenizer;

pub use tokenizer::word_count;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// * Trailing clock time on long-form dates, e.g. "24 de abril de 2025 17:15"
static CLOCK_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\d{1,2}:\d{2}.*").unwrap());

// * Long localized form: "<day> de <month-name> de <year>"
static LONG_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}) de ([[:alpha:]áéíóúü]+) de (\d{4})$").unwrap()
});

const SPANISH_MONTHS: &[(&str, u32)] = &[
    ("enero", 1),
    ("febrero", 2),
    ("marzo", 3),
    ("abril", 4),
    ("mayo", 5),
    ("junio", 6),
    ("julio", 7),
    ("agosto", 8),
    ("septiembre", 9),
    ("octubre", 10),
    ("noviembre", 11),
    ("diciembre", 12),
];

/// Canonical decomposition followed by removal of combining marks.
/// Idempotent: stripping an already-stripped string is a no-op.
pub fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Derives the 3-letter record id prefix from a country name: diacritics
/// stripped, upper-cased, first three characters. This is positional, not an
/// ISO lookup, so distinct countries sharing a prefix collide.
pub fn country_code(country: &str) -> String {
    strip_diacritics(country)
        .chars()
        .take(3)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Normalizes a raw date string to `DD/MM/YYYY`.
///
/// Tries, in order: ISO 8601 (a trailing UTC marker is stripped first), then
/// the long localized form "24 de abril de 2025" with any trailing clock time
/// removed. When neither matches, the input is returned unchanged; callers
/// treat a non-`DD/MM/YYYY` result as an inability to derive a year.
pub fn normalize_date(raw: &str) -> String {
    let mut value = raw.trim().to_string();
    if value.ends_with('Z') {
        value = value.replace('Z', "");
    }

    if let Some(date) = parse_iso(&value) {
        return date.format("%d/%m/%Y").to_string();
    }

    let stripped = CLOCK_TAIL.replace(&value, "").into_owned();
    if let Some(date) = parse_long_form(&stripped) {
        return date.format("%d/%m/%Y").to_string();
    }

    raw.to_string()
}

/// Strict parse of the canonical `DD/MM/YYYY` form.
pub fn parse_canonical_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%d/%m/%Y").ok()
}

/// Whether a canonical date falls on or after the retention cutoff year.
pub fn within_retention(date: &NaiveDate, cutoff_year: i32) -> bool {
    date.year() >= cutoff_year
}

fn parse_iso(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn parse_long_form(value: &str) -> Option<NaiveDate> {
    let caps = LONG_FORM.captures(value.trim())?;
    let day: u32 = caps[1].parse().ok()?;
    let month_name = caps[2].to_lowercase();
    let month = SPANISH_MONTHS
        .iter()
        .find(|(name, _)| *name == month_name)
        .map(|(_, n)| *n)?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
