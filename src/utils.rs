//! Text helpers shared by the scrapers and the notification builder.
//!
//! - Accordion header cleanup and date parsing
//! - Whitespace-normalised element text
//! - HTML escaping for Telegram and tag stripping for the terminal preview
//! - String truncation for logging

use chrono::NaiveDate;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;

/// Icon ligatures that leak into accordion header text.
static ICON_LABELS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(keyboard_arrow_right|terrain)\b").expect("valid regex"));

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

static HEADER_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,2})\.([0-9]{1,2})\.([0-9]{2,4})").expect("valid regex"));

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Collect the text of an element, trimming each text node and joining the
/// non-empty ones with single spaces.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .join(" ")
}

/// Normalise an accordion header by removing icon labels and collapsing
/// whitespace.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     clean_header_text("Ice  News  keyboard_arrow_right 22.02.2026"),
///     "Ice News 22.02.2026"
/// );
/// ```
pub fn clean_header_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let without_icons = ICON_LABELS.replace_all(text, "");
    WHITESPACE_RUN
        .replace_all(&without_icons, " ")
        .trim()
        .to_string()
}

/// Parse a `D.M.Y` / `DD.MM.YYYY` date out of a header like
/// `"Ice News 22.02.2026"`.
///
/// Two-digit years are read as 20YY. Impossible calendar dates yield `None`.
pub fn parse_header_date(text: &str) -> Option<NaiveDate> {
    let caps = HEADER_DATE.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let mut year: i32 = caps[3].parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Escape text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Remove HTML tags for plain-text terminal output.
pub fn strip_html(text: &str) -> String {
    HTML_TAG.replace_all(text, "").into_owned()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut after `max` characters with an ellipsis and the
/// number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}
