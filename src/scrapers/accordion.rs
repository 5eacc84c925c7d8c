//! Accordion-style news list.
//!
//! The Alpine Adventure page renders its announcements as a Materialize
//! `ul.collapsible`. Each `li` holds a `.collapsible-header` ("Ice News
//! 22.02.2026" plus icon ligatures) and a `.collapsible-body` with paragraphs.
//! There is no per-item permalink, so every entry links to the page itself.
//!
//! Items are not guaranteed to be in chronological order on the page, so they
//! are re-sorted by the date embedded in the header, newest first.

use crate::models::NewsEntry;
use crate::utils::{clean_header_text, element_text, parse_header_date};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Heading text (lowercased) that introduces the news list.
const MARKER: &str = "ice news";

static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h2, h3").expect("valid selector"));
static LIST: Lazy<Selector> =
    Lazy::new(|| Selector::parse("ul.collapsible").expect("valid selector"));
static HEADER: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".collapsible-header").expect("valid selector"));
static BODY: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".collapsible-body").expect("valid selector"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("valid selector"));

/// Entry plus the header date used for ordering.
struct Dated {
    entry: NewsEntry,
    date: Option<NaiveDate>,
}

/// Extract accordion items, newest first.
pub fn extract_entries(document: &Html, base_url: &str) -> Vec<NewsEntry> {
    let Some(list) = find_list(document) else {
        return Vec::new();
    };

    let mut items: Vec<Dated> = list
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li")
        .filter_map(|li| read_item(li, base_url))
        .collect();

    sort_newest_first(&mut items);
    items.into_iter().map(|item| item.entry).collect()
}

/// The first `ul.collapsible` after an "Ice News" heading, else the first one
/// in the document.
fn find_list(document: &Html) -> Option<ElementRef<'_>> {
    let mut after_marker = false;
    for node in document.root_element().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        if HEADING.matches(&element) {
            let text = element_text(&element).to_lowercase();
            if text.starts_with(MARKER) {
                after_marker = true;
            }
        } else if after_marker && LIST.matches(&element) {
            debug!("Found news list after marker heading");
            return Some(element);
        }
    }
    document.select(&LIST).next()
}

fn read_item(li: ElementRef<'_>, base_url: &str) -> Option<Dated> {
    let raw_header = li
        .select(&HEADER)
        .next()
        .map(|header| element_text(&header))
        .unwrap_or_default();

    let snippet = li
        .select(&BODY)
        .next()
        .map(|body| {
            body.select(&PARAGRAPH)
                .map(|p| element_text(&p))
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join("\n\n")
        })
        .unwrap_or_default();

    let entry = NewsEntry {
        title: clean_header_text(&raw_header),
        snippet: snippet.trim().to_string(),
        link: base_url.to_string(),
    };
    if !entry.has_content() {
        return None;
    }
    Some(Dated {
        entry,
        date: parse_header_date(&raw_header),
    })
}

/// Stable sort by date descending. Undated items compare as the earliest
/// possible date and end up last.
fn sort_newest_first(items: &mut [Dated]) {
    items.sort_by(|a, b| b.date.cmp(&a.date));
}
