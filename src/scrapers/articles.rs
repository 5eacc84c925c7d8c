//! Generic article/teaser layout.
//!
//! Used when the page has no accordion list. Candidate containers are taken
//! from the first selector below that matches anything; within each container
//! the title, snippet and link are found by tag first, then by class name.

use crate::models::NewsEntry;
use crate::utils::element_text;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Container selectors, most specific first.
const CANDIDATES: &[&str] = &[
    "article.news-item",
    "article",
    ".news-list-item",
    ".news-item",
    ".teaser",
];

static CANDIDATE_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    CANDIDATES
        .iter()
        .map(|css| Selector::parse(css).expect("valid selector"))
        .collect()
});
static HEADING: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, h4").expect("valid selector"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("valid selector"));
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));

/// Extract entries in document order.
pub fn extract_entries(document: &Html, base_url: &str) -> Vec<NewsEntry> {
    let Some(candidates) = CANDIDATE_SELECTORS
        .iter()
        .map(|selector| document.select(selector).collect::<Vec<_>>())
        .find(|found| !found.is_empty())
    else {
        return Vec::new();
    };

    candidates
        .into_iter()
        .map(|container| read_container(container, base_url))
        .filter(NewsEntry::has_content)
        .collect()
}

fn read_container(container: ElementRef<'_>, base_url: &str) -> NewsEntry {
    let title = container
        .select(&HEADING)
        .next()
        .or_else(|| find_by_class(container, &["title"]))
        .map(|el| element_text(&el))
        .unwrap_or_default();

    let snippet = container
        .select(&PARAGRAPH)
        .next()
        .or_else(|| find_by_class(container, &["teaser", "summary"]))
        .map(|el| element_text(&el))
        .unwrap_or_default();

    let link = container
        .select(&LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| resolve_link(base_url, href))
        .unwrap_or_default();

    NewsEntry {
        title,
        snippet,
        link,
    }
}

/// First descendant (excluding `root`) with a class containing any of
/// `needles`, case-insensitively.
fn find_by_class<'a>(root: ElementRef<'a>, needles: &[&str]) -> Option<ElementRef<'a>> {
    root.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| {
            el.value().classes().any(|class| {
                let class = class.to_lowercase();
                needles.iter().any(|needle| class.contains(needle))
            })
        })
}

/// Make `href` absolute against the page URL. Links that already look
/// absolute, or that cannot be joined, are returned as given.
fn resolve_link(base_url: &str, href: &str) -> String {
    if href.is_empty() || href.starts_with("http") {
        return href.to_string();
    }
    Url::parse(base_url)
        .and_then(|base| base.join(href))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}
