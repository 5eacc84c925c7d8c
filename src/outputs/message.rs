//! Telegram notification body and terminal preview.
//!
//! The message uses Telegram's HTML parse mode:
//!
//! ```text
//! 🏔 <b>Pitztal Ice – New Update!</b>
//!
//! <b>Ice News 02/22/2026</b>
//! <i>(Original: Ice News 22.02.2026)</i>
//!
//! Hello folks, ...
//!
//! <a href="https://...">Read more</a>
//! ```
//!
//! Title and snippet are translated independently; every piece of scraped
//! text is HTML-escaped before it is placed in the template.

use crate::api::{Translate, translate_long_text, translate_or_original};
use crate::models::NewsEntry;
use crate::utils::{escape_html, strip_html};
use tracing::instrument;

pub const HEADER_LINE: &str = "🏔 <b>Pitztal Ice – New Update!</b>";

const PREVIEW_SEPARATOR_WIDTH: usize = 60;

/// Translate and format `entry` as an HTML notification.
#[instrument(level = "info", skip_all, fields(title = %entry.title))]
pub async fn build_message<T: Translate>(
    translator: &T,
    entry: &NewsEntry,
    max_chunk_chars: usize,
) -> String {
    let title_en = translate_or_original(translator, &entry.title).await;
    let snippet_en = translate_long_text(translator, &entry.snippet, max_chunk_chars).await;
    render(entry, &title_en, &snippet_en)
}

/// Lay out an entry and its translations.
fn render(entry: &NewsEntry, title_en: &str, snippet_en: &str) -> String {
    let title_de_safe = escape_html(&entry.title);
    let title_en_safe = escape_html(title_en);
    let snippet_en_safe = escape_html(snippet_en);

    let mut lines = vec![HEADER_LINE.to_string(), String::new()];
    if !title_en_safe.is_empty() {
        lines.push(format!("<b>{title_en_safe}</b>"));
        if !title_de_safe.is_empty() && title_de_safe != title_en_safe {
            lines.push(format!("<i>(Original: {title_de_safe})</i>"));
        }
        lines.push(String::new());
    }
    if !snippet_en_safe.is_empty() {
        lines.push(snippet_en_safe);
        lines.push(String::new());
    }
    if !entry.link.is_empty() {
        lines.push(format!(
            "<a href=\"{}\">Read more</a>",
            escape_html(&entry.link)
        ));
    }

    lines.join("\n").trim().to_string()
}

/// Plain-text rendering of `message` framed by separator lines.
pub fn preview_text(message: &str) -> String {
    let separator = "-".repeat(PREVIEW_SEPARATOR_WIDTH);
    format!("{separator}\n{}\n{separator}", strip_html(message))
}

/// Print the plain-text preview to stdout.
pub fn print_preview(message: &str) {
    println!("{}", preview_text(message));
}
