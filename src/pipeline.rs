//! One monitoring run.
//!
//! ```text
//! fetch ─▶ extract ─▶ detect ─┬─ unchanged ─▶ done
//!                             └─ new ─▶ format ─▶ preview/deliver ─▶ persist ─▶ done
//! ```
//!
//! The state file is written last and only for a new entry. A failed send
//! returns before that point, so the same entry is picked up again next run.

use crate::api::Translate;
use crate::config::Config;
use crate::error::Result;
use crate::models::{LastSeenRecord, NewsEntry};
use crate::outputs::json::{load_last_seen, save_last_seen};
use crate::outputs::message::{build_message, print_preview};
use crate::outputs::telegram::{Deliver, send_messages};
use crate::scrapers::{FetchPage, fetch_news};
use tracing::{error, info, instrument};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The page yielded no entries.
    NoEntries,
    /// The newest entry matches the last-seen record.
    Unchanged,
    /// A new entry was processed and persisted.
    Updated { delivered_messages: usize },
}

/// Whether `candidate` differs from what was last notified.
///
/// Compares title and snippet by exact string equality. An empty record
/// always counts as new.
pub fn is_new(candidate: &NewsEntry, last_seen: &LastSeenRecord) -> bool {
    last_seen.is_empty()
        || candidate.title != last_seen.title()
        || candidate.snippet != last_seen.snippet()
}

/// Execute one fetch/detect/notify/persist cycle.
///
/// `sender` is `None` when Telegram credentials are missing; delivery is then
/// skipped with an error log and the entry is still persisted.
#[instrument(level = "info", skip_all, fields(url = %config.news_url))]
pub async fn run<F, T, D>(
    config: &Config,
    fetcher: &F,
    translator: &T,
    sender: Option<&D>,
) -> Result<RunOutcome>
where
    F: FetchPage,
    T: Translate,
    D: Deliver,
{
    let entries = fetch_news(fetcher, &config.news_url).await?;
    let Some(latest) = entries.first() else {
        info!("No news items retrieved. Nothing to do.");
        return Ok(RunOutcome::NoEntries);
    };

    let last_seen = load_last_seen(&config.state_file).await;
    if !is_new(latest, &last_seen) {
        info!(title = %latest.title, "Latest news already pulled. No new updates available.");
        return Ok(RunOutcome::Unchanged);
    }

    info!(title = %latest.title, "New update detected");
    let message = build_message(translator, latest, config.translation_chunk_size).await;

    if config.preview {
        print_preview(&message);
    }

    let mut delivered_messages = 0;
    if config.telegram {
        match sender {
            Some(sender) => {
                delivered_messages = send_messages(
                    sender,
                    latest,
                    &message,
                    config.message_chunk_size,
                    config.message_pause,
                )
                .await?;
            }
            None => error!(
                "TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID is not set. Skipping Telegram notification."
            ),
        }
    }

    save_last_seen(&config.state_file, latest).await?;
    Ok(RunOutcome::Updated { delivered_messages })
}
