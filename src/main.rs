//! # Ice News Monitor
//!
//! Watches the Pitztal ice-climbing news page, detects a new announcement,
//! translates it from German to English and posts it to a Telegram chat.
//!
//! ## Usage
//!
//! ```sh
//! TELEGRAM_BOT_TOKEN=... TELEGRAM_CHAT_ID=... ice_news_monitor
//! ice_news_monitor --no-telegram          # preview only
//! ```
//!
//! ## Architecture
//!
//! Each invocation performs a single run (schedule it with cron or a CI
//! timer):
//! 1. **Fetching**: download the news page
//! 2. **Extracting**: parse entries (accordion list, else generic articles)
//! 3. **Detecting**: compare the newest entry with `data/last_seen.json`
//! 4. **Notifying**: translate, format, preview and send in Telegram-sized parts
//! 5. **Persisting**: record the entry so it is not sent again
//!
//! Exit code is 1 when the page cannot be fetched or a Telegram send fails,
//! 0 otherwise.

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
#[cfg(test)]
mod testing;
mod utils;

use api::GoogleTranslator;
use cli::Cli;
use config::Config;
use error::Result;
use outputs::telegram::TelegramSender;
use pipeline::RunOutcome;
use scrapers::HttpFetcher;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("ice_news_monitor starting up");

    let args = Cli::parse();
    debug!(
        preview = args.preview_enabled(),
        telegram = args.telegram_enabled(),
        config = ?args.config,
        "Parsed CLI arguments"
    );

    let code = match execute(&args).await {
        Ok(outcome) => {
            info!(?outcome, "Run finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            ExitCode::FAILURE
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    code
}

/// Build the configured collaborators and perform one run.
async fn execute(args: &Cli) -> Result<RunOutcome> {
    let config = Config::from_cli(args)?;

    let fetcher = HttpFetcher::new(config.request_timeout)?;
    let translator =
        GoogleTranslator::new(&config.source_lang, &config.target_lang, config.request_timeout)?;
    let sender = if config.telegram {
        TelegramSender::from_config(&config)?
    } else {
        None
    };

    pipeline::run(&config, &fetcher, &translator, sender.as_ref()).await
}
