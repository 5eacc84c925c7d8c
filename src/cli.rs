//! Command-line interface definitions for the ice news monitor.
//!
//! Secrets and paths may come from flags or environment variables. Anything
//! left unset falls back to the optional YAML config file, then to the
//! built-in defaults (see [`crate::config`]).

use clap::Parser;

/// Command-line arguments for the monitor.
///
/// # Examples
///
/// ```sh
/// # Check once, print a preview and notify Telegram
/// TELEGRAM_BOT_TOKEN=... TELEGRAM_CHAT_ID=... ice_news_monitor
///
/// # Only look at the preview
/// ice_news_monitor --no-telegram
///
/// # Use a config file and a custom state location
/// ice_news_monitor --config ./config.yaml --state-file /var/lib/ice/last_seen.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Print a plain-text preview of the notification (default)
    #[arg(long, overrides_with = "no_preview")]
    pub preview: bool,

    /// Disable the terminal preview
    #[arg(long, overrides_with = "preview")]
    pub no_preview: bool,

    /// Send the notification to Telegram when configured (default)
    #[arg(long, overrides_with = "no_telegram")]
    pub telegram: bool,

    /// Do not send anything to Telegram
    #[arg(long, overrides_with = "telegram")]
    pub no_telegram: bool,

    /// News page to watch
    #[arg(long, env = "NEWS_URL")]
    pub url: Option<String>,

    /// Where the last-seen entry is stored
    #[arg(long, env = "LAST_SEEN_FILE")]
    pub state_file: Option<String>,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub telegram_bot_token: Option<String>,

    /// Telegram chat to post into
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub telegram_chat_id: Option<String>,
}

impl Cli {
    pub fn preview_enabled(&self) -> bool {
        !self.no_preview
    }

    pub fn telegram_enabled(&self) -> bool {
        !self.no_telegram
    }
}
