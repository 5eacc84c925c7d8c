//! Runtime configuration.
//!
//! A [`Config`] is built once in `main` from the CLI, the optional YAML file
//! and the defaults below, then passed by reference to every stage.
//! Precedence: CLI/env > config file > defaults.

use crate::cli::Cli;
use crate::error::{MonitorError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

pub const DEFAULT_NEWS_URL: &str =
    "https://www.alpine-adventure.at/de/alpine-adventure/alpine-adventure/news.html";
pub const DEFAULT_STATE_FILE: &str = "data/last_seen.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TRANSLATION_CHUNK_SIZE: usize = 4500;
pub const DEFAULT_MESSAGE_CHUNK_SIZE: usize = 4000;
pub const DEFAULT_MESSAGE_PAUSE_MS: u64 = 500;

/// Optional settings read from `config.yaml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub news_url: Option<String>,
    pub state_file: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub translation_chunk_size: Option<usize>,
    pub message_chunk_size: Option<usize>,
    pub message_pause_ms: Option<u64>,
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
}

impl FileConfig {
    /// Read and parse a YAML config file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            MonitorError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let parsed: FileConfig = serde_yaml::from_str(&raw).map_err(|e| {
            MonitorError::Config(format!("invalid YAML in {}: {e}", path.display()))
        })?;
        info!("Loaded configuration file");
        Ok(parsed)
    }
}

/// Everything a run needs to know.
#[derive(Debug, Clone)]
pub struct Config {
    pub news_url: String,
    pub state_file: PathBuf,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub request_timeout: Duration,
    pub translation_chunk_size: usize,
    pub message_chunk_size: usize,
    pub message_pause: Duration,
    pub source_lang: String,
    pub target_lang: String,
    pub preview: bool,
    pub telegram: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            news_url: DEFAULT_NEWS_URL.to_string(),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            telegram_bot_token: None,
            telegram_chat_id: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            translation_chunk_size: DEFAULT_TRANSLATION_CHUNK_SIZE,
            message_chunk_size: DEFAULT_MESSAGE_CHUNK_SIZE,
            message_pause: Duration::from_millis(DEFAULT_MESSAGE_PAUSE_MS),
            source_lang: "de".to_string(),
            target_lang: "en".to_string(),
            preview: true,
            telegram: true,
        }
    }
}

impl Config {
    /// Build the run configuration from parsed CLI arguments, loading the
    /// YAML file when `--config` is given.
    ///
    /// # Arguments
    ///
    /// * `cli` - Parsed command line, with env fallbacks already applied by clap
    ///
    /// # Returns
    ///
    /// The merged configuration, or [`MonitorError::Config`] when the file
    /// cannot be read or parsed, or a size or timeout setting is zero.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let config = Config::from_cli(&Cli::parse())?;
    /// ```
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let file = match cli.config.as_deref() {
            Some(path) => FileConfig::load(Path::new(path))?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        let defaults = Config::default();

        let translation_chunk_size = file
            .translation_chunk_size
            .unwrap_or(defaults.translation_chunk_size);
        let message_chunk_size = file
            .message_chunk_size
            .unwrap_or(defaults.message_chunk_size);
        if translation_chunk_size == 0 || message_chunk_size == 0 {
            return Err(MonitorError::Config(
                "chunk sizes must be greater than zero".to_string(),
            ));
        }
        if file.request_timeout_secs == Some(0) {
            return Err(MonitorError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        let config = Config {
            news_url: cli
                .url
                .clone()
                .or(file.news_url)
                .unwrap_or(defaults.news_url),
            state_file: cli
                .state_file
                .clone()
                .or(file.state_file)
                .map(PathBuf::from)
                .unwrap_or(defaults.state_file),
            telegram_bot_token: cli
                .telegram_bot_token
                .clone()
                .or(file.telegram_bot_token),
            telegram_chat_id: cli.telegram_chat_id.clone().or(file.telegram_chat_id),
            request_timeout: file
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            translation_chunk_size,
            message_chunk_size,
            message_pause: file
                .message_pause_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.message_pause),
            source_lang: file.source_lang.unwrap_or(defaults.source_lang),
            target_lang: file.target_lang.unwrap_or(defaults.target_lang),
            preview: cli.preview_enabled(),
            telegram: cli.telegram_enabled(),
        };
        debug!(
            news_url = %config.news_url,
            state_file = %config.state_file.display(),
            preview = config.preview,
            telegram = config.telegram,
            "Resolved configuration"
        );
        Ok(config)
    }

    /// Bot token and chat id, if both are present and non-empty.
    pub fn telegram_credentials(&self) -> Option<(&str, &str)> {
        let token = self.telegram_bot_token.as_deref().filter(|t| !t.is_empty())?;
        let chat_id = self.telegram_chat_id.as_deref().filter(|c| !c.is_empty())?;
        Some((token, chat_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["ice_news_monitor"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_defaults_without_file() {
        let config = Config::merge(&cli(&["--url", DEFAULT_NEWS_URL]), FileConfig::default()).unwrap();
        assert_eq!(config.news_url, DEFAULT_NEWS_URL);
        assert_eq!(config.translation_chunk_size, 4500);
        assert_eq!(config.message_chunk_size, 4000);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.source_lang, "de");
        assert_eq!(config.target_lang, "en");
        assert!(config.preview);
        assert!(config.telegram);
    }

    #[test]
    fn test_cli_wins_over_file() {
        let file = FileConfig {
            news_url: Some("https://file.example/news".to_string()),
            state_file: Some("/file/state.json".to_string()),
            message_chunk_size: Some(1000),
            ..FileConfig::default()
        };
        let config = Config::merge(
            &cli(&["--url", "https://cli.example/news", "--state-file", "/cli/state.json"]),
            file,
        )
        .unwrap();
        assert_eq!(config.news_url, "https://cli.example/news");
        assert_eq!(config.state_file, PathBuf::from("/cli/state.json"));
        assert_eq!(config.message_chunk_size, 1000);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let file = FileConfig {
            translation_chunk_size: Some(0),
            ..FileConfig::default()
        };
        let result = Config::merge(&cli(&[]), file);
        assert!(matches!(result, Err(MonitorError::Config(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let file = FileConfig {
            request_timeout_secs: Some(0),
            ..FileConfig::default()
        };
        match Config::merge(&cli(&[]), file) {
            Err(MonitorError::Config(msg)) => assert!(msg.contains("request_timeout_secs")),
            other => panic!("expected Config error, got {other:?}"),
        }

        let file = FileConfig {
            request_timeout_secs: Some(5),
            ..FileConfig::default()
        };
        let config = Config::merge(&cli(&[]), file).unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "news_url: https://example.com/news.html\ntelegram_chat_id: \"-100123\"\nmessage_pause_ms: 0"
        )
        .unwrap();

        let parsed = FileConfig::load(file.path()).unwrap();
        assert_eq!(parsed.news_url.as_deref(), Some("https://example.com/news.html"));
        assert_eq!(parsed.telegram_chat_id.as_deref(), Some("-100123"));
        assert_eq!(parsed.message_pause_ms, Some(0));
    }

    #[test]
    fn test_load_yaml_rejects_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "telegram_token: abc").unwrap();
        assert!(matches!(
            FileConfig::load(file.path()),
            Err(MonitorError::Config(_))
        ));
    }

    #[test]
    fn test_telegram_credentials() {
        let mut config = Config::default();
        assert_eq!(config.telegram_credentials(), None);

        config.telegram_bot_token = Some("tok".to_string());
        config.telegram_chat_id = Some(String::new());
        assert_eq!(config.telegram_credentials(), None);

        config.telegram_chat_id = Some("123".to_string());
        assert_eq!(config.telegram_credentials(), Some(("tok", "123")));
    }
}
