//! Telegram delivery.
//!
//! Telegram rejects messages over 4096 characters, so long notifications are
//! split on line boundaries into several messages. Every message after the
//! first starts with a bold `"<title> - part N"` header. Parts are sent one at
//! a time with a short pause in between; clients may otherwise display
//! rapid-fire messages out of order.

use crate::config::Config;
use crate::error::DeliveryError;
use crate::models::{MessageChunk, NewsEntry};
use crate::utils::{escape_html, truncate_for_log};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument};

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Title used in continuation headers when the entry has none.
const FALLBACK_TITLE: &str = "News Update";

/// Messaging transport capability.
pub trait Deliver {
    /// Send one HTML-formatted message.
    async fn send(&self, text: &str) -> Result<(), DeliveryError>;
}

/// `sendMessage` request body.
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

/// Bot API client bound to one chat.
#[derive(Debug, Clone)]
pub struct TelegramSender {
    client: Client,
    api_url: String,
    token: String,
    chat_id: String,
}

impl TelegramSender {
    pub fn new(token: &str, chat_id: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_api_url(TELEGRAM_API_URL, token, chat_id, timeout)
    }

    /// Create a sender against a Bot API server other than
    /// `api.telegram.org`, such as a self-hosted one.
    ///
    /// # Arguments
    ///
    /// * `api_url` - Server base URL; `/bot<token>/sendMessage` is appended
    /// * `token` - Bot token
    /// * `chat_id` - Target chat
    /// * `timeout` - Per-request timeout
    ///
    /// # Example
    ///
    /// ```ignore
    /// let sender = TelegramSender::with_api_url(
    ///     "http://localhost:8081",
    ///     &token,
    ///     &chat_id,
    ///     Duration::from_secs(30),
    /// )?;
    /// ```
    pub fn with_api_url(
        api_url: &str,
        token: &str,
        chat_id: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }

    /// Build a sender from the run configuration, or `None` when the bot
    /// token or chat id is missing.
    pub fn from_config(config: &Config) -> Result<Option<Self>, reqwest::Error> {
        config
            .telegram_credentials()
            .map(|(token, chat_id)| Self::new(token, chat_id, config.request_timeout))
            .transpose()
    }
}

impl Deliver for TelegramSender {
    #[instrument(level = "info", skip_all, fields(chars = text.chars().count()))]
    async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.token);
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: false,
        };

        let response = self.client.post(url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %truncate_for_log(&body, 500), "Telegram API error response");
            return Err(DeliveryError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Split `message` into chunks of at most `max_chars` characters, never
/// breaking a line.
///
/// A message that fits is returned as the only chunk. Otherwise chunks 2..n
/// are prefixed with `<b>{title} - part {n}</b>` and a blank line.
pub fn split_message(message: &str, title: &str, max_chars: usize) -> Vec<MessageChunk> {
    if message.chars().count() <= max_chars {
        return vec![MessageChunk {
            text: message.to_string(),
        }];
    }

    let mut bodies: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for line in message.split('\n') {
        let line_len = line.chars().count() + 1;
        if current_len + line_len > max_chars && !current.is_empty() {
            bodies.push(current.join("\n"));
            current.clear();
            current_len = 0;
        }
        current.push(line);
        current_len += line_len;
    }
    if !current.is_empty() {
        bodies.push(current.join("\n"));
    }

    let title = if title.is_empty() { FALLBACK_TITLE } else { title };
    let title_safe = escape_html(title);
    bodies
        .into_iter()
        .enumerate()
        .map(|(i, body)| {
            let text = if i == 0 {
                body
            } else {
                format!("<b>{title_safe} - part {}</b>\n\n{body}", i + 1)
            };
            MessageChunk { text }
        })
        .collect()
}

/// Deliver `message` for `entry` in order, pausing between parts.
///
/// # Arguments
///
/// * `sender` - Transport for each part
/// * `entry` - The news entry; its title names the continuation parts
/// * `message` - Full formatted HTML message
/// * `max_chars` - Character limit per part before headers are added
/// * `pause` - Delay between consecutive parts
///
/// # Returns
///
/// The number of messages sent. The first failing send aborts the rest and
/// its error is returned.
///
/// # Example
///
/// ```ignore
/// let parts = send_messages(&sender, &entry, &message, 4000, Duration::from_millis(500)).await?;
/// ```
#[instrument(level = "info", skip_all, fields(title = %entry.title))]
pub async fn send_messages<D: Deliver>(
    sender: &D,
    entry: &NewsEntry,
    message: &str,
    max_chars: usize,
    pause: Duration,
) -> Result<usize, DeliveryError> {
    let chunks = split_message(message, &entry.title, max_chars);
    let total = chunks.len();

    for (i, chunk) in chunks.iter().enumerate() {
        sender.send(&chunk.text).await?;
        if i + 1 < total && !pause.is_zero() {
            sleep(pause).await;
        }
    }

    if total > 1 {
        info!(parts = total, "Telegram notification sent successfully");
    } else {
        info!("Telegram notification sent successfully");
    }
    Ok(total)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::testing::serve_once;
    use std::cell::RefCell;

    /// Captures sent messages; fails from the `fail_at`-th call (0-based) on.
    #[derive(Default)]
    pub(crate) struct RecordingSender {
        pub sent: RefCell<Vec<String>>,
        pub fail_at: Option<usize>,
    }

    impl Deliver for RecordingSender {
        async fn send(&self, text: &str) -> Result<(), DeliveryError> {
            if self.fail_at.is_some_and(|n| self.sent.borrow().len() >= n) {
                return Err(DeliveryError::Api {
                    status: 400,
                    body: "Bad Request: chat not found".to_string(),
                });
            }
            self.sent.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    fn long_message(lines: usize) -> String {
        (0..lines)
            .map(|i| format!("line {i:02} {}", "z".repeat(20)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_short_message_is_single_chunk() {
        let chunks = split_message("<b>Hi</b>\n\nthere", "Hi", 4000);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "<b>Hi</b>\n\nthere");
    }

    #[test]
    fn test_long_message_gets_part_headers() {
        let message = long_message(20);
        let chunks = split_message(&message, "Ice News 22.02.2026", 100);

        assert!(chunks.len() > 1);
        assert!(!chunks[0].text.contains(" - part "));
        for (i, chunk) in chunks.iter().enumerate().skip(1) {
            let header = format!("<b>Ice News 22.02.2026 - part {}</b>\n\n", i + 1);
            assert!(chunk.text.starts_with(&header), "chunk {i}: {}", chunk.text);
        }
    }

    #[test]
    fn test_lines_are_never_split() {
        let message = long_message(20);
        let chunks = split_message(&message, "T", 100);

        let mut rejoined = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let body = if i == 0 {
                chunk.text.as_str()
            } else {
                chunk.text.split_once("\n\n").map(|(_, body)| body).unwrap()
            };
            assert!(body.chars().count() <= 100);
            rejoined.extend(body.split('\n'));
        }
        let original: Vec<&str> = message.split('\n').collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn test_header_title_is_escaped_and_defaulted() {
        let message = long_message(10);
        let chunks = split_message(&message, "Eis & Schnee", 60);
        assert!(chunks[1].text.starts_with("<b>Eis &amp; Schnee - part 2</b>"));

        let chunks = split_message(&message, "", 60);
        assert!(chunks[1].text.starts_with("<b>News Update - part 2</b>"));
    }

    #[test]
    fn test_oversized_line_is_its_own_chunk() {
        let big = "x".repeat(50);
        let message = format!("a\n{big}\nb");
        let chunks = split_message(&message, "T", 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text, "a");
        assert_eq!(chunks[1].text, format!("<b>T - part 2</b>\n\n{big}"));
        assert_eq!(chunks[2].text, "<b>T - part 3</b>\n\nb");
    }

    #[tokio::test]
    async fn test_send_messages_in_order() {
        let sender = RecordingSender::default();
        let entry = NewsEntry {
            title: "T".to_string(),
            ..NewsEntry::default()
        };
        let message = long_message(20);

        let sent = send_messages(&sender, &entry, &message, 100, Duration::ZERO)
            .await
            .unwrap();

        let expected: Vec<String> = split_message(&message, "T", 100)
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(sent, expected.len());
        assert_eq!(*sender.sent.borrow(), expected);
    }

    #[tokio::test]
    async fn test_send_messages_stops_on_failure() {
        let sender = RecordingSender {
            fail_at: Some(1),
            ..RecordingSender::default()
        };
        let result = send_messages(&sender, &NewsEntry::default(), &long_message(20), 100, Duration::ZERO).await;
        assert!(matches!(result, Err(DeliveryError::Api { status: 400, .. })));
        assert_eq!(sender.sent.borrow().len(), 1);
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let mut config = Config::default();
        assert!(TelegramSender::from_config(&config).unwrap().is_none());

        config.telegram_bot_token = Some("tok".to_string());
        config.telegram_chat_id = Some("123".to_string());
        assert!(TelegramSender::from_config(&config).unwrap().is_some());
    }

    #[test]
    fn test_payload_shape() {
        let payload = SendMessage {
            chat_id: "123",
            text: "hello",
            parse_mode: "HTML",
            disable_web_page_preview: false,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["chat_id"], "123");
        assert_eq!(json["text"], "hello");
        assert_eq!(json["parse_mode"], "HTML");
        assert_eq!(json["disable_web_page_preview"], false);
    }

    #[tokio::test]
    async fn test_telegram_sender_accepts_ok_response() {
        let base = serve_once("200 OK", "application/json", r#"{"ok":true,"result":{}}"#).await;
        let sender = TelegramSender::with_api_url(&base, "tok", "123", Duration::from_secs(5)).unwrap();

        assert!(sender.send("<b>Hi</b>").await.is_ok());
    }

    #[tokio::test]
    async fn test_telegram_sender_maps_api_error() {
        let base = serve_once(
            "400 Bad Request",
            "application/json",
            r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
        )
        .await;
        let sender = TelegramSender::with_api_url(&base, "tok", "123", Duration::from_secs(5)).unwrap();

        match sender.send("<b>Hi</b>").await {
            Err(DeliveryError::Api { status, body }) => {
                assert_eq!(status, 400);
                assert!(body.contains("chat not found"), "{body}");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
