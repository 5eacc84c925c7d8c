//! Data models passed through the monitoring pipeline.
//!
//! - [`NewsEntry`]: one announcement extracted from the news page
//! - [`LastSeenRecord`]: the persisted form of the most recently notified entry
//! - [`MessageChunk`]: one transport-sized piece of a notification

use serde::{Deserialize, Serialize};

/// A single news item scraped from the page.
///
/// `title` and `snippet` are plain text. `link` is an absolute URL or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsEntry {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

impl NewsEntry {
    /// An entry is worth keeping only if it carries some text.
    pub fn has_content(&self) -> bool {
        !self.title.is_empty() || !self.snippet.is_empty()
    }
}

/// The last entry a notification was produced for.
///
/// Every field may be absent in the state file; absent fields compare as
/// empty strings during change detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LastSeenRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl LastSeenRecord {
    /// True when nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.snippet.is_none() && self.link.is_none()
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn snippet(&self) -> &str {
        self.snippet.as_deref().unwrap_or_default()
    }
}

impl From<&NewsEntry> for LastSeenRecord {
    fn from(entry: &NewsEntry) -> Self {
        Self {
            title: Some(entry.title.clone()),
            snippet: Some(entry.snippet.clone()),
            link: Some(entry.link.clone()),
        }
    }
}

/// One message as handed to the transport, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageChunk {
    pub text: String,
}
