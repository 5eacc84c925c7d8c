//! News page fetching and entry extraction.
//!
//! The page is fetched once per run and handed to an ordered list of
//! extraction strategies. The first strategy that yields any entry wins:
//!
//! | Strategy | Module | Page layout |
//! |----------|--------|-------------|
//! | accordion | [`accordion`] | `ul.collapsible` list under an "Ice News" heading, sorted by header date |
//! | articles | [`articles`] | flat `<article>` / teaser containers, document order |
//!
//! An empty result is not an error. It usually means the page layout changed,
//! so it is logged as a warning and the run ends without touching any state.

pub mod accordion;
pub mod articles;

use crate::error::{MonitorError, Result};
use crate::models::NewsEntry;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const USER_AGENT: &str = concat!("ice_news_monitor/", env!("CARGO_PKG_VERSION"));

/// Source of raw page markup.
pub trait FetchPage {
    /// GET `url` and return the body. Network failures and non-2xx statuses
    /// are errors.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// [`FetchPage`] over a `reqwest` client with a request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl FetchPage for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched news page");
        Ok(body)
    }
}

/// An extraction strategy: parsed page and base URL in, entries out.
type Strategy = fn(&Html, &str) -> Vec<NewsEntry>;

/// Strategies in priority order.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("accordion", accordion::extract_entries),
    ("articles", articles::extract_entries),
];

/// Fetch the news page and extract its entries, newest first.
#[instrument(level = "info", skip(fetcher))]
pub async fn fetch_news<F: FetchPage>(fetcher: &F, url: &str) -> Result<Vec<NewsEntry>> {
    info!("Fetching news");
    let html = fetcher.fetch(url).await?;
    Ok(extract_entries(&html, url))
}

/// Run the strategies over `html` and return the first non-empty result.
pub fn extract_entries(html: &str, base_url: &str) -> Vec<NewsEntry> {
    let document = Html::parse_document(html);

    for (name, strategy) in STRATEGIES {
        let entries = strategy(&document, base_url);
        if !entries.is_empty() {
            info!(strategy = name, count = entries.len(), "Extracted news entries");
            return entries;
        }
        debug!(strategy = name, "Strategy found no entries");
    }

    warn!("No news items found; the page structure may have changed");
    Vec::new()
}
