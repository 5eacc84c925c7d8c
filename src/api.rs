//! Translation backend and paragraph-aware chunked translation.
//!
//! # Architecture
//!
//! - [`Translate`]: async translation capability returning a typed error
//! - [`GoogleTranslator`]: implementation over the public Google Translate endpoint
//! - [`translate_or_original`]: one call, falling back to the source text on any error
//! - [`translate_long_text`]: splits text on blank lines into chunks under a
//!   size limit and translates them one by one
//!
//! A translation failure never fails the run. Each failing call is logged and
//! its input is used verbatim, so one bad chunk leaves the others translated.

use crate::error::TranslationError;
use crate::utils::truncate_for_log;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

const GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Paragraph separator used for splitting and re-joining.
const PARAGRAPH_BREAK: &str = "\n\n";

/// Trait for async text translation.
pub trait Translate {
    /// Translate `text` from the configured source to the target language.
    async fn translate(&self, text: &str) -> Result<String, TranslationError>;
}

/// Google Translate (`client=gtx`) backend.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
    source_lang: String,
    target_lang: String,
}

impl GoogleTranslator {
    pub fn new(
        source_lang: &str,
        target_lang: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Self::with_endpoint(GOOGLE_ENDPOINT, source_lang, target_lang, timeout)
    }

    /// Create a translator that posts to `endpoint` instead of the public
    /// Google URL.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Full `translate_a/single` URL, without query string
    /// * `source_lang` / `target_lang` - Language codes such as `de` and `en`
    /// * `timeout` - Per-request timeout
    ///
    /// # Example
    ///
    /// ```ignore
    /// let translator = GoogleTranslator::with_endpoint(
    ///     "http://127.0.0.1:8080/translate_a/single",
    ///     "de",
    ///     "en",
    ///     Duration::from_secs(30),
    /// )?;
    /// ```
    pub fn with_endpoint(
        endpoint: &str,
        source_lang: &str,
        target_lang: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
        })
    }
}

impl Translate for GoogleTranslator {
    #[instrument(level = "debug", skip_all, fields(chars = text.chars().count()))]
    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        let t0 = Instant::now();
        let url = format!(
            "{}?client=gtx&dt=t&sl={}&tl={}",
            self.endpoint,
            urlencoding::encode(&self.source_lang),
            urlencoding::encode(&self.target_lang)
        );
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(format!("q={}", urlencoding::encode(text)))
            .send()
            .await
            .map_err(|e| TranslationError::Request(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TranslationError::RateLimited);
        }
        if !status.is_success() {
            return Err(TranslationError::Request(format!("HTTP {status}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TranslationError::Unexpected(e.to_string()))?;
        let translated = parse_google_response(&body)?;
        debug!(elapsed_ms = t0.elapsed().as_millis(), "Translated text");
        Ok(translated)
    }
}

/// Join the translated sentence fragments of a `translate_a/single` response.
///
/// The payload looks like `[[["Hello","Hallo",null,null,10], ...], null, "de", ...]`.
fn parse_google_response(body: &Value) -> Result<String, TranslationError> {
    let sentences = match body.get(0) {
        Some(Value::Array(sentences)) => sentences,
        Some(Value::Null) => return Err(TranslationError::NotFound),
        _ => {
            return Err(TranslationError::Unexpected(format!(
                "unrecognised response: {}",
                truncate_for_log(&body.to_string(), 200)
            )));
        }
    };

    let translated: String = sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
        .collect();
    if translated.is_empty() {
        return Err(TranslationError::NotFound);
    }
    Ok(translated)
}

/// Translate `text`, returning it unchanged if the backend fails or returns
/// nothing.
pub async fn translate_or_original<T: Translate>(translator: &T, text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    match translator.translate(text).await {
        Ok(translated) if !translated.is_empty() => translated,
        Ok(_) => text.to_string(),
        Err(TranslationError::NotFound) => {
            warn!(text = %truncate_for_log(text, 80), "Translation not found; using original text");
            text.to_string()
        }
        Err(TranslationError::RateLimited) => {
            warn!("Translation rate-limited; using original text");
            text.to_string()
        }
        Err(e) => {
            warn!(error = %e, "Translation failed; using original text");
            text.to_string()
        }
    }
}

/// Translate text that may exceed the backend's size limit.
///
/// Text of at most `max_chunk_chars` characters goes out in one call. Longer
/// text is split on blank lines and paragraphs are packed greedily into
/// chunks; each chunk is translated on its own and the results are joined
/// with blank lines in the original order. A single paragraph longer than
/// the limit is sent as its own oversized chunk rather than being cut.
///
/// # Arguments
///
/// * `translator` - Backend used for every chunk
/// * `text` - Source text, paragraphs separated by blank lines
/// * `max_chunk_chars` - Upper bound on characters per backend call
///
/// # Returns
///
/// The translated text. Chunks whose translation fails are kept in the
/// source language, so this never fails.
///
/// # Example
///
/// ```ignore
/// let english = translate_long_text(&translator, &german, 4500).await;
/// ```
#[instrument(level = "info", skip(translator, text), fields(chars = text.chars().count()))]
pub async fn translate_long_text<T: Translate>(
    translator: &T,
    text: &str,
    max_chunk_chars: usize,
) -> String {
    if text.is_empty() {
        return String::new();
    }
    if text.chars().count() <= max_chunk_chars {
        return translate_or_original(translator, text).await;
    }

    let chunks = pack_paragraphs(text, max_chunk_chars);
    info!(chunks = chunks.len(), "Translating long text in chunks");

    let mut translated = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        translated.push(translate_or_original(translator, chunk).await);
    }
    translated.join(PARAGRAPH_BREAK)
}

/// Greedily group blank-line separated paragraphs into chunks whose size,
/// separators included, stays within `max_chars` where possible.
fn pack_paragraphs(text: &str, max_chars: usize) -> Vec<String> {
    let separator = PARAGRAPH_BREAK.chars().count();
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_size = 0usize;

    for paragraph in text.split(PARAGRAPH_BREAK) {
        let size = paragraph.chars().count();
        if current_size + size > max_chars && !current.is_empty() {
            chunks.push(current.join(PARAGRAPH_BREAK));
            current.clear();
            current_size = 0;
        }
        current.push(paragraph);
        // Charge a separator for every paragraph, the first after a flush
        // included. This over-counts by one separator per chunk, which keeps
        // the joined chunk within `max_chars`.
        current_size += size + separator;
    }
    if !current.is_empty() {
        chunks.push(current.join(PARAGRAPH_BREAK));
    }
    chunks
}
