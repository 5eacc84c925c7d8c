//! Last-seen state file.
//!
//! The file holds a single pretty-printed JSON object:
//!
//! ```json
//! {
//!   "title": "Ice News 22.02.2026",
//!   "snippet": "Hallo Leute, ...",
//!   "link": "https://www.alpine-adventure.at/..."
//! }
//! ```
//!
//! A missing or unreadable file means "nothing seen yet". Writes go to a
//! sibling temp file that is then renamed over the target, so a reader never
//! observes a half-written record.

use crate::error::Result;
use crate::models::{LastSeenRecord, NewsEntry};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument, warn};

/// Load the last-seen record, treating absence or corruption as empty.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_last_seen(path: &Path) -> LastSeenRecord {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No last-seen file yet");
            return LastSeenRecord::default();
        }
        Err(e) => {
            warn!(error = %e, "Could not read last-seen file");
            return LastSeenRecord::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(record) => record,
        Err(e) => {
            warn!(error = %e, "Could not parse last-seen file");
            LastSeenRecord::default()
        }
    }
}

/// Persist `entry` as the new last-seen record, replacing the old file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn save_last_seen(path: &Path, entry: &NewsEntry) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string_pretty(&LastSeenRecord::from(entry))?;
    let tmp = temp_path(path);
    fs::write(&tmp, json).await?;
    fs::rename(&tmp, path).await?;

    info!("Saved last-seen item");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("last_seen.json"));
    name.push(".tmp");
    path.with_file_name(name)
}
