//! Everything that leaves the process once a new entry is found.
//!
//! # Submodules
//!
//! - [`message`]: translates an entry and renders the HTML notification and
//!   its plain-text preview
//! - [`telegram`]: splits the notification into Telegram-sized parts and
//!   sends them in order
//! - [`json`]: reads and replaces the last-seen state file
//!
//! # Output Structure
//!
//! ```text
//! data/
//! └── last_seen.json   # most recently notified entry
//! ```

pub mod json;
pub mod message;
pub mod telegram;
