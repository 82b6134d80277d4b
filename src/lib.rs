//! Normalization of chat server replies.
//!
//! Replies arrive in whatever shape the backend produced. [`extractors`]
//! reduces them to a [`NormalizedMessage`] holding the text and the server's
//! timestamp string, and [`timestamp`] turns instants into display strings.
//! The two compose only at the call site.

pub mod config;
pub mod extractors;
pub mod timestamp;

pub use config::{Config, ConfigError, DisplayConfig, DisplayTimezone};
pub use extractors::{NormalizedMessage, extract_text_and_timestamp};
pub use timestamp::{TimestampFormatter, format_timestamp};
