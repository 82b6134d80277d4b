//! Display formatting for chat timestamps.
//!
//! Servers send timestamps as RFC 3339 strings (`2025-12-05T10:00:00Z`); the
//! extractor keeps those untouched. Formatting for humans happens here and
//! only here, at render time, using the configured timezone and strftime
//! pattern.
//!
//! A [`TimestampFormatter`] can only be built from a pattern that passed
//! [`validate_pattern`], so [`TimestampFormatter::format`] never fails.
use crate::config::{ConfigError, DisplayConfig, DisplayTimezone, validate_pattern};
use chrono::{DateTime, Local, TimeZone, Utc};
use std::time::SystemTime;
use tracing::debug;

const FALLBACK_PATTERN: &str = "%Y-%m-%dT%H:%M:%S%:z";

#[derive(Debug, Clone)]
pub struct TimestampFormatter {
    config: DisplayConfig,
}

impl TimestampFormatter {
    pub fn new(config: DisplayConfig) -> Result<Self, ConfigError> {
        validate_pattern(&config.pattern)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Render `instant` in the configured zone with the configured pattern.
    pub fn format<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> String {
        match self.config.timezone {
            DisplayTimezone::Utc => render(&instant.with_timezone(&Utc), &self.config.pattern),
            DisplayTimezone::Local => render(&instant.with_timezone(&Local), &self.config.pattern),
        }
    }

    pub fn format_system_time(&self, instant: SystemTime) -> String {
        self.format(&DateTime::<Utc>::from(instant))
    }

    /// Format a timestamp string as received from a server.
    ///
    /// RFC 3339 input is reformatted for display. Anything else is returned
    /// as-is so the user still sees what the server sent.
    pub fn format_raw(&self, raw: &str) -> String {
        match DateTime::parse_from_rfc3339(raw) {
            Ok(instant) => self.format(&instant),
            Err(err) => {
                debug!(raw, error = %err, "Timestamp is not RFC 3339, displaying verbatim");
                raw.to_string()
            }
        }
    }
}

impl Default for TimestampFormatter {
    fn default() -> Self {
        Self {
            config: DisplayConfig::default(),
        }
    }
}

fn render<Tz>(instant: &DateTime<Tz>, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let out = instant.format(pattern).to_string();

    // Patterns like "%.f" render nothing for whole seconds
    if out.is_empty() {
        return instant.format(FALLBACK_PATTERN).to_string();
    }

    out
}

/// Format an instant with the default display configuration (local time,
/// `YYYY-MM-DD HH:MM:SS`).
pub fn format_timestamp<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    TimestampFormatter::default().format(instant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc_formatter(pattern: &str) -> TimestampFormatter {
        TimestampFormatter::new(DisplayConfig {
            timezone: DisplayTimezone::Utc,
            pattern: pattern.to_string(),
        })
        .expect("valid pattern")
    }

    fn fixed_instant() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-12-05T09:03:07Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn formats_utc_with_default_pattern() {
        let formatter = utc_formatter("%Y-%m-%d %H:%M:%S");
        assert_eq!(formatter.format(&fixed_instant()), "2025-12-05 09:03:07");
    }

    #[test]
    fn converts_offsets_into_display_zone() {
        let formatter = utc_formatter("%Y-%m-%d %H:%M");
        let instant = DateTime::parse_from_rfc3339("2025-12-05T12:30:00+02:00").unwrap();
        assert_eq!(formatter.format(&instant), "2025-12-05 10:30");
    }

    #[test]
    fn default_formatter_is_deterministic_and_non_empty() {
        let instant = fixed_instant();
        let first = format_timestamp(&instant);
        let second = format_timestamp(&instant);

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn local_matches_chrono_local_conversion() {
        let formatter = TimestampFormatter::default();
        let instant = fixed_instant();
        let expected = instant
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        assert_eq!(formatter.format(&instant), expected);
    }

    #[test]
    fn handles_epoch_and_range_limits() {
        let formatter = utc_formatter("%Y-%m-%d %H:%M:%S");

        assert_eq!(
            formatter.format(&DateTime::<Utc>::from_timestamp(0, 0).unwrap()),
            "1970-01-01 00:00:00"
        );
        assert!(!formatter.format(&DateTime::<Utc>::MIN_UTC).is_empty());
        assert!(!formatter.format(&DateTime::<Utc>::MAX_UTC).is_empty());
    }

    #[test]
    fn pre_epoch_with_fixed_offset() {
        let formatter = utc_formatter("%Y-%m-%d %H:%M:%S");
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let instant = offset.with_ymd_and_hms(1900, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(formatter.format(&instant), "1900-01-01 05:00:00");
    }

    #[test]
    fn system_time_epoch() {
        let formatter = utc_formatter("%Y-%m-%d");
        assert_eq!(
            formatter.format_system_time(SystemTime::UNIX_EPOCH),
            "1970-01-01"
        );
    }

    #[test]
    fn empty_render_falls_back() {
        let formatter = utc_formatter("%.f");
        assert_eq!(
            formatter.format(&fixed_instant()),
            "2025-12-05T09:03:07+00:00"
        );
    }

    #[test]
    fn rejects_invalid_pattern() {
        let result = TimestampFormatter::new(DisplayConfig {
            timezone: DisplayTimezone::Utc,
            pattern: "%Q".into(),
        });
        assert!(matches!(result, Err(ConfigError::InvalidPattern(_))));

        let result = TimestampFormatter::new(DisplayConfig {
            timezone: DisplayTimezone::Local,
            pattern: "%#z".into(),
        });
        assert!(matches!(result, Err(ConfigError::InvalidPattern(_))));
    }

    #[test]
    fn exposes_validated_config() {
        let formatter = utc_formatter("%H:%M");
        assert_eq!(formatter.config().timezone, DisplayTimezone::Utc);
        assert_eq!(formatter.config().pattern, "%H:%M");
        assert_eq!(TimestampFormatter::default().config(), &DisplayConfig::default());
    }

    #[test]
    fn format_raw_reformats_rfc3339() {
        let formatter = utc_formatter("%H:%M");
        assert_eq!(formatter.format_raw("2025-12-05T10:00:00Z"), "10:00");
    }

    #[test]
    fn format_raw_keeps_unparseable_input() {
        let formatter = utc_formatter("%H:%M");
        assert_eq!(formatter.format_raw("yesterday-ish"), "yesterday-ish");
        assert_eq!(formatter.format_raw(""), "");
    }
}
