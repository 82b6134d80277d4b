use chrono::{DateTime, Utc};
use chrono::format::{Item, StrftimeItems};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use thiserror::Error;

pub const CONFIG_FILE: &str = "llm-reply.toml";
pub const ENV_PREFIX: &str = "LLM_REPLY_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("display.pattern must not be empty")]
    EmptyPattern,

    #[error("display.pattern {0:?} is not a valid strftime pattern")]
    InvalidPattern(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Which zone instants are converted into before rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayTimezone {
    #[default]
    Local,
    Utc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub timezone: DisplayTimezone,

    #[serde(default = "default_pattern")]
    pub pattern: String,
}

fn default_pattern() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timezone: DisplayTimezone::default(),
            pattern: default_pattern(),
        }
    }
}

/// Load configuration from defaults, `llm-reply.toml` and environment variables
pub fn load() -> Result<Config, ConfigError> {
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(CONFIG_FILE))
        // Use double-underscore nesting for snake_case keys
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(Box::new)?;

    validate(&config)?;
    Ok(config)
}

/// Validate configuration and return a user-friendly error
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_pattern(&config.display.pattern)
}

/// A pattern is accepted only if chrono can render every item in it, which
/// keeps formatting infallible afterwards.
pub fn validate_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::EmptyPattern);
    }

    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::InvalidPattern(pattern.to_string()));
    }

    // Parse-only specifiers such as "%#z" pass the item check but fail to render
    let mut out = String::new();
    if write!(out, "{}", DateTime::<Utc>::default().format(pattern)).is_err() {
        return Err(ConfigError::InvalidPattern(pattern.to_string()));
    }

    Ok(())
}
