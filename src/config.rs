use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Forum thread scraped when `FORUM_TOPIC_URL` is not set.
pub const DEFAULT_TOPIC_URL: &str = "https://scratch.mit.edu/discuss/topic/838820/";
/// Base URL of the text-generation API when `CLASSIFIER_BASE_URL` is not set.
pub const DEFAULT_CLASSIFIER_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai";
/// Model used when `CLASSIFIER_MODEL` is not set.
pub const DEFAULT_CLASSIFIER_MODEL: &str = "gemini-2.5-preview";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Web Server
    pub web_host: String,
    pub web_port: u16,

    // Forum
    pub topic_url: String,
    pub http_timeout: Duration,

    // Classifier
    /// Credential for the classifier API. `None` runs the classifier in
    /// degraded mode where every order is reported as uncompleted.
    pub classifier_api_key: Option<String>,
    pub classifier_base_url: String,
    pub classifier_model: String,
    pub classify_concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("PORT", 3000)?,

            // Forum
            topic_url: env_or_default("FORUM_TOPIC_URL", DEFAULT_TOPIC_URL),
            http_timeout: Duration::from_secs(parse_env_u64("HTTP_TIMEOUT_SECS", 30)?),

            // Classifier
            classifier_api_key: optional_env("GEMINI_API_KEY"),
            classifier_base_url: env_or_default(
                "CLASSIFIER_BASE_URL",
                DEFAULT_CLASSIFIER_BASE_URL,
            ),
            classifier_model: env_or_default("CLASSIFIER_MODEL", DEFAULT_CLASSIFIER_MODEL),
            classify_concurrency: parse_env_usize("CLASSIFY_CONCURRENCY", 1)?,
        })
    }

    /// Configuration with defaults and no classifier credential, for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
            topic_url: DEFAULT_TOPIC_URL.to_string(),
            http_timeout: Duration::from_secs(10),
            classifier_api_key: None,
            classifier_base_url: DEFAULT_CLASSIFIER_BASE_URL.to_string(),
            classifier_model: DEFAULT_CLASSIFIER_MODEL.to_string(),
            classify_concurrency: 1,
        }
    }

    /// Whether a classifier credential is configured.
    #[must_use]
    pub fn classifier_enabled(&self) -> bool {
        self.classifier_api_key.is_some()
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url("FORUM_TOPIC_URL", &self.topic_url)?;
        validate_url("CLASSIFIER_BASE_URL", &self.classifier_base_url)?;
        if self.classifier_model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "CLASSIFIER_MODEL".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.http_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "HTTP_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.classify_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                name: "CLASSIFY_CONCURRENCY".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn validate_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        name: name.to_string(),
        message: format!("'{value}' is not a valid URL: {e}"),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("unsupported scheme '{other}'"),
        }),
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}
