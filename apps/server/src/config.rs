//! Application configuration.
//!
//! Credentials come from the environment (optionally via `.env`); runtime
//! knobs come from the command line and are applied on top in `main`.

use smartmoney_core::RetentionPolicy;
use std::time::Duration;
use thiserror::Error;

pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const ENV_BIRDEYE_API_KEY: &str = "BIRDEYE_API_KEY";
pub const ENV_HELIUS_API_KEY: &str = "HELIUS_API_KEY";
pub const ENV_BIRDEYE_BASE_URL: &str = "BIRDEYE_BASE_URL";
pub const ENV_HELIUS_BASE_URL: &str = "HELIUS_BASE_URL";
pub const ARG_TOKEN_TTL_SECS: &str = "--token-ttl-secs";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is missing or empty")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Webhook server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Port the webhook server listens on.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: 5000 }
    }
}

/// How long scans are kept for overlap analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionSettings {
    /// Maximum tracked tokens (None = unbounded).
    pub max_tokens: Option<usize>,
    /// Scan lifetime in seconds (None = process lifetime).
    pub ttl_secs: Option<u64>,
}

impl RetentionSettings {
    /// A zero lifetime would hide every scan as soon as it is recorded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.ttl_secs {
            Some(0) => Err(ConfigError::Invalid {
                name: ARG_TOKEN_TTL_SECS,
                value: "0".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl From<&RetentionSettings> for RetentionPolicy {
    fn from(settings: &RetentionSettings) -> Self {
        let mut policy = RetentionPolicy::unbounded();
        if let Some(max) = settings.max_tokens {
            policy = policy.with_max_tokens(max);
        }
        if let Some(secs) = settings.ttl_secs {
            policy = policy.with_ttl(Duration::from_secs(secs));
        }
        policy
    }
}

/// Application configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub telegram_token: String,
    pub birdeye_api_key: String,
    pub helius_api_key: String,
    /// Chat that receives wallet alerts. The webhook server is only started
    /// when this is set.
    pub alert_chat_id: Option<i64>,
    pub birdeye_base_url: Option<String>,
    pub helius_base_url: Option<String>,
    pub server: ServerSettings,
    pub retention: RetentionSettings,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("telegram_token", &"<redacted>")
            .field("birdeye_api_key", &"<redacted>")
            .field("helius_api_key", &"<redacted>")
            .field("alert_chat_id", &self.alert_chat_id)
            .field("birdeye_base_url", &self.birdeye_base_url)
            .field("helius_base_url", &self.helius_base_url)
            .field("server", &self.server)
            .field("retention", &self.retention)
            .finish()
    }
}

impl AppConfig {
    /// Load credentials from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load credentials through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &'static str| optional(key).ok_or(ConfigError::Missing(key));

        let telegram_token = required(ENV_TELEGRAM_TOKEN)?;
        let birdeye_api_key = required(ENV_BIRDEYE_API_KEY)?;
        let helius_api_key = required(ENV_HELIUS_API_KEY)?;

        let alert_chat_id = match optional(ENV_TELEGRAM_CHAT_ID) {
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| ConfigError::Invalid {
                name: ENV_TELEGRAM_CHAT_ID,
                value: raw.clone(),
            })?),
            None => None,
        };

        Ok(Self {
            telegram_token,
            birdeye_api_key,
            helius_api_key,
            alert_chat_id,
            birdeye_base_url: optional(ENV_BIRDEYE_BASE_URL),
            helius_base_url: optional(ENV_HELIUS_BASE_URL),
            server: ServerSettings::default(),
            retention: RetentionSettings::default(),
        })
    }

    pub fn retention_policy(&self) -> RetentionPolicy {
        (&self.retention).into()
    }
}
