//! Application configuration with layered loading.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: Hardcoded in struct `Default` implementations
//! 2. **Config file**: TOML file specified by `LOGPOLL_CONFIG` env var
//! 3. **Environment variables**: `LOGPOLL__*` env vars override specific fields
//!
//! # Configuration Sections
//!
//! - [`EndpointConfig`]: node URL, chain dialect and connection kind
//! - [`SubscriptionConfig`]: contract addresses and event topics to watch
//! - [`PollingConfig`]: poll interval and event channel sizing
//! - [`LoggingConfig`]: Log level and format
//!
//! # Example
//!
//! ```toml
//! [endpoint]
//! url = "http://127.0.0.1:12537"
//! chain = "conflux"
//! connection = "rpc"
//!
//! [subscription]
//! addresses = ["0x8a6e0b0a4b7e1f7c3b46a1c4f0c39d5ab8d7c7f1"]
//! topics = ["0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"]
//!
//! [polling]
//! interval_ms = 2000
//! ```

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

use crate::{chain::ChainKind, connector::ConnectionKind};

pub use config::ConfigError;

/// Node endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Node URL. `http(s)` for polling, `ws(s)` for push subscriptions.
    pub url: String,

    /// Node dialect. Defaults to `conflux`.
    #[serde(default)]
    pub chain: ChainKind,

    /// Connection kind. Defaults to `rpc`.
    #[serde(default)]
    pub connection: ConnectionKind,

    /// Per-request timeout in seconds. Defaults to `30`.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Filter criteria, as plain strings.
///
/// All topics become alternatives for the first (event signature) position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    #[serde(default)]
    pub addresses: Vec<String>,

    #[serde(default)]
    pub topics: Vec<String>,
}

/// Poll loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Delay between polls in milliseconds. Must be greater than 0. Defaults to `5000`.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Capacity of the event channel. Must be greater than 0. Defaults to `1024`.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

fn default_interval_ms() -> u64 {
    5000
}

fn default_event_buffer() -> usize {
    1024
}

/// Application logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "trace", "debug", "info", "warn", "error"). Defaults to `"info"`.
    pub level: String,

    /// Output format: `"json"` or `"pretty"`. Defaults to `"pretty"`.
    pub format: String,
}

/// Root application configuration.
///
/// Environment overrides use the `LOGPOLL__` prefix with `__` as the nesting separator, e.g.
/// `LOGPOLL__ENDPOINT__URL=http://node:12537`. List values are comma separated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,

    #[serde(default)]
    pub subscription: SubscriptionConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:12537".to_string(),
            chain: ChainKind::default(),
            connection: ConnectionKind::default(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval_ms: default_interval_ms(), event_buffer: default_event_buffer() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file with environment variable overrides.
    ///
    /// A missing file is not an error; defaults and environment variables still apply.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be parsed or deserialized.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_builder = Config::builder()
            .set_default("endpoint.url", "http://127.0.0.1:12537")?
            .set_default("endpoint.chain", "conflux")?
            .set_default("endpoint.connection", "rpc")?
            .set_default("endpoint.timeout_seconds", 30)?
            .set_default("polling.interval_ms", 5000)?
            .set_default("polling.event_buffer", 1024)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name(&config_path.as_ref().to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix("LOGPOLL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("subscription.addresses")
                    .with_list_parse_key("subscription.topics"),
            )
            .build()?;

        config_builder.try_deserialize()
    }

    /// Loads configuration from `config/config.toml`.
    ///
    /// The path can be overridden using the `LOGPOLL_CONFIG` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("LOGPOLL_CONFIG").unwrap_or_else(|_| "config/config.toml".to_string());
        Self::from_file(&config_path)
    }

    /// Returns the poll interval as a [`Duration`].
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.polling.interval_ms)
    }

    /// Returns the per-request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.endpoint.timeout_seconds)
    }

    /// Validates the configuration for correctness and consistency.
    ///
    /// Checks include:
    /// - The endpoint URL scheme matches the connection kind
    /// - Timeouts, intervals and buffer sizes are greater than zero
    /// - Logging format is either `"json"` or `"pretty"`
    ///
    /// # Errors
    ///
    /// Returns a descriptive error string if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        let url = &self.endpoint.url;
        if url.is_empty() {
            return Err("Empty endpoint URL".to_string());
        }

        let scheme_ok = match self.endpoint.connection {
            ConnectionKind::Rpc => url.starts_with("http://") || url.starts_with("https://"),
            ConnectionKind::WebSocket => url.starts_with("ws://") || url.starts_with("wss://"),
        };
        if !scheme_ok {
            return Err(format!(
                "Endpoint URL {url} does not match connection kind {}",
                self.endpoint.connection
            ));
        }

        if self.endpoint.timeout_seconds == 0 {
            return Err("Endpoint timeout must be greater than 0".to_string());
        }

        if self.polling.interval_ms == 0 {
            return Err("Poll interval must be greater than 0".to_string());
        }

        if self.polling.event_buffer == 0 {
            return Err("Event buffer must be greater than 0".to_string());
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err("Logging format must be 'json' or 'pretty'".to_string());
        }

        Ok(())
    }
}
