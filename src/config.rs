use std::time::Duration;

use serde::Deserialize;

/// Database used when none is configured.
pub const DEFAULT_DATABASE: &str = "doc_catalog";

/// Service configuration, injected at startup.
///
/// Sources, lowest to highest precedence:
/// - built-in defaults
/// - `CATALOG_*` environment variables (`CATALOG_MONGODB_URI`,
///   `CATALOG_DATABASE`, `CATALOG_BIND_ADDR`, `CATALOG_CONNECT_TIMEOUT_SECS`)
/// - `MONGODB_URI`
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub mongodb_uri: String,
    pub database: String,
    pub bind_addr: String,
    /// Connection-establishment timeout for the MongoDB client.
    pub connect_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::load(
            config::Environment::with_prefix("CATALOG"),
            std::env::var("MONGODB_URI").ok(),
        )
    }

    /// Build configuration from an explicit environment source.
    pub fn load(
        env: config::Environment,
        mongodb_uri: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("mongodb_uri", "mongodb://localhost:27017")?
            .set_default("database", DEFAULT_DATABASE)?
            .set_default("bind_addr", "127.0.0.1:3000")?
            .set_default("connect_timeout_secs", 10)?
            .add_source(env.try_parsing(true))
            .set_override_option("mongodb_uri", mongodb_uri)?
            .build()?
            .try_deserialize()
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
