//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server
//! starts.
//!
//! ## Variables
//!
//! - `DATABASE_URL` - SQLite database (default: `sqlite://shawty.db`)
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `BEHIND_PROXY` - Trust forwarded-for headers (default: `false`)
//! - `RETENTION_HOURS` - Mapping lifetime before expiry (default: 72)
//! - `CLEANUP_INTERVAL_SECS` - Expiry sweep period (default: 3600)
//! - `RATE_LIMIT_COOLDOWN_SECS` - Per-client shorten cooldown (default: 5)
//! - `RATE_LIMIT_MAX_CLIENTS` - Limiter state cap (default: 10000)
//! - `MNEMONIC_ENABLED` - Enable slug suggestions (default: `false`)
//! - `MNEMONIC_API_URL` / `MNEMONIC_API_KEY` - Summarization service
//!   (required when enabled)
//! - `MNEMONIC_TIMEOUT_SECS` - Budget per external call (default: 5)
//! - `DB_MAX_CONNECTIONS` - Connection pool size (default: 5)

use anyhow::Result;
use std::env;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// When true, rate limiting reads client IP from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,
    /// How long a mapping lives before the cleanup sweep may remove it.
    pub retention_hours: u64,
    /// Period between cleanup sweeps.
    pub cleanup_interval_secs: u64,
    /// Cooldown window granted per client on the shorten path.
    pub rate_limit_cooldown_secs: u64,
    /// Upper bound on distinct clients tracked by the limiter.
    pub rate_limit_max_clients: usize,
    /// Whether to ask the external summarization service for mnemonic slugs.
    pub mnemonic_enabled: bool,
    pub mnemonic_api_url: Option<String>,
    pub mnemonic_api_key: Option<String>,
    /// Budget for each external mnemonic call (page fetch and slug request).
    pub mnemonic_timeout_secs: u64,
    pub db_max_connections: u32,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://shawty.db".to_string());

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let retention_hours = env::var("RETENTION_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(72);

        let cleanup_interval_secs = env::var("CLEANUP_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        let rate_limit_cooldown_secs = env::var("RATE_LIMIT_COOLDOWN_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let rate_limit_max_clients = env::var("RATE_LIMIT_MAX_CLIENTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000);

        let mnemonic_enabled = env::var("MNEMONIC_ENABLED")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let mnemonic_api_url = env::var("MNEMONIC_API_URL").ok().filter(|v| !v.is_empty());
        let mnemonic_api_key = env::var("MNEMONIC_API_KEY").ok().filter(|v| !v.is_empty());

        let mnemonic_timeout_secs = env::var("MNEMONIC_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            database_url,
            listen_addr,
            log_level,
            log_format,
            behind_proxy,
            retention_hours,
            cleanup_interval_secs,
            rate_limit_cooldown_secs,
            rate_limit_max_clients,
            mnemonic_enabled,
            mnemonic_api_url,
            mnemonic_api_key,
            mnemonic_timeout_secs,
            db_max_connections,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any window or interval is zero, the listen
    /// address or database URL is malformed, or mnemonic generation is
    /// enabled without its service credentials.
    pub fn validate(&self) -> Result<()> {
        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if self.retention_hours == 0 {
            anyhow::bail!("RETENTION_HOURS must be greater than 0");
        }

        if self.cleanup_interval_secs == 0 {
            anyhow::bail!("CLEANUP_INTERVAL_SECS must be greater than 0");
        }

        if self.rate_limit_cooldown_secs == 0 {
            anyhow::bail!("RATE_LIMIT_COOLDOWN_SECS must be greater than 0");
        }

        if self.rate_limit_max_clients < 100 {
            anyhow::bail!(
                "RATE_LIMIT_MAX_CLIENTS must be at least 100, got {}",
                self.rate_limit_max_clients
            );
        }

        if self.mnemonic_enabled {
            if self.mnemonic_api_url.is_none() {
                anyhow::bail!("MNEMONIC_API_URL must be set when MNEMONIC_ENABLED is true");
            }
            if self.mnemonic_api_key.is_none() {
                anyhow::bail!("MNEMONIC_API_KEY must be set when MNEMONIC_ENABLED is true");
            }
        }

        if self.mnemonic_timeout_secs == 0 {
            anyhow::bail!("MNEMONIC_TIMEOUT_SECS must be greater than 0");
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }

        Ok(())
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Database: {}", self.database_url);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Retention: {}h", self.retention_hours);
        tracing::info!("  Cleanup interval: {}s", self.cleanup_interval_secs);
        tracing::info!("  Rate limit cooldown: {}s", self.rate_limit_cooldown_secs);

        if self.mnemonic_enabled {
            tracing::info!(
                "  Mnemonic generation: enabled ({})",
                self.mnemonic_api_url.as_deref().unwrap_or("unset")
            );
        } else {
            tracing::info!("  Mnemonic generation: disabled");
        }
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn base_config() -> Config {
        Config {
            database_url: "sqlite://test.db".to_string(),
            listen_addr: "0.0.0.0:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            behind_proxy: false,
            retention_hours: 72,
            cleanup_interval_secs: 3600,
            rate_limit_cooldown_secs: 5,
            rate_limit_max_clients: 10_000,
            mnemonic_enabled: false,
            mnemonic_api_url: None,
            mnemonic_api_key: None,
            mnemonic_timeout_secs: 5,
            db_max_connections: 5,
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = base_config();
        assert!(config.validate().is_ok());

        config.database_url = "postgres://localhost/test".to_string();
        assert!(config.validate().is_err());
        config.database_url = "sqlite://test.db".to_string();

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "3000".to_string();
        assert!(config.validate().is_err());
        config.listen_addr = "0.0.0.0:3000".to_string();

        config.retention_hours = 0;
        assert!(config.validate().is_err());
        config.retention_hours = 72;

        config.rate_limit_cooldown_secs = 0;
        assert!(config.validate().is_err());
        config.rate_limit_cooldown_secs = 5;

        config.rate_limit_max_clients = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mnemonic_requires_credentials() {
        let mut config = base_config();
        config.mnemonic_enabled = true;
        assert!(config.validate().is_err());

        config.mnemonic_api_url = Some("https://summarizer.example/slug".to_string());
        assert!(config.validate().is_err());

        config.mnemonic_api_key = Some("key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::remove_var("DATABASE_URL");
            env::remove_var("RETENTION_HOURS");
            env::remove_var("RATE_LIMIT_COOLDOWN_SECS");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, "sqlite://shawty.db");
        assert_eq!(config.retention_hours, 72);
        assert_eq!(config.rate_limit_cooldown_secs, 5);
        assert_eq!(config.cleanup_interval_secs, 3600);
        assert!(!config.mnemonic_enabled);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("DATABASE_URL", "sqlite:///tmp/custom.db");
            env::set_var("RETENTION_HOURS", "24");
            env::set_var("RATE_LIMIT_COOLDOWN_SECS", "10");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, "sqlite:///tmp/custom.db");
        assert_eq!(config.retention_hours, 24);
        assert_eq!(config.rate_limit_cooldown_secs, 10);

        // Cleanup
        unsafe {
            env::remove_var("DATABASE_URL");
            env::remove_var("RETENTION_HOURS");
            env::remove_var("RATE_LIMIT_COOLDOWN_SECS");
        }
    }
}
