use crate::tasks::DelayRange;
use anyhow::{Context, Result};
use config::{Config, File};
use core_logic::{parse_level, ConfigError, DispatchMode};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.magicnewton.com";

/// One year. Longer schedules are treated as configuration mistakes.
pub const MAX_INTERVAL_HOURS: u64 = 24 * 365;

#[derive(Debug, Deserialize, Clone)]
pub struct NewtonConfig {
    pub logging: LoggingConfig,
    pub accounts: AccountsConfig,
    pub proxy: ProxySettings,
    pub concurrent: ConcurrencyConfig,
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub portal: PortalConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AccountsConfig {
    pub accounts_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProxySettings {
    pub enabled: bool,
    #[serde(default = "default_proxy_file")]
    pub proxy_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConcurrencyConfig {
    pub enabled: bool,
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExecutionConfig {
    pub interval_hours: u64,
    pub roll_interval: RollInterval,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

/// Bounds, in seconds, of the pause between two rolls.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct RollInterval {
    pub min_seconds: f64,
    pub max_seconds: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PortalConfig {
    pub base_url: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

fn default_proxy_file() -> String {
    "proxies.txt".to_string()
}

fn default_max_workers() -> usize {
    5
}

fn default_request_timeout() -> u64 {
    30
}

impl NewtonConfig {
    /// Loads and validates the config file. The format follows the extension
    /// (`config.json`, `config.toml`, ...).
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path))
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        let config: NewtonConfig = settings
            .try_deserialize()
            .with_context(|| format!("Malformed config in {}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_level(&self.logging.level)?;

        if self.accounts.accounts_file.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "accounts.accounts_file".to_string(),
            });
        }
        if self.proxy.enabled && self.proxy.proxy_file.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "proxy.proxy_file".to_string(),
            });
        }
        if self.concurrent.enabled && self.concurrent.max_workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "concurrent.max_workers".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if !(1..=MAX_INTERVAL_HOURS).contains(&self.execution.interval_hours) {
            return Err(ConfigError::InvalidValue {
                field: "execution.interval_hours".to_string(),
                reason: format!("must be between 1 and {}", MAX_INTERVAL_HOURS),
            });
        }

        let RollInterval {
            min_seconds,
            max_seconds,
        } = self.execution.roll_interval;
        if !(min_seconds >= 0.0 && min_seconds <= max_seconds && max_seconds.is_finite()) {
            return Err(ConfigError::InvalidValue {
                field: "execution.roll_interval".to_string(),
                reason: format!(
                    "expected 0 <= min_seconds <= max_seconds, got {}..{}",
                    min_seconds, max_seconds
                ),
            });
        }

        if self.portal.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "portal.base_url".to_string(),
            });
        }
        Ok(())
    }

    pub fn dispatch_mode(&self) -> DispatchMode {
        DispatchMode::from_flags(self.concurrent.enabled, self.concurrent.max_workers)
    }

    pub fn roll_delay(&self) -> DelayRange {
        DelayRange::new(
            self.execution.roll_interval.min_seconds,
            self.execution.roll_interval.max_seconds,
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.execution.request_timeout_seconds.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    const SAMPLE: &str = r#"{
        "logging": { "level": "INFO", "file": "newton.log" },
        "accounts": { "accounts_file": "accounts.txt" },
        "proxy": { "enabled": false, "proxy_file": "proxies.txt" },
        "concurrent": { "enabled": true, "max_workers": 3 },
        "execution": {
            "interval_hours": 24,
            "roll_interval": { "min_seconds": 5, "max_seconds": 10 }
        }
    }"#;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_json_with_defaults() {
        let file = write_config(SAMPLE);
        let config = NewtonConfig::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.portal.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.execution.request_timeout_seconds, 30);
        assert_eq!(config.execution.roll_interval.min_seconds, 5.0);
        assert_eq!(
            config.dispatch_mode(),
            DispatchMode::Concurrent { max_workers: 3 }
        );
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(NewtonConfig::load("/definitely/not/here/config.json").is_err());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let file = write_config("{ \"logging\": ");
        assert!(NewtonConfig::load(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_inverted_roll_interval_rejected() {
        let body = SAMPLE.replace("\"max_seconds\": 10", "\"max_seconds\": 1");
        let file = write_config(&body);
        let err = NewtonConfig::load(file.path().to_str().unwrap()).unwrap_err();
        assert!(format!("{:#}", err).contains("execution.roll_interval"));
    }

    #[test]
    fn test_zero_interval_hours_rejected() {
        let body = SAMPLE.replace("\"interval_hours\": 24", "\"interval_hours\": 0");
        let file = write_config(&body);
        assert!(NewtonConfig::load(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_interval_hours_upper_bound() {
        let body = SAMPLE.replace("\"interval_hours\": 24", "\"interval_hours\": 3000000000");
        let file = write_config(&body);
        let err = NewtonConfig::load(file.path().to_str().unwrap()).unwrap_err();
        assert!(format!("{:#}", err).contains("execution.interval_hours"));

        let body = SAMPLE.replace("\"interval_hours\": 24", "\"interval_hours\": 8760");
        let file = write_config(&body);
        assert!(NewtonConfig::load(file.path().to_str().unwrap()).is_ok());
    }
}
