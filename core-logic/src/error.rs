//! Error types shared by the bots.
//!
//! [`ConfigError`] covers the config file and the flat account/proxy files;
//! [`NetworkError`] covers one HTTP exchange with the portal.

use thiserror::Error;

/// Configuration and flat-file errors
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Missing required configuration field: '{field}'")]
    MissingField { field: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error reading {path}: {msg}")]
    IoError { path: String, msg: String },

    #[error("Not enough proxies: {proxies} proxies for {accounts} accounts")]
    InsufficientProxies { proxies: usize, accounts: usize },
}

/// Transport and protocol errors talking to a remote HTTP endpoint
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("Request timeout to {endpoint}")]
    Timeout { endpoint: String },

    #[error("Connection refused to {endpoint}: {reason}")]
    ConnectionRefused { endpoint: String, reason: String },

    #[error("Proxy failure for {endpoint}: {reason}")]
    Proxy { endpoint: String, reason: String },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    #[error("Request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_proxies_message() {
        let err = ConfigError::InsufficientProxies {
            proxies: 1,
            accounts: 3,
        };
        assert_eq!(
            err.to_string(),
            "Not enough proxies: 1 proxies for 3 accounts"
        );
    }

    #[test]
    fn test_network_error_names_endpoint() {
        let err = NetworkError::Proxy {
            endpoint: "/portal/api/userQuests".to_string(),
            reason: "tunnel refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Proxy failure for /portal/api/userQuests: tunnel refused"
        );
    }
}
