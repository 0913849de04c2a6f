use crate::config::ProxyConfig;
use crate::error::ConfigError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

pub struct ProxyManager;

impl ProxyManager {
    /// Loads proxies from `path`, one per line, preserving file order so that
    /// line *i* stays paired with account *i*.
    ///
    /// Every non-blank line is an entry. Lines are never dropped for their
    /// content, otherwise every later account would shift onto the wrong
    /// proxy; an unusable entry fails only its own account's session setup.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Vec<ProxyConfig>, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                path: path.display().to_string(),
                msg: e.to_string(),
            },
        })?;

        let proxies: Vec<ProxyConfig> = content
            .lines()
            .filter_map(ProxyConfig::parse_line)
            .collect();

        let with_auth = proxies.iter().filter(|p| p.has_auth()).count();
        info!(
            "Loaded {} proxies ({} with credentials) from {}",
            proxies.len(),
            with_auth,
            path.display()
        );
        Ok(proxies)
    }

    /// Proxy-mode precondition: every account needs its own index-aligned proxy.
    pub fn ensure_coverage(proxies: &[ProxyConfig], accounts: usize) -> Result<(), ConfigError> {
        if proxies.len() < accounts {
            return Err(ConfigError::InsufficientProxies {
                proxies: proxies.len(),
                accounts,
            });
        }
        Ok(())
    }
}
