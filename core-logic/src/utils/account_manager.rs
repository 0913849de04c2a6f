use crate::error::ConfigError;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// An opaque portal session token.
///
/// Never printed in full: `Debug` is redacted and [`SessionToken::short`] is
/// what goes into logs when nothing better is known about the account.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionToken(String);

impl SessionToken {
    const SHORT_LEN: usize = 10;

    /// Returns `None` for blank input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First ten characters followed by `...`.
    pub fn short(&self) -> String {
        let head: String = self.0.chars().take(Self::SHORT_LEN).collect();
        format!("{}...", head)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken")
            .field(&"***REDACTED***")
            .finish()
    }
}

pub struct AccountManager;

impl AccountManager {
    /// Reads one session token per line, skipping blank lines.
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<SessionToken>, ConfigError> {
        let path = path.as_ref();
        let mut content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                path: path.display().to_string(),
                msg: e.to_string(),
            },
        })?;

        let tokens: Vec<SessionToken> = content.lines().filter_map(SessionToken::new).collect();
        content.zeroize();

        info!("Loaded {} accounts from {}", tokens.len(), path.display());
        Ok(tokens)
    }
}
