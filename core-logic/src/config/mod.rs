/// A single upstream proxy.
///
/// `url` is what gets handed to the HTTP client. Credentials are only split
/// out for the compact `host:port:user:pass` form; every other entry keeps
/// any userinfo inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Parses one line of a proxy file.
    ///
    /// - `host:port` gets an `http://` scheme
    /// - `host:port:user:pass` is split into URL and credentials
    /// - anything else (`scheme://...`, `user:pass@host:port`, ...) is kept
    ///   verbatim and left for the HTTP client to interpret
    ///
    /// Returns `None` only for a blank line.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let verbatim = || ProxyConfig {
            url: line.to_string(),
            username: None,
            password: None,
        };
        if line.contains("://") || line.contains('@') {
            return Some(verbatim());
        }

        let parts: Vec<&str> = line.split(':').map(|s| s.trim()).collect();
        let proxy = match parts.as_slice() {
            [host, port] if !host.is_empty() && port.parse::<u16>().is_ok() => ProxyConfig {
                url: format!("http://{}:{}", host, port),
                username: None,
                password: None,
            },
            [host, port, user, pass] if !host.is_empty() && port.parse::<u16>().is_ok() => {
                ProxyConfig {
                    url: format!("http://{}:{}", host, port),
                    username: Some(user.to_string()),
                    password: Some(pass.to_string()),
                }
            }
            _ => verbatim(),
        };
        Some(proxy)
    }

    pub fn has_auth(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

/// How a batch fans its accounts out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// One account after another on the calling task.
    Sequential,
    /// A bounded pool with at most `max_workers` accounts in flight.
    Concurrent { max_workers: usize },
}

impl DispatchMode {
    pub fn from_flags(concurrent: bool, max_workers: usize) -> Self {
        if concurrent {
            DispatchMode::Concurrent {
                max_workers: max_workers.max(1),
            }
        } else {
            DispatchMode::Sequential
        }
    }
}
