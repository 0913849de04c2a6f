use core_logic::{ConfigError, DispatchMode, ProxyConfig};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_uri_kept_verbatim() {
        let proxy = ProxyConfig::parse_line("socks5://user:pw@10.1.1.1:1080").unwrap();
        assert_eq!(proxy.url, "socks5://user:pw@10.1.1.1:1080");
        assert!(!proxy.has_auth());
    }

    #[test]
    fn test_proxy_host_port_normalised() {
        let proxy = ProxyConfig::parse_line("  10.1.1.1:3128 ").unwrap();
        assert_eq!(proxy.url, "http://10.1.1.1:3128");
        assert_eq!(proxy.username, None);
    }

    #[test]
    fn test_proxy_compact_credentials() {
        let proxy = ProxyConfig::parse_line("proxy.example:8000:alice:s3cret").unwrap();
        assert_eq!(proxy.url, "http://proxy.example:8000");
        assert_eq!(proxy.username.as_deref(), Some("alice"));
        assert_eq!(proxy.password.as_deref(), Some("s3cret"));
        assert!(proxy.has_auth());
    }

    #[test]
    fn test_proxy_unrecognised_passed_through() {
        assert!(ProxyConfig::parse_line("").is_none());
        for raw in ["just-a-host", "host:notaport", "host:80:user", "u:p@h:3128"] {
            let proxy = ProxyConfig::parse_line(raw).unwrap();
            assert_eq!(proxy.url, raw);
            assert!(!proxy.has_auth());
        }
    }

    #[test]
    fn test_dispatch_mode_from_flags() {
        assert_eq!(DispatchMode::from_flags(false, 8), DispatchMode::Sequential);
        assert_eq!(
            DispatchMode::from_flags(true, 8),
            DispatchMode::Concurrent { max_workers: 8 }
        );
        assert_eq!(
            DispatchMode::from_flags(true, 0),
            DispatchMode::Concurrent { max_workers: 1 }
        );
    }

    #[test]
    fn test_coverage_error_message() {
        let err = ConfigError::InsufficientProxies {
            proxies: 2,
            accounts: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains('2'));
        assert!(msg.contains('3'));
    }
}
