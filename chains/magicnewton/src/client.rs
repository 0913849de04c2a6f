//! Thin reqwest wrapper carrying the portal's fixed browser headers and the
//! account's session cookie.

use anyhow::{Context, Result};
use core_logic::{NetworkError, ProxyConfig, SessionToken};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, COOKIE, ORIGIN, REFERER, USER_AGENT,
};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;

pub const SESSION_PATH: &str = "/portal/api/auth/session";
pub const USER_QUESTS_PATH: &str = "/portal/api/userQuests";

const AUTHORITY: &str = "www.magicnewton.com";
const PORTAL_ORIGIN: &str = "https://www.magicnewton.com";
const PORTAL_REFERER: &str = "https://www.magicnewton.com/portal/rewards";
const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36";
const SESSION_COOKIE: &str = "__Secure-next-auth.session-token";

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone)]
pub struct PortalResponse {
    pub status: u16,
    pub body: String,
}

impl PortalResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn json(&self, endpoint: &str) -> Result<Value, NetworkError> {
        serde_json::from_str(&self.body).map_err(|e| NetworkError::InvalidResponse {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}

pub struct PortalClient {
    http: Client,
    base_url: String,
    proxied: bool,
}

impl PortalClient {
    pub fn new(
        base_url: &str,
        token: &SessionToken,
        proxy: Option<&ProxyConfig>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut client_builder = Client::builder()
            .default_headers(portal_headers(token)?)
            .timeout(timeout);

        if let Some(proxy_conf) = proxy {
            let mut upstream = reqwest::Proxy::all(&proxy_conf.url)
                .with_context(|| format!("Invalid proxy URL {}", proxy_conf.url))?;
            if let (Some(u), Some(p)) = (&proxy_conf.username, &proxy_conf.password) {
                upstream = upstream.basic_auth(u, p);
            }
            client_builder = client_builder.proxy(upstream);
        }

        let http = client_builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            proxied: proxy.is_some(),
        })
    }

    pub fn is_proxied(&self) -> bool {
        self.proxied
    }

    pub async fn get(&self, path: &str) -> Result<PortalResponse, NetworkError> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<PortalResponse, NetworkError> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Sends one request. Any status code is a response; only transport
    /// failures become errors.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<PortalResponse, NetworkError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, &url);
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| self.classify(path, e))?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| self.classify(path, e))?;

        Ok(PortalResponse { status, body })
    }

    fn classify(&self, endpoint: &str, e: reqwest::Error) -> NetworkError {
        let endpoint = endpoint.to_string();
        if e.is_timeout() {
            NetworkError::Timeout { endpoint }
        } else if e.is_connect() && self.proxied {
            NetworkError::Proxy {
                endpoint,
                reason: e.to_string(),
            }
        } else if e.is_connect() {
            NetworkError::ConnectionRefused {
                endpoint,
                reason: e.to_string(),
            }
        } else if e.is_decode() {
            NetworkError::InvalidResponse {
                endpoint,
                reason: e.to_string(),
            }
        } else {
            NetworkError::Transport {
                endpoint,
                reason: e.to_string(),
            }
        }
    }
}

fn portal_headers(token: &SessionToken) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("authority"),
        HeaderValue::from_static(AUTHORITY),
    );
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ORIGIN, HeaderValue::from_static(PORTAL_ORIGIN));
    headers.insert(REFERER, HeaderValue::from_static(PORTAL_REFERER));
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));

    let mut cookie = HeaderValue::from_str(&format!("{}={}", SESSION_COOKIE, token.expose()))
        .context("Session token contains characters not allowed in a cookie")?;
    cookie.set_sensitive(true);
    headers.insert(COOKIE, cookie);

    Ok(headers)
}
