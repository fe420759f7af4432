//! Zabbix connection configuration parsed from environment variables.
//!
//! An environment selector (`dev`, `prod`, ...) picks a variable prefix,
//! so several servers can be configured side by side:
//! `ZABBIX_DEV_URL`, `ZABBIX_PROD_URL`, and so on.

use std::fmt;
use std::time::Duration;

use super::types::ZabbixError;

pub const DEFAULT_ENVIRONMENT: &str = "dev";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const API_SCRIPT: &str = "api_jsonrpc.php";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ZabbixConfig {
    pub environment: String,
    pub url: String,
    pub api_token: Option<String>,
    pub timeouts: Timeouts,
    pub verify_tls: bool,
}

impl fmt::Debug for ZabbixConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZabbixConfig")
            .field("environment", &self.environment)
            .field("url", &self.url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("timeouts", &self.timeouts)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

impl ZabbixConfig {
    /// Config for `url` with default timeouts, TLS verification on, and no token.
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_owned(),
            url: normalize_url(url),
            api_token: None,
            timeouts: Timeouts::default(),
            verify_tls: true,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Build typed config from environment variables.
    ///
    /// The environment is `environment`, else `ZABBIX_ENV`, else `dev`.
    /// With prefix `ZABBIX_<ENV>_`:
    ///
    /// Required:
    /// - `<prefix>URL` (falls back to `ZABBIX_URL`)
    ///
    /// Optional:
    /// - `<prefix>API_TOKEN` (falls back to `ZABBIX_API_TOKEN`)
    /// - `<prefix>TIMEOUT_SECS`: default 30
    /// - `<prefix>CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// Unparseable or zero timeouts fall back to their defaults.
    /// - `<prefix>VERIFY_TLS`: default true
    ///
    /// # Errors
    ///
    /// Returns [`ZabbixError::MissingConfig`] when no URL is set and
    /// [`ZabbixError::ConfigParse`] for an unreadable TLS flag.
    pub fn from_env(environment: Option<&str>) -> Result<Self, ZabbixError> {
        let environment = environment
            .map(str::to_owned)
            .or_else(|| std::env::var("ZABBIX_ENV").ok())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_owned());
        let prefix = env_prefix(&environment);

        let url_var = format!("{prefix}URL");
        let url = std::env::var(&url_var)
            .or_else(|_| std::env::var("ZABBIX_URL"))
            .map_err(|_| ZabbixError::MissingConfig { var: url_var.clone() })?;

        let api_token = std::env::var(format!("{prefix}API_TOKEN"))
            .or_else(|_| std::env::var("ZABBIX_API_TOKEN"))
            .ok()
            .filter(|t| !t.is_empty());

        let timeouts = Timeouts {
            request_secs: env_parse_u64(&format!("{prefix}TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64(&format!("{prefix}CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let verify_tls = parse_bool(std::env::var(format!("{prefix}VERIFY_TLS")).ok().as_deref(), true)?;

        Ok(Self { environment, url: normalize_url(&url), api_token, timeouts, verify_tls })
    }
}

fn env_prefix(environment: &str) -> String {
    let tag: String = environment
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    format!("ZABBIX_{tag}_")
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

fn parse_bool(raw: Option<&str>, default: bool) -> Result<bool, ZabbixError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ZabbixError::ConfigParse(format!("invalid boolean value '{other}'"))),
    }
}

/// Point a server URL at the JSON-RPC endpoint script.
///
/// URLs that already name a `.php` script are kept as-is.
#[must_use]
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.ends_with(".php") {
        trimmed.to_owned()
    } else {
        format!("{trimmed}/{API_SCRIPT}")
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
