//! HTTP transport for the Zabbix JSON-RPC endpoint.
//!
//! DESIGN
//! ======
//! One POST per call, no retries, no interpretation of the response
//! beyond JSON decoding. The [`Transport`] trait is the seam every
//! namespace wrapper dispatches through, so tests swap in a recording
//! double instead of a live server.

use std::fmt;
use std::time::Duration;

use serde_json::Value;

use super::config::ZabbixConfig;
use super::types::{Params, RpcRequest, ZabbixError};

// =============================================================================
// TRANSPORT TRAIT
// =============================================================================

/// Sends one JSON-RPC call and returns the decoded response body.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Dispatch `method` with `params`.
    ///
    /// When `skip_auth` is set the stored credential is not attached.
    ///
    /// # Errors
    ///
    /// Returns a [`ZabbixError`] if the method name is empty, the request
    /// fails or times out, or the body is not JSON. Remote error payloads
    /// are returned as `Ok`.
    async fn send(&self, method: &str, params: Params, skip_auth: bool) -> Result<Value, ZabbixError>;
}

// =============================================================================
// CREDENTIAL
// =============================================================================

/// Value sent as the bearer credential.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum Credential {
    /// Nothing is attached; only unauthenticated calls succeed.
    #[default]
    None,
    /// A long-lived API token.
    Token(String),
    /// A session id obtained from `user.login`.
    Session(String),
}

impl Credential {
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Token(value) | Self::Session(value) => Some(value),
        }
    }

    #[must_use]
    pub fn is_session(&self) -> bool {
        matches!(self, Self::Session(_))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Token(_) => f.write_str("Token(<redacted>)"),
            Self::Session(_) => f.write_str("Session(<redacted>)"),
        }
    }
}

// =============================================================================
// HTTP TRANSPORT
// =============================================================================

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub url: String,
    pub credential: Credential,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub verify_tls: bool,
}

impl TransportConfig {
    #[must_use]
    pub fn from_config(config: &ZabbixConfig, credential: Credential) -> Self {
        Self {
            url: config.url.clone(),
            credential,
            timeout: config.timeouts.request(),
            connect_timeout: config.timeouts.connect(),
            verify_tls: config.verify_tls,
        }
    }
}

pub struct HttpTransport {
    http: reqwest::Client,
    url: String,
    credential: Credential,
    timeout: Duration,
    connect_timeout: Duration,
}

impl HttpTransport {
    /// Build the transport and its connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ZabbixError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: TransportConfig) -> Result<Self, ZabbixError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| ZabbixError::HttpClientBuild(e.to_string()))?;
        if !config.verify_tls {
            tracing::warn!(url = %config.url, "TLS certificate verification disabled");
        }
        Ok(Self {
            http,
            url: config.url,
            credential: config.credential,
            timeout: config.timeout,
            connect_timeout: config.connect_timeout,
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    fn request_error(&self, err: &reqwest::Error) -> ZabbixError {
        if err.is_timeout() {
            self.timeout_error(err.is_connect())
        } else {
            ZabbixError::Request(err.to_string())
        }
    }

    /// Timeout error naming the limit that elapsed.
    fn timeout_error(&self, connecting: bool) -> ZabbixError {
        let limit = if connecting { self.connect_timeout } else { self.timeout };
        ZabbixError::Timeout { secs: limit.as_secs_f64() }
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("url", &self.url)
            .field("credential", &self.credential)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, method: &str, params: Params, skip_auth: bool) -> Result<Value, ZabbixError> {
        if method.is_empty() {
            return Err(ZabbixError::EmptyMethod);
        }

        tracing::debug!(%method, skip_auth, "zabbix request");
        let body = RpcRequest::new(method, &params);
        let mut request = self.http.post(&self.url).json(&body);
        if !skip_auth {
            if let Some(token) = self.credential.bearer() {
                request = request.bearer_auth(token);
            }
        }

        let response = request.send().await.map_err(|e| {
            let err = self.request_error(&e);
            tracing::warn!(%method, error = %err, "zabbix request failed");
            err
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.request_error(&e))?;

        if !status.is_success() {
            tracing::warn!(%method, status = status.as_u16(), "zabbix returned non-success status");
            return Err(ZabbixError::HttpStatus { status: status.as_u16(), body: text });
        }

        parse_body(&text)
    }
}

fn parse_body(text: &str) -> Result<Value, ZabbixError> {
    serde_json::from_str(text).map_err(|e| ZabbixError::ApiParse(e.to_string()))
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
