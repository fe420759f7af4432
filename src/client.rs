//! Client facade: owns the transport and hands out namespace wrappers.
//!
//! SESSION LIFECYCLE
//! =================
//! Token clients need no teardown. Clients built by [`ZabbixClient::login`]
//! hold a session id that stays valid on the server until `user.logout`;
//! [`ZabbixClient::close`] ends it and consumes the client.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::config::ZabbixConfig;
use super::namespace::Namespace;
use super::resources;
use super::transport::{Credential, HttpTransport, Transport, TransportConfig};
use super::types::{self, Params, ZabbixError};

#[derive(Clone)]
pub struct ZabbixClient {
    transport: Arc<dyn Transport>,
    credential: CredentialKind,
}

/// Which kind of credential the client was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    None,
    Token,
    Session,
}

impl From<&Credential> for CredentialKind {
    fn from(credential: &Credential) -> Self {
        match credential {
            Credential::None => Self::None,
            Credential::Token(_) => Self::Token,
            Credential::Session(_) => Self::Session,
        }
    }
}

impl fmt::Debug for ZabbixClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZabbixClient")
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}

impl ZabbixClient {
    /// Build a client that authenticates with the config's API token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ZabbixConfig) -> Result<Self, ZabbixError> {
        let credential = config
            .api_token
            .clone()
            .map_or(Credential::None, Credential::Token);
        Self::with_credential(config, credential)
    }

    /// Build a client with an explicit token, ignoring the config's token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_token(config: &ZabbixConfig, token: impl Into<String>) -> Result<Self, ZabbixError> {
        Self::with_credential(config, Credential::Token(token.into()))
    }

    /// Build a client from environment variables. See [`ZabbixConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if the config is incomplete or the HTTP client fails.
    pub fn from_env(environment: Option<&str>) -> Result<Self, ZabbixError> {
        let config = ZabbixConfig::from_env(environment)?;
        Self::new(&config)
    }

    /// Build a client over an HTTP transport carrying `credential`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_credential(config: &ZabbixConfig, credential: Credential) -> Result<Self, ZabbixError> {
        let kind = CredentialKind::from(&credential);
        let transport = HttpTransport::new(TransportConfig::from_config(config, credential))?;
        tracing::debug!(url = %config.url, environment = %config.environment, credential = ?kind, "zabbix client ready");
        Ok(Self { transport: Arc::new(transport), credential: kind })
    }

    /// Wrap an existing transport, e.g. a test double.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>, credential: CredentialKind) -> Self {
        Self { transport, credential }
    }

    /// Log in with a username and password and return a session client.
    ///
    /// # Errors
    ///
    /// Returns [`ZabbixError::Api`] when the server rejects the login, or a
    /// transport error.
    pub async fn login(config: &ZabbixConfig, username: &str, password: &str) -> Result<Self, ZabbixError> {
        let anonymous = Self::with_credential(config, Credential::None)?;
        let session = anonymous.request_session(username, password).await?;
        tracing::info!(%username, environment = %config.environment, "zabbix session opened");
        Self::with_credential(config, Credential::Session(session))
    }

    /// Call `user.login` on this client's transport and return the session id.
    ///
    /// # Errors
    ///
    /// Returns [`ZabbixError::Api`] when the server rejects the login, or
    /// [`ZabbixError::ApiParse`] when the result is not a string.
    pub async fn request_session(&self, username: &str, password: &str) -> Result<String, ZabbixError> {
        let mut params = Params::new();
        params.insert("username".to_owned(), Value::String(username.to_owned()));
        params.insert("password".to_owned(), Value::String(password.to_owned()));

        let response = self.user().login(params).await?;
        match types::into_result(response) {
            Ok(Value::String(session)) => Ok(session),
            Ok(other) => Err(ZabbixError::ApiParse(format!("user.login returned non-string result: {other}"))),
            Err(e) => {
                tracing::warn!(%username, error = %e, "zabbix login rejected");
                Err(e)
            }
        }
    }

    /// End the client's session.
    ///
    /// Session clients call `user.logout` once; token clients return
    /// without any request.
    ///
    /// # Errors
    ///
    /// Returns the transport error or the remote logout error.
    pub async fn close(self) -> Result<(), ZabbixError> {
        if self.credential != CredentialKind::Session {
            return Ok(());
        }
        let response = self.user().logout(Params::new()).await?;
        types::into_result(response)?;
        tracing::info!("zabbix session closed");
        Ok(())
    }

    #[must_use]
    pub fn credential_kind(&self) -> CredentialKind {
        self.credential
    }

    #[must_use]
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Look up a namespace by remote name (`hostgroup`) or accessor name
    /// (`host_group`).
    ///
    /// # Errors
    ///
    /// Returns [`ZabbixError::UnknownNamespace`] if no namespace matches.
    pub fn namespace(&self, name: &str) -> Result<Namespace<'_>, ZabbixError> {
        let spec = resources::lookup(name).ok_or_else(|| ZabbixError::UnknownNamespace(name.to_owned()))?;
        Ok(Namespace::new(self.transport(), *spec))
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
