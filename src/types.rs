//! Wire types: JSON-RPC envelope, parameter bags, and errors.
//!
//! DESIGN
//! ======
//! The transport boundary stays untyped: a request carries a free-form
//! [`Params`] map and the response comes back as the decoded
//! `serde_json::Value`, error payloads included. [`into_result`] and
//! [`result_as`] are opt-in helpers for callers that want the remote
//! `error` object turned into a [`ZabbixError`] or the `result` decoded
//! into their own structs.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Protocol version tag carried by every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Correlation id placed on every request. Zabbix echoes it back; it is
/// not unique per call.
pub const REQUEST_ID: u64 = 1;

/// Parameter bag forwarded verbatim as the request `params` object.
pub type Params = Map<String, Value>;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by the client, transport, and config layers.
#[derive(Debug, thiserror::Error)]
pub enum ZabbixError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// A required configuration environment variable is not set.
    #[error("missing config: env var {var} not set")]
    MissingConfig { var: String },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// A request was dispatched without a method name.
    #[error("remote method name must not be empty")]
    EmptyMethod,

    /// The HTTP request could not be sent or its body could not be read.
    #[error("API request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("API request timed out after {secs:.1}s")]
    Timeout { secs: f64 },

    /// The server answered with a non-success HTTP status.
    #[error("API response error: status {status}")]
    HttpStatus { status: u16, body: String },

    /// The response body was not valid JSON or had an unexpected shape.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The server returned a JSON-RPC error object.
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String, data: Option<Value> },

    /// No namespace with this name exists in the catalog.
    #[error("unknown API namespace: {0}")]
    UnknownNamespace(String),

    /// The namespace exists but does not offer this action.
    #[error("namespace {namespace} has no action {action}")]
    UnsupportedAction { namespace: String, action: String },

    /// A parameter bag cannot be shaped for the requested action.
    #[error("invalid params for {method}: {reason}")]
    InvalidParams { method: String, reason: String },

    /// An id-bound operation was dispatched on a namespace without an id field.
    #[error("namespace {namespace} has no id field")]
    MissingIdField { namespace: String },
}

impl ZabbixError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingConfig { .. } => "E_MISSING_CONFIG",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::EmptyMethod => "E_EMPTY_METHOD",
            Self::Request(_) => "E_API_REQUEST",
            Self::Timeout { .. } => "E_API_TIMEOUT",
            Self::HttpStatus { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::Api { .. } => "E_API_ERROR",
            Self::UnknownNamespace(_) => "E_UNKNOWN_NAMESPACE",
            Self::UnsupportedAction { .. } => "E_UNSUPPORTED_ACTION",
            Self::InvalidParams { .. } => "E_INVALID_PARAMS",
            Self::MissingIdField { .. } => "E_MISSING_ID_FIELD",
        }
    }
}

// =============================================================================
// IDS
// =============================================================================

/// One or more object ids, normalized to a list of strings.
///
/// Zabbix ids are numeric strings on the wire, so numeric inputs are
/// rendered with `to_string`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ids(Vec<String>);

impl Ids {
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read ids from a JSON string, number, or array of either.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => items.iter().map(id_string).collect::<Option<Vec<_>>>().map(Self),
            other => id_string(other).map(|id| Self(vec![id])),
        }
    }

    /// JSON array form used in the `"<id>s"` parameter.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Array(self.0.iter().cloned().map(Value::String).collect())
    }
}

/// A single id as its wire string.
pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

impl From<&str> for Ids {
    fn from(id: &str) -> Self {
        Self(vec![id.to_owned()])
    }
}

impl From<String> for Ids {
    fn from(id: String) -> Self {
        Self(vec![id])
    }
}

impl From<&String> for Ids {
    fn from(id: &String) -> Self {
        Self(vec![id.clone()])
    }
}

impl From<u64> for Ids {
    fn from(id: u64) -> Self {
        Self(vec![id.to_string()])
    }
}

impl From<Vec<String>> for Ids {
    fn from(ids: Vec<String>) -> Self {
        Self(ids)
    }
}

impl From<Vec<&str>> for Ids {
    fn from(ids: Vec<&str>) -> Self {
        Self(ids.into_iter().map(str::to_owned).collect())
    }
}

impl From<&[&str]> for Ids {
    fn from(ids: &[&str]) -> Self {
        Self(ids.iter().map(|id| (*id).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Ids {
    fn from(ids: [&str; N]) -> Self {
        Self(ids.iter().map(|id| (*id).to_owned()).collect())
    }
}

impl From<Vec<u64>> for Ids {
    fn from(ids: Vec<u64>) -> Self {
        Self(ids.into_iter().map(|id| id.to_string()).collect())
    }
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// Outgoing JSON-RPC request body.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: &'a Params,
    pub id: u64,
}

impl<'a> RpcRequest<'a> {
    #[must_use]
    pub fn new(method: &'a str, params: &'a Params) -> Self {
        Self { jsonrpc: JSONRPC_VERSION, method, params, id: REQUEST_ID }
    }
}

/// Error object inside a JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Incoming JSON-RPC response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcError>,
    #[serde(default)]
    pub id: Option<Value>,
}

impl RpcResponse {
    /// Split the envelope into its result or its error.
    ///
    /// # Errors
    ///
    /// Returns [`ZabbixError::Api`] when the envelope carries an error
    /// object, or [`ZabbixError::ApiParse`] when it carries neither.
    pub fn into_result(self) -> Result<Value, ZabbixError> {
        if let Some(err) = self.error {
            return Err(ZabbixError::Api { code: err.code, message: err.message, data: err.data });
        }
        self.result
            .ok_or_else(|| ZabbixError::ApiParse("response has neither result nor error".into()))
    }
}

/// Interpret a raw response value as a JSON-RPC envelope and return its result.
///
/// # Errors
///
/// Returns [`ZabbixError::ApiParse`] if the value is not an envelope and
/// [`ZabbixError::Api`] if the server reported an error.
pub fn into_result(response: Value) -> Result<Value, ZabbixError> {
    let envelope: RpcResponse =
        serde_json::from_value(response).map_err(|e| ZabbixError::ApiParse(e.to_string()))?;
    envelope.into_result()
}

/// Decode the `result` of a raw response into `T`.
///
/// # Errors
///
/// Same as [`into_result`], plus [`ZabbixError::ApiParse`] if the result
/// does not match `T`.
pub fn result_as<T: DeserializeOwned>(response: Value) -> Result<T, ZabbixError> {
    let result = into_result(response)?;
    serde_json::from_value(result).map_err(|e| ZabbixError::ApiParse(e.to_string()))
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
