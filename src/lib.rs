//! Async client for the Zabbix JSON-RPC API.
//!
//! DESIGN
//! ======
//! Two layers. [`transport`] owns the endpoint, credential, timeout, and
//! TLS settings and performs one POST per call. [`resources`] wraps every
//! API namespace (`host`, `trigger`, `user`, ...) in a typed handle whose
//! methods build `"<namespace>.<action>"` and forward the caller's
//! parameter bag unchanged. Responses come back as decoded JSON, remote
//! error payloads included; [`into_result`] is there for callers that want
//! them as errors.
//!
//! ```ignore
//! use zabbix_api::{ZabbixClient, params};
//!
//! let client = ZabbixClient::from_env(Some("prod"))?;
//! let hosts = client.host().get(params!({ "output": ["hostid", "name"] })).await?;
//! ```

pub mod client;
pub mod config;
pub mod namespace;
pub mod resources;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use client::{CredentialKind, ZabbixClient};
pub use config::{Timeouts, ZabbixConfig};
pub use namespace::{Namespace, NamespaceSpec, OpKind};
pub use resources::{CATALOG, lookup};
pub use transport::{Credential, HttpTransport, Transport, TransportConfig};
pub use types::{Ids, Params, RpcError, RpcRequest, RpcResponse, ZabbixError, into_result, result_as};

#[doc(hidden)]
pub use serde_json as __serde_json;

/// Build a [`Params`] bag from JSON object syntax.
///
/// ```ignore
/// let bag = params!({ "hostid": "10105", "output": "extend" });
/// let empty = params!();
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::new()
    };
    ({ $($body:tt)* }) => {
        match $crate::__serde_json::json!({ $($body)* }) {
            $crate::__serde_json::Value::Object(map) => map,
            _ => $crate::Params::new(),
        }
    };
}
