//! Generic dispatch for one API namespace.
//!
//! Every remote method is `"<namespace>.<action>"`. A [`Namespace`] binds
//! a [`NamespaceSpec`] to a transport and forwards parameter bags
//! unchanged, apart from the id-field shaping done by `call_with_id` and
//! `delete`. Each catalogued action records its [`OpKind`], so dispatch by
//! name through [`Namespace::invoke`] shapes a bag exactly as the typed
//! wrapper for that action would.

use serde_json::Value;

use super::transport::Transport;
use super::types::{self, Ids, Params, ZabbixError};

/// How an action shapes its parameters before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Forward the bag unchanged.
    Pass,
    /// Carry the object's id under the namespace's id field.
    ById,
    /// Send only the ids, as a list under the plural id key.
    Delete,
}

/// Static description of one API namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceSpec {
    /// Remote prefix, e.g. `"host"` or `"hostgroup"`.
    pub namespace: &'static str,
    /// Singular id key, e.g. `"hostid"`. Delete sends its plural form.
    pub id_field: Option<&'static str>,
    /// Remote actions offered by this namespace, with their shapes.
    pub actions: &'static [(&'static str, OpKind)],
    /// Actions that must be sent without the credential.
    pub unauthenticated: &'static [&'static str],
}

impl NamespaceSpec {
    #[must_use]
    pub fn method(&self, action: &str) -> String {
        format!("{}.{}", self.namespace, action)
    }

    #[must_use]
    pub fn kind(&self, action: &str) -> Option<OpKind> {
        self.actions
            .iter()
            .find(|(name, _)| *name == action)
            .map(|(_, kind)| *kind)
    }

    #[must_use]
    pub fn supports(&self, action: &str) -> bool {
        self.kind(action).is_some()
    }

    #[must_use]
    pub fn skips_auth(&self, action: &str) -> bool {
        self.unauthenticated.contains(&action)
    }

    /// Parameter key used by `delete`, e.g. `"hostids"`.
    #[must_use]
    pub fn ids_key(&self) -> Option<String> {
        self.id_field.map(|field| format!("{field}s"))
    }
}

/// A namespace bound to a transport.
#[derive(Clone, Copy)]
pub struct Namespace<'a> {
    transport: &'a dyn Transport,
    spec: NamespaceSpec,
}

impl<'a> Namespace<'a> {
    #[must_use]
    pub fn new(transport: &'a dyn Transport, spec: NamespaceSpec) -> Self {
        Self { transport, spec }
    }

    #[must_use]
    pub fn spec(&self) -> &NamespaceSpec {
        &self.spec
    }

    /// Dispatch any catalogued action by name.
    ///
    /// Id-bound actions accept the id under the id field or as `"id"`.
    /// Delete accepts the ids under the plural key, the id field, `"ids"`,
    /// or `"id"`, as one id or a list, and sends the plural-key list.
    ///
    /// # Errors
    ///
    /// Returns [`ZabbixError::UnsupportedAction`] for actions the namespace
    /// does not offer, [`ZabbixError::InvalidParams`] when a delete bag has
    /// no usable ids, otherwise whatever the transport returns.
    pub async fn invoke(&self, action: &str, params: Params) -> Result<Value, ZabbixError> {
        let Some(kind) = self.spec.kind(action) else {
            return Err(ZabbixError::UnsupportedAction {
                namespace: self.spec.namespace.to_owned(),
                action: action.to_owned(),
            });
        };
        match kind {
            OpKind::Pass => self.call(action, params).await,
            OpKind::ById => {
                let params = self.with_id_field(params)?;
                self.call(action, params).await
            }
            OpKind::Delete => {
                let ids = self.take_ids(action, params)?;
                self.delete(action, ids).await
            }
        }
    }

    /// Forward `params` unchanged to `"<namespace>.<action>"`.
    ///
    /// # Errors
    ///
    /// Propagates the transport error unchanged.
    pub async fn call(&self, action: &str, params: Params) -> Result<Value, ZabbixError> {
        let method = self.spec.method(action);
        self.transport
            .send(&method, params, self.spec.skips_auth(action))
            .await
    }

    /// Insert `"<id_field>": id` into `params`, then forward.
    ///
    /// # Errors
    ///
    /// Returns [`ZabbixError::MissingIdField`] if the namespace has no id
    /// field, otherwise propagates the transport error.
    pub async fn call_with_id(&self, action: &str, id: &str, mut params: Params) -> Result<Value, ZabbixError> {
        let field = self.id_field()?;
        params.insert(field.to_owned(), Value::String(id.to_owned()));
        self.call(action, params).await
    }

    /// Send `{"<id_field>s": [ids...]}`.
    ///
    /// # Errors
    ///
    /// Returns [`ZabbixError::MissingIdField`] if the namespace has no id
    /// field, otherwise propagates the transport error.
    pub async fn delete(&self, action: &str, ids: Ids) -> Result<Value, ZabbixError> {
        let key = self.spec.ids_key().ok_or_else(|| self.missing_id_field())?;
        let mut params = Params::new();
        params.insert(key, ids.to_value());
        self.call(action, params).await
    }

    /// Move a generic `"id"` entry under the namespace's id field.
    fn with_id_field(&self, mut params: Params) -> Result<Params, ZabbixError> {
        let field = self.id_field()?;
        if !params.contains_key(field) {
            if let Some(id) = params.remove("id") {
                let id = types::id_string(&id).map_or(id, Value::String);
                params.insert(field.to_owned(), id);
            }
        }
        Ok(params)
    }

    /// Pull the ids out of a delete bag; nothing else may ride along.
    fn take_ids(&self, action: &str, mut params: Params) -> Result<Ids, ZabbixError> {
        let field = self.id_field()?;
        let plural = format!("{field}s");
        let invalid = |reason: String| ZabbixError::InvalidParams { method: self.spec.method(action), reason };

        let Some(raw) = [plural.as_str(), field, "ids", "id"]
            .into_iter()
            .find_map(|key| params.remove(key))
        else {
            return Err(invalid(format!("expected ids under `{plural}`, `{field}`, `ids`, or `id`")));
        };
        if let Some(extra) = params.keys().next() {
            return Err(invalid(format!("unexpected key `{extra}` alongside the ids")));
        }
        Ids::from_value(&raw).ok_or_else(|| invalid(format!("ids must be an id or a list of ids, got {raw}")))
    }

    fn id_field(&self) -> Result<&'static str, ZabbixError> {
        self.spec.id_field.ok_or_else(|| self.missing_id_field())
    }

    fn missing_id_field(&self) -> ZabbixError {
        ZabbixError::MissingIdField { namespace: self.spec.namespace.to_owned() }
    }
}

#[cfg(test)]
#[path = "namespace_test.rs"]
mod tests;
