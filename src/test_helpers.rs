//! Transport doubles shared by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::{Value, json};

use crate::transport::Transport;
use crate::types::{Params, ZabbixError};

/// One call observed by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct Sent {
    pub method: String,
    pub params: Params,
    pub skip_auth: bool,
}

/// Records every call and answers from a queue of canned responses.
///
/// When the queue is empty it answers `{"jsonrpc": "2.0", "result": [], "id": 1}`.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    responses: Mutex<VecDeque<Value>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: Vec<Value>) -> Self {
        Self { sent: Mutex::default(), responses: Mutex::new(responses.into()) }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Sent {
        self.sent.lock().unwrap().last().cloned().expect("no call recorded")
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, method: &str, params: Params, skip_auth: bool) -> Result<Value, ZabbixError> {
        self.sent.lock().unwrap().push(Sent { method: method.to_owned(), params, skip_auth });
        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| json!({ "jsonrpc": "2.0", "result": [], "id": 1 })))
    }
}

/// Fails every call with a timeout and counts the attempts.
#[derive(Default)]
pub struct TimeoutTransport {
    attempts: Mutex<u32>,
}

impl TimeoutTransport {
    pub fn attempts(&self) -> u32 {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Transport for TimeoutTransport {
    async fn send(&self, _method: &str, _params: Params, _skip_auth: bool) -> Result<Value, ZabbixError> {
        *self.attempts.lock().unwrap() += 1;
        Err(ZabbixError::Timeout { secs: 30.0 })
    }
}
