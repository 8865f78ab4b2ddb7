//! Wire protocol for the daemon's stdio channel
//!
//! The daemon speaks newline-delimited JSON over stdin/stdout:
//! - Shell -> daemon: `{"id": 1, "method": "get_config", "params": null}`
//! - Daemon -> shell: `{"id": 1, "result": {...}}` or `{"id": 1, "error": "..."}`
//! - Daemon -> shell (unsolicited): `{"event": "status", "payload": {...}}`
//!
//! One JSON value per line, no framing headers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A request from the shell to the daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// A response from the daemon, correlated by request id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// An unsolicited event frame from the daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventFrame {
    pub event: String,
    #[serde(default)]
    pub payload: Value,
}

/// Anything the daemon may write on stdout
///
/// Responses carry an `id`, events carry an `event` key. Untagged
/// deserialization tries responses first so an event payload that happens
/// to contain an `id` field cannot shadow a response.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Incoming {
    Response(Response),
    Event(EventFrame),
}

/// Payload of `status` and `progress` events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplashPayload {
    pub status: String,
    #[serde(default)]
    pub progress: Option<String>,
    #[serde(default)]
    pub is_downloading: bool,
    #[serde(default)]
    pub can_skip: bool,
}

/// Payload of `log` events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogPayload {
    pub line: String,
}

impl Request {
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }

    /// Encode as a single protocol line, newline included
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// Decode one line read from the daemon's stdout
pub fn decode_line(line: &str) -> Result<Incoming, serde_json::Error> {
    serde_json::from_str(line.trim())
}
