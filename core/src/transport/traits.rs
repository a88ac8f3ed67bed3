//! Transport Traits
//!
//! The session only sees two narrow seams:
//! - [`Api`]: one request in, one parsed JSON tree out
//! - [`Socket`]: the long-lived message stream
//!
//! Both hand back untyped `serde_json::Value` trees; typing them is the
//! decode engine's job.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// HTTP method of an API call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Errors from request/response calls
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be built or completed
    #[error("{method} {endpoint} failed: {message}")]
    Transport {
        method: &'static str,
        endpoint: String,
        message: String,
    },

    /// The body was not valid JSON
    #[error("{endpoint} returned malformed JSON: {source}")]
    MalformedPayload {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body exceeded the configured payload limit
    #[error("{endpoint} returned {size} bytes, limit is {limit}")]
    TooLarge {
        endpoint: String,
        size: usize,
        limit: usize,
    },
}

/// Errors from the persistent socket
#[derive(Debug, Error)]
pub enum SocketError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Socket is not connected")]
    NotConnected,

    #[error("Connection closed by server")]
    Closed,

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    #[error("Socket operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Socket message of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("Socket message is not valid JSON: {0}")]
    MalformedPayload(String),
}

/// One parsed socket message
#[derive(Clone, Debug, PartialEq)]
pub struct Inbound {
    /// Value of the `type` key, empty when absent
    pub kind: String,
    pub tree: Value,
}

impl Inbound {
    /// Wrap a parsed tree, lifting out its `type`
    #[must_use]
    pub fn new(tree: Value) -> Self {
        let kind = tree
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Self { kind, tree }
    }
}

/// Request/response side of the service
#[async_trait]
pub trait Api: Send {
    /// Perform a call and parse the body.
    ///
    /// HTTP status codes are not errors by themselves: the service reports
    /// failures inside the payload.
    async fn request(
        &mut self,
        method: Method,
        endpoint: &str,
        body: Option<String>,
    ) -> Result<Value, ApiError>;

    /// Attach or detach the bearer token sent with every call
    fn set_token(&mut self, token: Option<String>);
}

/// Persistent message stream
#[async_trait]
pub trait Socket: Send {
    /// Open the connection
    async fn connect(&mut self) -> Result<(), SocketError>;

    /// Close the connection; a no-op when already closed
    async fn disconnect(&mut self);

    /// Send one text message
    async fn send(&mut self, text: String) -> Result<(), SocketError>;

    /// Wait for the next message.
    ///
    /// Never resolves while disconnected, so it can sit in a `select!` arm
    /// before login. Must be cancel-safe.
    async fn recv(&mut self) -> Result<Inbound, SocketError>;

    fn is_connected(&self) -> bool;
}
