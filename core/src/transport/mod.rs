//! Transport Layer
//!
//! Adapters between the session and the network:
//!
//! - [`HttpApi`]: request/response calls over `reqwest`
//! - [`WsSocket`]: the persistent socket over `tokio-tungstenite`
//!
//! The session is generic over the [`Api`] and [`Socket`] traits, so tests
//! drive it with in-memory doubles.

mod http;
mod traits;
mod websocket;

pub use http::HttpApi;
pub use traits::{Api, ApiError, Inbound, Method, Socket, SocketError};
pub use websocket::WsSocket;
