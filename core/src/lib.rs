//! # pongterm-core
//!
//! Headless protocol core of the pongterm client. Nothing in this crate
//! touches the terminal.
//!
//! # Architecture
//!
//! ```text
//! transport (HttpApi / WsSocket) ──► serde_json::Value
//!                                        │
//!                                   decode engine ◄── records / messages
//!                                        │
//!                                  typed records ──► session (pongterm-tui)
//!
//! requests ──► outbound JSON text ──► transport
//! ```
//!
//! # Modules
//!
//! - [`decode`]: descriptor tables, `record!`, choice/switch, release, pretty-print
//! - [`records`]: REST payloads
//! - [`messages`]: socket payloads and the `type` switch
//! - [`requests`]: outbound bodies and endpoints
//! - [`transport`]: `Api`/`Socket` traits and their network adapters
//! - [`config`]: TOML + environment + CLI configuration

pub mod config;
pub mod decode;
pub mod messages;
pub mod records;
pub mod requests;
pub mod transport;

pub use config::{ClientConfig, ConfigError, ConfigOverrides};
pub use decode::{Decoded, DecodeError, Record, Release};
pub use messages::ServerMessage;
pub use transport::{Api, ApiError, Inbound, Method, Socket, SocketError};
