//! pongterm TUI - Terminal client for the pong service
//!
//! Full-screen client: sign in, browse tournaments and friends, accept
//! match invites and play live in the terminal.
//!
//! # Architecture
//!
//! - **Surface**: retained-mode windows of labels, text fields, boxes and
//!   buttons, painted incrementally with crossterm
//! - **Focus**: directional navigation scored from component geometry
//! - **Game**: arena renderer drawing server snapshots through a ratatui
//!   buffer diff
//! - **App**: the event loop and the session state machine over the
//!   `pongterm-core` transports

pub mod app;
pub mod game;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod screens;
pub mod session;
pub mod surface;
pub mod terminal;
pub mod theme;

pub use app::App;
