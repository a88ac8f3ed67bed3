//! Outbound Payloads
//!
//! Request bodies for the HTTP API and messages for the socket. These are
//! built with `serde_json::json!` so user-typed text is always escaped.

use serde_json::json;

/// HTTP endpoints, relative to the API base URL
pub mod endpoints {
    pub const LOGIN: &str = "auth/login";
    pub const REGISTER: &str = "auth/register";
    pub const LOGOUT: &str = "auth/logout";
    pub const TOURNAMENTS: &str = "tournaments";
    pub const FRIENDS: &str = "friends";
}

/// Body for `auth/login`
#[must_use]
pub fn login(email: &str, password: &str, totp: &str) -> String {
    json!({
        "email": email,
        "password": password,
        "totp_password": totp,
    })
    .to_string()
}

/// Body for `auth/register`
#[must_use]
pub fn register(username: &str, email: &str, password: &str, display_name: &str) -> String {
    json!({
        "username": username,
        "email": email,
        "password": password,
        "display_name": display_name,
        "data_consent": true,
    })
    .to_string()
}

/// First message on a fresh socket
#[must_use]
pub fn socket_auth(token: &str) -> String {
    json!({ "type": "auth", "token": token }).to_string()
}

#[must_use]
pub fn invite_accept(invite_id: &str) -> String {
    json!({ "type": "friend_pong_accept", "inviteId": invite_id }).to_string()
}

#[must_use]
pub fn invite_decline(invite_id: &str) -> String {
    json!({ "type": "friend_pong_decline", "inviteId": invite_id }).to_string()
}

#[must_use]
pub fn player_ready(game_id: &str) -> String {
    json!({ "type": "pong_player_ready", "gameId": game_id }).to_string()
}

/// Held paddle direction; sent only when it changes
#[must_use]
pub fn paddle_input(game_id: &str, up: bool, down: bool) -> String {
    json!({
        "type": "simple_pong_input",
        "gameId": game_id,
        "input": { "up": up, "down": down },
    })
    .to_string()
}
