//! Socket Messages (server → client)
//!
//! Every socket message is a JSON object with a string `type`. The client
//! resolves it with one string-discriminated decode over [`SERVER_MESSAGES`];
//! the entry order there is the ordinal reported in [`Switched::index`].

use serde_json::Value;

use crate::decode::{decode, decode_switch, DecodeError, Release, SwitchEntry, Switched};
use crate::record;

/// Values of the `type` key
pub mod kinds {
    pub const INVITE: &str = "friend_pong_invite";
    pub const MATCH_START: &str = "friend_pong_start";
    pub const READY_UPDATE: &str = "pong_ready_update";
    pub const GAME_STATE: &str = "friend_pong_state";
    pub const OPPONENT_DISCONNECTED: &str = "opponent_disconnected";
    pub const INVITE_DECLINED: &str = "friend_pong_declined";
    pub const INVITE_EXPIRED: &str = "friend_pong_expired";
    pub const AUTH_SUCCESS: &str = "auth_success";
    pub const AUTH_ERROR: &str = "auth_error";
    pub const ERROR: &str = "error";
}

record! {
    /// A friend wants to play
    pub struct Invite {
        pub invite_id as "inviteId": Str,
        pub from_user_id as "fromUserId": Int,
        pub from_username as "fromUsername": Str,
        /// Unix time in milliseconds
        pub expires_at as "expiresAt": Int,
    }
}

impl Invite {
    /// Whole seconds left before the invite lapses, relative to `now_ms`
    #[must_use]
    pub fn seconds_left(&self, now_ms: i64) -> i64 {
        ((self.expires_at - now_ms) / 1000).max(0)
    }

    /// Expiry as a UTC timestamp, if representable
    #[must_use]
    pub fn expires(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp_millis(self.expires_at)
    }
}

record! {
    /// A match was arranged; both players must confirm readiness
    pub struct MatchStart {
        pub game_id as "gameId": Str,
        /// `"left"` or `"right"`
        pub role: Str,
        pub opponent_id as "opponentId": Int,
    }
}

record! {
    pub struct ReadyUpdate {
        pub game_id as "gameId": Str,
        pub player_id as "playerId": Int,
        pub ready: Bool,
    }
}

record! {
    /// Arena snapshot in logical units (800 × 400)
    pub struct GameState {
        pub ball_x as "ballX": Double,
        pub ball_y as "ballY": Double,
        pub left_paddle_y as "leftPaddleY": Double,
        pub right_paddle_y as "rightPaddleY": Double,
        pub left_score as "leftScore": Int,
        pub right_score as "rightScore": Int,
        pub game_over as "gameOver": Bool,
    }
}

record! {
    pub struct GameFrame {
        pub state: Object<GameState>,
    }
}

record! {
    pub struct DisconnectNotice {
        pub game_id as "gameId": Str,
    }
}

record! {
    /// The pending invite was declined by someone else or lapsed
    pub struct InviteClosed {
        pub invite_id as "inviteId": Str,
    }
}

record! {
    pub struct AuthIdentity {
        pub user_id as "userId": Int,
        pub username: Str,
    }
}

record! {
    pub struct AuthAck {
        pub data: Object<AuthIdentity>,
    }
}

record! {
    pub struct ServerNotice {
        pub message: Str,
    }
}

/// Every socket message the client understands
#[derive(Clone, Debug, PartialEq)]
pub enum ServerMessage {
    Invite(Invite),
    MatchStart(MatchStart),
    ReadyUpdate(ReadyUpdate),
    Frame(GameFrame),
    OpponentDisconnected(DisconnectNotice),
    InviteDeclined(InviteClosed),
    InviteExpired(InviteClosed),
    AuthSuccess(AuthAck),
    AuthError(ServerNotice),
    Error(ServerNotice),
}

impl Release for ServerMessage {
    fn release(&mut self) {
        match self {
            Self::Invite(message) => message.release(),
            Self::MatchStart(message) => message.release(),
            Self::ReadyUpdate(message) => message.release(),
            Self::Frame(message) => message.release(),
            Self::OpponentDisconnected(message) => message.release(),
            Self::InviteDeclined(message) | Self::InviteExpired(message) => message.release(),
            Self::AuthSuccess(message) => message.release(),
            Self::AuthError(message) | Self::Error(message) => message.release(),
        }
    }
}

/// Switch table keyed by `type`
pub static SERVER_MESSAGES: &[SwitchEntry<ServerMessage>] = &[
    SwitchEntry {
        key: kinds::INVITE,
        decode: |tree| decode(tree).map(ServerMessage::Invite),
    },
    SwitchEntry {
        key: kinds::MATCH_START,
        decode: |tree| decode(tree).map(ServerMessage::MatchStart),
    },
    SwitchEntry {
        key: kinds::READY_UPDATE,
        decode: |tree| decode(tree).map(ServerMessage::ReadyUpdate),
    },
    SwitchEntry {
        key: kinds::GAME_STATE,
        decode: |tree| decode(tree).map(ServerMessage::Frame),
    },
    SwitchEntry {
        key: kinds::OPPONENT_DISCONNECTED,
        decode: |tree| decode(tree).map(ServerMessage::OpponentDisconnected),
    },
    SwitchEntry {
        key: kinds::INVITE_DECLINED,
        decode: |tree| decode(tree).map(ServerMessage::InviteDeclined),
    },
    SwitchEntry {
        key: kinds::INVITE_EXPIRED,
        decode: |tree| decode(tree).map(ServerMessage::InviteExpired),
    },
    SwitchEntry {
        key: kinds::AUTH_SUCCESS,
        decode: |tree| decode(tree).map(ServerMessage::AuthSuccess),
    },
    SwitchEntry {
        key: kinds::AUTH_ERROR,
        decode: |tree| decode(tree).map(ServerMessage::AuthError),
    },
    SwitchEntry {
        key: kinds::ERROR,
        decode: |tree| decode(tree).map(ServerMessage::Error),
    },
];

/// Resolve a socket message by its `type`
pub fn decode_server_message(tree: &Value) -> Result<Switched<ServerMessage>, DecodeError> {
    decode_switch(tree, "type", SERVER_MESSAGES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_invite_from_socket() {
        let tree = json!({
            "type": "friend_pong_invite",
            "inviteId": "i1",
            "fromUserId": 5,
            "fromUsername": "bob",
            "expiresAt": 123
        });
        let switched = decode_server_message(&tree).unwrap();
        assert_eq!(switched.index, 0);
        assert_eq!(
            switched.value,
            ServerMessage::Invite(Invite {
                invite_id: "i1".into(),
                from_user_id: 5,
                from_username: "bob".into(),
                expires_at: 123,
            })
        );
    }

    #[test]
    fn test_frame_state_nested() {
        let tree = json!({
            "type": "friend_pong_state",
            "state": {
                "ballX": 400, "ballY": 200.5, "ballVX": 3, "ballVY": -2,
                "leftPaddleY": 160, "rightPaddleY": 40,
                "leftScore": 1, "rightScore": 2, "gameOver": false
            }
        });
        let switched = decode_server_message(&tree).unwrap();
        assert_eq!(switched.index, 3);
        let ServerMessage::Frame(frame) = switched.value else {
            panic!("expected a frame");
        };
        assert_eq!(frame.state.ball_x, 400.0);
        assert_eq!(frame.state.ball_y, 200.5);
        assert_eq!(frame.state.right_score, 2);
    }

    #[test]
    fn test_unknown_type_is_not_matched() {
        let err = decode_server_message(&json!({"type": "chat_message", "text": "hi"})).unwrap_err();
        assert!(matches!(err, DecodeError::SwitchNotMatched { .. }));
    }

    #[test]
    fn test_invite_countdown() {
        let invite = Invite {
            expires_at: 61_500,
            ..Invite::default()
        };
        assert_eq!(invite.seconds_left(1_000), 60);
        assert_eq!(invite.seconds_left(90_000), 0);
        assert!(invite.expires().is_some());
    }
}
