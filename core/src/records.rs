//! REST Payload Records
//!
//! Shapes returned by the HTTP API. Every response carries a `success`
//! flag: the `true` branch is one of the records below, the `false` branch
//! is [`ApiFailure`].

use crate::record;

record! {
    /// Account as returned by the auth endpoints
    pub struct User {
        pub id: Int,
        pub username: Str,
        pub email: Str,
        pub display_name: Str,
        pub avatar_url: StrNullable,
    }
}

record! {
    pub struct LoginData {
        pub user: Object<User>,
        /// Bearer token for the API and the socket
        pub token: Str,
        pub expires_in: Str,
    }
}

record! {
    /// Successful `auth/login` or `auth/register` response
    pub struct AuthResponse {
        pub data: Object<LoginData>,
        pub message: Str,
    }
}

record! {
    /// The `success: false` branch of every endpoint
    pub struct ApiFailure {
        pub error: Str,
    }
}

record! {
    /// Bracket layout; only its presence is used by the client
    pub struct BracketData {}
}

record! {
    pub struct Tournament {
        pub id: Int,
        pub name: Str,
        pub description: StrNullable,
        pub max_players: Int,
        pub current_players: Int,
        pub status: Str,
        pub bracket_data: ObjectNullable<BracketData>,
        pub winner_id: IntNullable,
        pub creator_username: Str,
        pub created_at: Str,
    }
}

record! {
    pub struct TournamentList {
        pub data: Array<Tournament>,
    }
}

record! {
    pub struct Friend {
        pub id: Int,
        pub username: Str,
        pub display_name: Str,
        pub avatar_url: StrNullable,
        pub is_online: Bool,
    }
}

record! {
    pub struct FriendList {
        pub data: Array<Friend>,
    }
}
