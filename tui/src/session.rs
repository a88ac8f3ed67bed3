//! Session Context
//!
//! Everything the client knows about the signed-in user and the match in
//! progress. Decoded records are held with their backing store and
//! released together on logout.

use std::time::Instant;

use pongterm_core::decode::{release_slot, Decoded};
use pongterm_core::messages::{GameState, Invite, MatchStart};
use pongterm_core::records::{AuthResponse, FriendList, TournamentList};

use crate::input::{KeyInput, PaddleKeys};

/// Per-login state plus the current match
#[derive(Debug, Default)]
pub struct SessionContext {
    pub token: Option<String>,
    pub login: Option<Decoded<AuthResponse>>,
    pub tournaments: Option<Decoded<TournamentList>>,
    pub friends: Option<Decoded<FriendList>>,
    pub invite: Option<Decoded<Invite>>,
    pub match_start: Option<Decoded<MatchStart>>,
    pub game: MatchState,
}

impl SessionContext {
    /// Id of the signed-in user
    #[must_use]
    pub fn user_id(&self) -> Option<i64> {
        self.login.as_ref().map(|login| login.data.user.id)
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.login
            .as_ref()
            .map(|login| login.data.user.display_name.as_str())
    }

    /// Id of the current match, if one was arranged
    #[must_use]
    pub fn game_id(&self) -> Option<&str> {
        self.match_start.as_ref().map(|m| m.game_id.as_str())
    }

    /// Id of the invite currently on screen
    #[must_use]
    pub fn pending_invite_id(&self) -> Option<&str> {
        self.invite.as_ref().map(|i| i.invite_id.as_str())
    }

    /// Forget the current match and any invite that led to it
    pub fn end_match(&mut self) {
        release_slot(&mut self.invite);
        release_slot(&mut self.match_start);
        self.game = MatchState::default();
    }

    /// Release every decoded record and drop the credentials.
    ///
    /// Returns how many records were released.
    pub fn clear(&mut self) -> usize {
        let released = [
            release_slot(&mut self.login),
            release_slot(&mut self.tournaments),
            release_slot(&mut self.friends),
            release_slot(&mut self.invite),
            release_slot(&mut self.match_start),
        ]
        .into_iter()
        .filter(|released| *released)
        .count();
        self.token = None;
        self.game = MatchState::default();
        released
    }
}

/// Progress of one match from ready check to game over
#[derive(Debug, Default)]
pub struct MatchState {
    /// The match came from an accepted invite, so the overlay sits below it
    pub was_invited: bool,
    pub local_ready: bool,
    pub opponent_ready: bool,
    /// Last frame of the running game; the game-over frame is not kept
    pub last_frame: Option<GameState>,
    /// `(left, right)` once the server ended the game
    pub final_score: Option<(i64, i64)>,
    pub paddle: PaddleKeys,
    /// Paddle state last sent upstream
    pub last_sent: (bool, bool),
}

impl MatchState {
    #[must_use]
    pub fn game_over(&self) -> bool {
        self.final_score.is_some()
    }

    /// Apply a paddle key; returns the state to send if it changed
    pub fn paddle_input(&mut self, input: KeyInput, now: Instant) -> Option<(bool, bool)> {
        self.paddle.apply(input, now);
        self.take_change()
    }

    /// Release timed-out holds; returns the state to send if it changed
    pub fn expire_holds(&mut self, now: Instant) -> Option<(bool, bool)> {
        self.paddle.expire(now);
        self.take_change()
    }

    fn take_change(&mut self) -> Option<(bool, bool)> {
        let state = self.paddle.state();
        if state == self.last_sent {
            return None;
        }
        self.last_sent = state;
        Some(state)
    }
}
