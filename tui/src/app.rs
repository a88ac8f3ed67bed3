//! Main Application
//!
//! The App drives the whole client from one task:
//! - Event loop over the socket and the terminal
//! - Session state machine (window transitions, match lifecycle)
//! - Rendering through the surface engine or the arena renderer
//!
//! # Event loop
//!
//! Each wake-up handles the socket message first when one is ready, then
//! every terminal event already queued, then repaints once. Request/response
//! calls are awaited inline and hold the loop for their duration.
//!
//! # Window stack
//!
//! ```text
//! LOGIN ─┬─ REGISTER
//!        └─ DASHBOARD ─┬─ TOURNAMENT_LIST / FRIENDS_LIST
//!                      ├─ INVITE_OVERLAY ── READY_CHECK ⇒ LIVE_GAME
//!                      └─ READY_CHECK ⇒ LIVE_GAME
//! ```
//!
//! `⇒` replaces the top of the stack instead of pushing.

use std::io::{self, Write};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use crossterm::event::Event;
use futures::{FutureExt, Stream, StreamExt};
use serde_json::Value;

use pongterm_core::decode::{
    decode, decode_choice, decode_discriminator, force_decode, release_slot, Choice, DecodeError,
    Decoded, Pretty,
};
use pongterm_core::messages::{decode_server_message, GameFrame, ServerMessage};
use pongterm_core::records::{ApiFailure, AuthResponse, FriendList, TournamentList};
use pongterm_core::requests::{self, endpoints};
use pongterm_core::{Api, Inbound, Method, Socket, SocketError};

use crate::game::{resting_state, ArenaRenderer};
use crate::geometry::Direction;
use crate::input::{coalesce_repeats, translate, Input, Key, KeyInput};
use crate::screens::{primary_action, Action, Screens};
use crate::session::{MatchState, SessionContext};
use crate::surface::{ComponentId, Surface, WindowId};

/// Shown when a failed request carries no readable reason
const GENERIC_FAILURE: &str = "Request failed, please try again";

const GAME_HINT: &str = "up/down: move   esc: leave";

/// What woke the event loop
enum Wake {
    Socket(std::result::Result<Inbound, SocketError>),
    Terminal(Option<io::Result<Event>>),
}

/// Main application state
pub struct App<A: Api, S: Socket, W: Write> {
    // === Core State ===
    running: bool,
    session: SessionContext,

    // === Transport ===
    api: A,
    socket: S,

    // === UI ===
    surface: Surface<W>,
    screens: Screens,
    renderer: ArenaRenderer,
}

impl<A: Api, S: Socket, W: Write> App<A, S, W> {
    /// Build every window and start on LOGIN
    pub fn new(api: A, socket: S, out: W, size: (u16, u16), cell_aspect: f32) -> Self {
        let mut surface = Surface::new(out, WindowId::Login, size, cell_aspect);
        let screens = Screens::build(&mut surface);
        Self {
            running: true,
            session: SessionContext::default(),
            api,
            socket,
            surface,
            screens,
            renderer: ArenaRenderer::default(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn surface(&self) -> &Surface<W> {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface<W> {
        &mut self.surface
    }

    #[must_use]
    pub fn screens(&self) -> &Screens {
        &self.screens
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub fn socket(&self) -> &S {
        &self.socket
    }

    // ========================================================================
    // Event loop
    // ========================================================================

    /// Run until the user exits or the terminal event stream ends.
    ///
    /// # Errors
    ///
    /// Transport failures, malformed payloads and contract violations are
    /// fatal and returned as-is.
    pub async fn run<E>(&mut self, mut events: E) -> Result<()>
    where
        E: Stream<Item = io::Result<Event>> + Unpin,
    {
        self.redraw(true).context("initial paint")?;

        while self.running {
            let wake = tokio::select! {
                biased;
                inbound = self.socket.recv() => Wake::Socket(inbound),
                event = events.next() => Wake::Terminal(event),
            };

            let mut batch = Vec::new();
            let mut ended = false;
            match wake {
                Wake::Socket(inbound) => {
                    let inbound = inbound.context("socket receive failed")?;
                    self.handle_inbound(inbound).await?;
                }
                Wake::Terminal(Some(event)) => {
                    batch.extend(translate(&event.context("reading terminal events")?));
                }
                Wake::Terminal(None) => ended = true,
            }

            // Everything else the terminal already queued for this wake-up
            while !ended {
                match events.next().now_or_never() {
                    Some(Some(event)) => {
                        batch.extend(translate(&event.context("reading terminal events")?));
                    }
                    Some(None) => ended = true,
                    None => break,
                }
            }

            // Doubled letters typed during a blocking request are real keystrokes
            let batch = if self.surface.active() == WindowId::LiveGame {
                coalesce_repeats(batch)
            } else {
                batch
            };
            for input in batch {
                if !self.running {
                    break;
                }
                self.handle_input(input).await?;
            }

            if self.surface.active() == WindowId::LiveGame {
                if let Some((up, down)) = self.session.game.expire_holds(Instant::now()) {
                    self.send_paddle(up, down).await?;
                }
            }

            if ended {
                tracing::info!("Terminal event stream ended");
                self.running = false;
            }
            if self.running {
                self.redraw(false).context("repaint")?;
            }
        }

        self.shutdown().await;
        Ok(())
    }

    /// Release every record and close the socket
    pub async fn shutdown(&mut self) {
        let released = self.session.clear();
        self.socket.disconnect().await;
        tracing::info!(released, "Session shut down");
    }

    fn redraw(&mut self, force: bool) -> io::Result<()> {
        if self.surface.active() != WindowId::LiveGame {
            return self.surface.redraw(force);
        }

        if force || self.surface.needs_clear() {
            self.renderer.reset();
            self.surface.redraw(true)?;
        }
        let size = self.surface.size();
        let aspect = self.surface.cell_aspect();
        let banner = self.game_banner();
        let resting;
        let state = match &self.session.game.last_frame {
            Some(state) => state,
            None => {
                resting = resting_state();
                &resting
            }
        };
        self.renderer
            .draw(self.surface.writer_mut(), size, aspect, state, &banner)?;
        Ok(())
    }

    fn game_banner(&self) -> String {
        let game = &self.session.game;
        let Some((left, right)) = game.final_score else {
            return GAME_HINT.to_string();
        };
        let role = self
            .session
            .match_start
            .as_ref()
            .map_or("left", |m| m.role.as_str());
        let (mine, theirs) = if role == "right" {
            (right, left)
        } else {
            (left, right)
        };
        let verdict = if mine > theirs { "You won" } else { "You lost" };
        format!("{verdict} {mine}-{theirs}.  esc: back to the dashboard")
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    async fn handle_input(&mut self, input: Input) -> Result<()> {
        match input {
            Input::Resize(cols, rows) => {
                tracing::debug!(cols, rows, "Terminal resized");
                self.surface.resize(cols, rows);
                Ok(())
            }
            Input::Key(key) => self.handle_key(key).await,
        }
    }

    /// React to one key transition
    pub async fn handle_key(&mut self, input: KeyInput) -> Result<()> {
        if input.key == Key::Interrupt {
            tracing::info!("Interrupted");
            self.running = false;
            return Ok(());
        }

        let window = self.surface.active();
        if window == WindowId::LiveGame {
            return self.handle_game_key(input).await;
        }
        if !input.pressed {
            return Ok(());
        }

        match input.key {
            Key::Escape => self.go_back().await?,
            Key::Up => {
                self.surface.move_focus(Direction::Up);
            }
            Key::Down => {
                self.surface.move_focus(Direction::Down);
            }
            Key::Left => {
                self.surface.move_focus(Direction::Left);
            }
            Key::Right => {
                self.surface.move_focus(Direction::Right);
            }
            Key::Backspace => {
                self.surface.backspace();
            }
            Key::Char(c) => {
                self.surface.type_char(c);
            }
            Key::Enter => {
                if let (Some(id), Some(action)) =
                    (self.surface.focused(), self.surface.focused_action())
                {
                    self.press(id, action).await?;
                } else if self.surface.focused_is_text_field() {
                    if let Some(action) = primary_action(window) {
                        self.activate(action).await?;
                    }
                }
            }
            Key::Interrupt => {}
        }
        Ok(())
    }

    async fn handle_game_key(&mut self, input: KeyInput) -> Result<()> {
        match input.key {
            Key::Escape if input.pressed => self.leave_match().await,
            Key::Up | Key::Down if !self.session.game.game_over() => {
                match self.session.game.paddle_input(input, Instant::now()) {
                    Some((up, down)) => self.send_paddle(up, down).await,
                    None => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }

    /// Activate a button, showing it pressed while the action runs
    async fn press(&mut self, id: ComponentId, action: Action) -> Result<()> {
        self.surface.set_pressed(id, true);
        self.redraw(false)?;
        let result = self.activate(action).await;
        self.surface.set_pressed(id, false);
        result
    }

    async fn activate(&mut self, action: Action) -> Result<()> {
        tracing::debug!(?action, "Activate");
        match action {
            Action::Login => self.submit_login().await,
            Action::OpenRegister => {
                self.surface.push(WindowId::Register);
                Ok(())
            }
            Action::Register => self.submit_register().await,
            Action::OpenTournaments => self.open_tournaments().await,
            Action::OpenFriends => self.open_friends().await,
            Action::Logout => self.logout().await,
            Action::Back => self.go_back().await,
            Action::AcceptInvite => self.accept_invite().await,
            Action::DeclineInvite => self.decline_invite().await,
            Action::Ready => self.mark_ready().await,
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Escape or a back button
    async fn go_back(&mut self) -> Result<()> {
        match self.surface.active() {
            WindowId::Login => {
                tracing::info!("Exit requested");
                self.running = false;
                Ok(())
            }
            WindowId::InviteOverlay => self.decline_invite().await,
            WindowId::LiveGame => self.leave_match().await,
            WindowId::ReadyCheck => {
                self.pop_window().await?;
                self.session.end_match();
                Ok(())
            }
            _ => self.pop_window().await,
        }
    }

    /// Pop one window, applying the rules of the window uncovered:
    /// an invite overlay is declined and popped too, LOGIN logs out.
    async fn pop_window(&mut self) -> Result<()> {
        loop {
            let Some(top) = self.surface.pop() else {
                return Ok(());
            };
            match top {
                WindowId::InviteOverlay => {
                    self.send_decline().await?;
                }
                WindowId::Login => {
                    self.logout_cleanup().await;
                    return Ok(());
                }
                _ => return Ok(()),
            }
        }
    }

    async fn logout(&mut self) -> Result<()> {
        while self.surface.stack().depth() > 1 {
            self.pop_window().await?;
        }
        Ok(())
    }

    /// Drop everything tied to the signed-in user
    async fn logout_cleanup(&mut self) {
        if self.session.token.is_some() {
            if let Err(e) = self.api.request(Method::Post, endpoints::LOGOUT, None).await {
                tracing::warn!(error = %e, "Logout request failed");
            }
        }
        self.api.set_token(None);
        self.socket.disconnect().await;
        let released = self.session.clear();

        for id in self.screens.password_fields() {
            self.surface.clear_field(id);
        }
        self.surface.clear_field(self.screens.login.totp);
        self.surface.set_text(self.screens.dashboard.status, "");
        tracing::info!(released, "Logged out");
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    async fn submit_login(&mut self) -> Result<()> {
        let form = &self.screens.login;
        let body = requests::login(
            self.surface.field_text(form.email),
            self.surface.field_text(form.password),
            self.surface.field_text(form.totp),
        );
        let error_label = form.error;

        tracing::info!("Submitting login");
        let tree = self
            .api
            .request(Method::Post, endpoints::LOGIN, Some(body))
            .await
            .context("login request failed")?;
        self.accept_auth_response(tree, error_label, false).await
    }

    async fn submit_register(&mut self) -> Result<()> {
        let form = &self.screens.register;
        let body = requests::register(
            self.surface.field_text(form.username),
            self.surface.field_text(form.email),
            self.surface.field_text(form.password),
            self.surface.field_text(form.display_name),
        );
        let error_label = form.error;

        tracing::info!("Submitting registration");
        let tree = self
            .api
            .request(Method::Post, endpoints::REGISTER, Some(body))
            .await
            .context("registration request failed")?;
        self.accept_auth_response(tree, error_label, true).await
    }

    /// Shared tail of login and registration.
    ///
    /// A `false` success flag is shown in `error_label`; a `true` one must
    /// carry a well-formed session or the client exits.
    async fn accept_auth_response(
        &mut self,
        tree: Value,
        error_label: ComponentId,
        replace: bool,
    ) -> Result<()> {
        if !decode_discriminator(&tree, "success").context("auth response has no success flag")? {
            let reason = decode::<ApiFailure>(&tree)
                .map(|failure| failure.error)
                .unwrap_or_else(|_| GENERIC_FAILURE.to_string());
            tracing::info!(%reason, "Authentication refused");
            self.surface.set_text(error_label, &reason);
            return Ok(());
        }

        let login = force_decode::<AuthResponse>(tree)?;
        let token = login.data.token.clone();
        tracing::info!(user_id = login.data.user.id, username = %login.data.user.username, "Signed in");
        tracing::debug!(user = %Pretty(&login.data.user), "Account record");

        self.api.set_token(Some(token.clone()));
        self.session.token = Some(token.clone());
        release_slot(&mut self.session.login);
        self.session.login = Some(login);
        let welcome = format!("Welcome, {}", self.session.display_name().unwrap_or_default());
        self.surface.set_text(self.screens.dashboard.welcome, &welcome);
        self.surface.set_text(error_label, "");

        if replace {
            self.surface.replace(WindowId::Dashboard);
        } else {
            self.surface.push(WindowId::Dashboard);
        }

        self.socket.connect().await.context("socket connection failed")?;
        self.socket
            .send(requests::socket_auth(&token))
            .await
            .context("socket authentication send failed")?;
        Ok(())
    }

    // ========================================================================
    // Lists
    // ========================================================================

    async fn open_tournaments(&mut self) -> Result<()> {
        let body = self.screens.tournaments.body;
        self.open_list(WindowId::TournamentList, body).await?;
        let tree = self
            .api
            .request(Method::Get, endpoints::TOURNAMENTS, None)
            .await
            .context("tournament list request failed")?;

        release_slot(&mut self.session.tournaments);
        let text = match decode_choice::<TournamentList, ApiFailure>(&tree, "success")
            .context("tournament list payload")?
        {
            Choice::True(list) => {
                tracing::debug!(list = %Pretty(&list), "Tournament list");
                let text = format_tournaments(&list);
                self.session.tournaments = Some(Decoded::new(list, tree));
                text
            }
            Choice::False(failure) => failure.error,
        };
        self.surface.set_text(body, &text);
        Ok(())
    }

    async fn open_friends(&mut self) -> Result<()> {
        let body = self.screens.friends.body;
        self.open_list(WindowId::FriendsList, body).await?;
        let tree = self
            .api
            .request(Method::Get, endpoints::FRIENDS, None)
            .await
            .context("friend list request failed")?;

        release_slot(&mut self.session.friends);
        let text = match decode_choice::<FriendList, ApiFailure>(&tree, "success")
            .context("friend list payload")?
        {
            Choice::True(list) => {
                tracing::debug!(list = %Pretty(&list), "Friend list");
                let text = format_friends(&list);
                self.session.friends = Some(Decoded::new(list, tree));
                text
            }
            Choice::False(failure) => failure.error,
        };
        self.surface.set_text(body, &text);
        Ok(())
    }

    /// Show a list window in its loading state before the fetch blocks
    async fn open_list(&mut self, window: WindowId, body: ComponentId) -> Result<()> {
        self.surface.push(window);
        self.surface.set_text(body, "Loading...");
        self.redraw(false)?;
        Ok(())
    }

    // ========================================================================
    // Invites and matches
    // ========================================================================

    async fn accept_invite(&mut self) -> Result<()> {
        let Some(invite_id) = self.session.pending_invite_id().map(str::to_string) else {
            return Ok(());
        };
        tracing::info!(%invite_id, "Accepting invite");
        self.socket
            .send(requests::invite_accept(&invite_id))
            .await
            .context("sending invite acceptance")?;
        self.surface
            .set_text(self.screens.invite.expiry, "Accepted, waiting for the match...");
        Ok(())
    }

    /// Decline the invite on screen and close the overlay
    async fn decline_invite(&mut self) -> Result<()> {
        self.send_decline().await?;
        self.pop_window().await
    }

    async fn send_decline(&mut self) -> Result<()> {
        if let Some(invite_id) = self.session.pending_invite_id().map(str::to_string) {
            tracing::info!(%invite_id, "Declining invite");
            self.socket
                .send(requests::invite_decline(&invite_id))
                .await
                .context("sending invite decline")?;
        }
        release_slot(&mut self.session.invite);
        Ok(())
    }

    async fn mark_ready(&mut self) -> Result<()> {
        let Some(game_id) = self.session.game_id().map(str::to_string) else {
            return Ok(());
        };
        if self.session.game.local_ready {
            return Ok(());
        }
        self.socket
            .send(requests::player_ready(&game_id))
            .await
            .context("sending ready")?;
        self.session.game.local_ready = true;
        self.surface.set_text(self.screens.ready.local, "You: ready");
        self.surface.hide(self.screens.ready.button);
        tracing::info!(%game_id, "Marked ready");

        if self.session.game.opponent_ready {
            self.enter_live_game();
        }
        Ok(())
    }

    fn enter_live_game(&mut self) {
        tracing::info!(game_id = ?self.session.game_id(), "Entering live game");
        self.surface.replace(WindowId::LiveGame);
        self.renderer.reset();
    }

    /// Unwind the match windows back to where the match started
    async fn leave_match(&mut self) -> Result<()> {
        let pops = if self.session.game.was_invited { 2 } else { 1 };
        tracing::info!(pops, "Leaving match");
        if self.session.game.last_sent != (false, false) {
            self.send_paddle(false, false).await?;
        }
        self.session.end_match();
        self.renderer.reset();
        for _ in 0..pops {
            self.surface.pop();
        }
        Ok(())
    }

    async fn send_paddle(&mut self, up: bool, down: bool) -> Result<()> {
        let Some(game_id) = self.session.game_id().map(str::to_string) else {
            return Ok(());
        };
        self.session.game.last_sent = (up, down);
        self.socket
            .send(requests::paddle_input(&game_id, up, down))
            .await
            .context("sending paddle input")
    }

    // ========================================================================
    // Socket messages
    // ========================================================================

    /// React to one socket message
    ///
    /// # Errors
    ///
    /// A message of a known type that does not decode is a contract
    /// violation; so is a rejected socket authentication.
    pub async fn handle_inbound(&mut self, inbound: Inbound) -> Result<()> {
        let switched = match decode_server_message(&inbound.tree) {
            Ok(switched) => switched,
            Err(DecodeError::SwitchNotMatched { value, .. }) => {
                tracing::debug!(kind = %value, "Ignoring unknown socket message");
                return Ok(());
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("socket message `{}` violated its contract", inbound.kind)));
            }
        };
        tracing::debug!(kind = %inbound.kind, index = switched.index, "Socket message");

        match switched.value {
            ServerMessage::Invite(invite) => {
                let busy = self.surface.active() == WindowId::Login
                    || [
                        WindowId::InviteOverlay,
                        WindowId::ReadyCheck,
                        WindowId::LiveGame,
                    ]
                    .iter()
                    .any(|w| self.surface.stack().contains(*w));
                if busy {
                    tracing::debug!(invite_id = %invite.invite_id, "Invite ignored while busy");
                    return Ok(());
                }

                let seconds = invite.seconds_left(chrono::Utc::now().timestamp_millis());
                tracing::info!(
                    invite_id = %invite.invite_id,
                    from = %invite.from_username,
                    expires = ?invite.expires(),
                    "Invite received"
                );
                self.surface.set_text(
                    self.screens.invite.sender,
                    &format!("{} wants to play", invite.from_username),
                );
                self.surface
                    .set_text(self.screens.invite.expiry, &format!("expires in {seconds}s"));
                release_slot(&mut self.session.invite);
                self.session.invite = Some(Decoded::new(invite, inbound.tree));
                self.surface.push(WindowId::InviteOverlay);
            }

            ServerMessage::MatchStart(start) => {
                let stack = self.surface.stack();
                if stack.contains(WindowId::ReadyCheck) || stack.contains(WindowId::LiveGame) {
                    tracing::warn!(game_id = %start.game_id, "Match start while a match is active");
                    return Ok(());
                }
                tracing::info!(game_id = %start.game_id, role = %start.role, "Match starting");
                self.session.game = MatchState {
                    was_invited: stack.contains(WindowId::InviteOverlay),
                    ..MatchState::default()
                };
                self.surface.set_text(
                    self.screens.ready.info,
                    &format!(
                        "You play {} against player #{}",
                        start.role, start.opponent_id
                    ),
                );
                self.surface
                    .set_text(self.screens.ready.opponent, "Opponent: not ready");
                self.surface.set_text(self.screens.ready.local, "You: not ready");
                self.surface.show(self.screens.ready.button);
                release_slot(&mut self.session.match_start);
                self.session.match_start = Some(Decoded::new(start, inbound.tree));
                self.surface.push(WindowId::ReadyCheck);
            }

            ServerMessage::ReadyUpdate(update) => {
                if self.session.game_id() != Some(update.game_id.as_str()) {
                    tracing::debug!(game_id = %update.game_id, "Ready update for another game");
                    return Ok(());
                }
                if self.session.user_id() == Some(update.player_id) {
                    return Ok(());
                }
                self.session.game.opponent_ready = update.ready;
                self.surface.set_text(
                    self.screens.ready.opponent,
                    if update.ready {
                        "Opponent: ready"
                    } else {
                        "Opponent: not ready"
                    },
                );
                if update.ready
                    && self.session.game.local_ready
                    && self.surface.active() == WindowId::ReadyCheck
                {
                    self.enter_live_game();
                }
            }

            ServerMessage::Frame(GameFrame { state }) => {
                if self.surface.active() != WindowId::LiveGame || self.session.game.game_over() {
                    return Ok(());
                }
                if state.game_over {
                    // The previous frame stays on screen under the result
                    tracing::info!(
                        left = state.left_score,
                        right = state.right_score,
                        "Game over"
                    );
                    self.session.game.final_score = Some((state.left_score, state.right_score));
                    return Ok(());
                }
                self.session.game.last_frame = Some(state);
            }

            ServerMessage::OpponentDisconnected(notice) => {
                let stack = self.surface.stack();
                if !(stack.contains(WindowId::LiveGame) || stack.contains(WindowId::ReadyCheck)) {
                    return Ok(());
                }
                tracing::info!(game_id = %notice.game_id, "Opponent disconnected");
                self.leave_match().await?;
                self.surface
                    .set_text(self.screens.dashboard.status, "Your opponent disconnected.");
            }

            ServerMessage::InviteDeclined(closed) | ServerMessage::InviteExpired(closed) => {
                if self.surface.active() == WindowId::InviteOverlay
                    && self.session.pending_invite_id() == Some(closed.invite_id.as_str())
                {
                    tracing::info!(invite_id = %closed.invite_id, kind = %inbound.kind, "Invite closed");
                    release_slot(&mut self.session.invite);
                    self.surface.pop();
                    self.surface
                        .set_text(self.screens.dashboard.status, "The invite is no longer valid.");
                }
            }

            ServerMessage::AuthSuccess(ack) => {
                tracing::info!(user_id = ack.data.user_id, username = %ack.data.username, "Socket authenticated");
            }

            ServerMessage::AuthError(notice) => {
                bail!("socket authentication rejected: {}", notice.message);
            }

            ServerMessage::Error(notice) => {
                tracing::warn!(message = %notice.message, "Server reported an error");
                self.surface.set_text(
                    self.screens.dashboard.status,
                    &format!("Server: {}", notice.message),
                );
            }
        }
        Ok(())
    }
}

// ============================================================================
// List formatting
// ============================================================================

fn format_tournaments(list: &TournamentList) -> String {
    if list.data.is_empty() {
        return "No tournaments yet.".to_string();
    }
    list.data
        .iter()
        .map(|t| {
            let mut line = format!(
                "{}  {}/{}  {}  by {}",
                t.name, t.current_players, t.max_players, t.status, t.creator_username
            );
            if let Some(winner) = t.winner_id {
                line.push_str(&format!("  (winner #{winner})"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_friends(list: &FriendList) -> String {
    if list.data.is_empty() {
        return "No friends yet.".to_string();
    }
    list.data
        .iter()
        .map(|f| {
            format!(
                "{} (@{})  {}",
                f.display_name,
                f.username,
                if f.is_online { "online" } else { "offline" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
