//! Session Flow Tests
//!
//! Drive the whole client through scripted transports: sign in, receive
//! invites, go through the ready check, play and leave.
//!
//! # Mock Transports
//!
//! - `MockApi` answers requests from a queue and records every call
//! - `MockSocket` delivers queued messages and records everything sent;
//!   `recv` stays pending when the queue is empty, like a quiet server
//!
//! Both share their state through an `Arc` so the test keeps a handle
//! after moving the mock into the `App`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};

use pongterm_core::{Api, ApiError, Inbound, Method, Socket, SocketError};
use pongterm_tui::input::{Key, KeyInput};
use pongterm_tui::surface::{ComponentId, ComponentKind, WindowId};
use pongterm_tui::App;

// ============================================================================
// Mock API
// ============================================================================

#[derive(Default)]
struct ApiLog {
    responses: VecDeque<Value>,
    calls: Vec<(Method, String, Option<String>)>,
    token: Option<String>,
}

#[derive(Clone, Default)]
struct MockApi {
    log: Arc<Mutex<ApiLog>>,
}

impl MockApi {
    fn respond(&self, payload: Value) {
        self.log.lock().unwrap().responses.push_back(payload);
    }

    fn token(&self) -> Option<String> {
        self.log.lock().unwrap().token.clone()
    }

    /// Every call made, with its body parsed
    fn calls(&self) -> Vec<(Method, String, Option<Value>)> {
        self.log
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|(m, e, body)| {
                let body = body.as_deref().map(|b| serde_json::from_str(b).unwrap());
                (*m, e.clone(), body)
            })
            .collect()
    }
}

#[async_trait]
impl Api for MockApi {
    async fn request(
        &mut self,
        method: Method,
        endpoint: &str,
        body: Option<String>,
    ) -> Result<Value, ApiError> {
        let mut log = self.log.lock().unwrap();
        log.calls.push((method, endpoint.to_string(), body));
        Ok(log
            .responses
            .pop_front()
            .unwrap_or_else(|| json!({"success": true, "message": "ok"})))
    }

    fn set_token(&mut self, token: Option<String>) {
        self.log.lock().unwrap().token = token;
    }
}

// ============================================================================
// Mock Socket
// ============================================================================

#[derive(Default)]
struct SocketLog {
    inbound: VecDeque<Value>,
    sent: Vec<Value>,
    connected: bool,
}

#[derive(Clone, Default)]
struct MockSocket {
    log: Arc<Mutex<SocketLog>>,
}

impl MockSocket {
    fn queue(&self, message: Value) {
        self.log.lock().unwrap().inbound.push_back(message);
    }

    fn sent(&self) -> Vec<Value> {
        self.log.lock().unwrap().sent.clone()
    }

    fn last_sent(&self) -> Option<Value> {
        self.log.lock().unwrap().sent.last().cloned()
    }

    fn connected(&self) -> bool {
        self.log.lock().unwrap().connected
    }
}

#[async_trait]
impl Socket for MockSocket {
    async fn connect(&mut self) -> Result<(), SocketError> {
        self.log.lock().unwrap().connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) {
        self.log.lock().unwrap().connected = false;
    }

    async fn send(&mut self, text: String) -> Result<(), SocketError> {
        let value = serde_json::from_str(&text).unwrap();
        self.log.lock().unwrap().sent.push(value);
        Ok(())
    }

    async fn recv(&mut self) -> Result<Inbound, SocketError> {
        let next = self.log.lock().unwrap().inbound.pop_front();
        match next {
            Some(tree) => Ok(Inbound::new(tree)),
            None => std::future::pending().await,
        }
    }

    fn is_connected(&self) -> bool {
        self.connected()
    }
}

// ============================================================================
// Helpers
// ============================================================================

type TestApp = App<MockApi, MockSocket, Vec<u8>>;

fn new_app() -> (TestApp, MockApi, MockSocket) {
    let api = MockApi::default();
    let socket = MockSocket::default();
    let app = App::new(api.clone(), socket.clone(), Vec::new(), (100, 30), 0.5);
    (app, api, socket)
}

fn login_payload() -> Value {
    json!({
        "success": true,
        "data": {
            "user": {
                "id": 12,
                "username": "ann",
                "email": "a@b.com",
                "display_name": "Ann",
                "avatar_url": null
            },
            "token": "T",
            "expires_in": "24h"
        },
        "message": "ok"
    })
}

fn invite(id: &str) -> Value {
    json!({
        "type": "friend_pong_invite",
        "inviteId": id,
        "fromUserId": 7,
        "fromUsername": "bob",
        "expiresAt": 4_102_444_800_000_i64
    })
}

fn match_start() -> Value {
    json!({"type": "friend_pong_start", "gameId": "g1", "role": "left", "opponentId": 7})
}

fn ready_update(player: i64) -> Value {
    json!({"type": "pong_ready_update", "gameId": "g1", "playerId": player, "ready": true})
}

fn label_text(app: &TestApp, id: ComponentId) -> String {
    match &app.surface().component(id).kind {
        ComponentKind::Label(label) => label.text().to_string(),
        ComponentKind::TextField(field) => field.text().to_string(),
        _ => panic!("not a text component"),
    }
}

/// Printed characters with escape sequences and blanks removed
fn visible_text(out: &[u8]) -> String {
    let text = String::from_utf8_lossy(out);
    let mut visible = String::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if chars.next() == Some('[') {
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
        } else if !c.is_whitespace() {
            visible.push(c);
        }
    }
    visible
}

async fn press(app: &mut TestApp, key: Key) {
    app.handle_key(KeyInput::press(key)).await.unwrap();
}

async fn type_text(app: &mut TestApp, text: &str) {
    for c in text.chars() {
        press(app, Key::Char(c)).await;
    }
}

async fn deliver(app: &mut TestApp, message: Value) {
    app.handle_inbound(Inbound::new(message)).await.unwrap();
}

/// Sign in through the login form and land on the dashboard
async fn signed_in() -> (TestApp, MockApi, MockSocket) {
    let (mut app, api, socket) = new_app();
    api.respond(login_payload());
    let form = &app.screens().login;
    let fields = [
        (form.email, "a@b.com"),
        (form.password, "x"),
        (form.totp, "000000"),
    ];
    for (field, text) in fields {
        app.surface_mut().set_focus(field);
        type_text(&mut app, text).await;
    }
    press(&mut app, Key::Enter).await;
    assert_eq!(app.surface().active(), WindowId::Dashboard);
    (app, api, socket)
}

/// Go from the dashboard to a running game, optionally through an invite
async fn in_game(invited: bool) -> (TestApp, MockApi, MockSocket) {
    let (mut app, api, socket) = signed_in().await;
    if invited {
        deliver(&mut app, invite("i1")).await;
        press(&mut app, Key::Enter).await;
    }
    deliver(&mut app, match_start()).await;
    assert_eq!(app.surface().active(), WindowId::ReadyCheck);
    press(&mut app, Key::Enter).await;
    deliver(&mut app, ready_update(7)).await;
    assert_eq!(app.surface().active(), WindowId::LiveGame);
    (app, api, socket)
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_login_reaches_dashboard_and_authenticates_socket() {
    let (app, api, socket) = signed_in().await;

    assert_eq!(api.token().as_deref(), Some("T"));
    assert_eq!(
        api.calls(),
        vec![(
            Method::Post,
            "auth/login".to_string(),
            Some(json!({"email": "a@b.com", "password": "x", "totp_password": "000000"}))
        )]
    );
    assert!(socket.connected());
    assert_eq!(socket.sent(), vec![json!({"type": "auth", "token": "T"})]);
    assert_eq!(label_text(&app, app.screens().dashboard.welcome), "Welcome, Ann");
    assert_eq!(app.session().user_id(), Some(12));
}

#[tokio::test]
async fn test_failed_login_shows_server_error() {
    let (mut app, api, socket) = new_app();
    api.respond(json!({"success": false, "error": "Invalid credentials"}));

    press(&mut app, Key::Enter).await;

    assert_eq!(app.surface().active(), WindowId::Login);
    assert_eq!(
        label_text(&app, app.screens().login.error),
        "Invalid credentials"
    );
    assert_eq!(api.token(), None);
    assert!(socket.sent().is_empty());
}

#[tokio::test]
async fn test_escape_at_login_exits() {
    let (mut app, _, _) = new_app();
    press(&mut app, Key::Escape).await;
    assert!(!app.is_running());
}

#[tokio::test]
async fn test_logout_clears_credentials() {
    let (mut app, api, socket) = new_app();
    let password = app.screens().login.password;
    app.surface_mut().set_focus(password);
    type_text(&mut app, "secret").await;
    api.respond(login_payload());
    press(&mut app, Key::Enter).await;
    assert_eq!(app.surface().active(), WindowId::Dashboard);

    press(&mut app, Key::Escape).await;

    assert_eq!(app.surface().active(), WindowId::Login);
    assert!(app.is_running());
    assert_eq!(api.token(), None);
    assert_eq!(app.session().token, None);
    assert!(app.session().login.is_none());
    assert!(!socket.connected());
    assert_eq!(app.surface().field_text(password), "");
    assert_eq!(
        api.calls().last().map(|(m, e, _)| (*m, e.clone())),
        Some((Method::Post, "auth/logout".to_string()))
    );
}

#[tokio::test]
async fn test_doubled_letters_survive_one_wake_up() {
    let (mut app, _, _) = new_app();
    let email = app.screens().login.email;
    let key = |kind: KeyEventKind| -> std::io::Result<Event> {
        Ok(Event::Key(KeyEvent::new_with_kind(
            KeyCode::Char('s'),
            KeyModifiers::NONE,
            kind,
        )))
    };
    let events = futures::stream::iter(vec![
        key(KeyEventKind::Press),
        key(KeyEventKind::Release),
        key(KeyEventKind::Press),
        key(KeyEventKind::Release),
    ]);

    assert_ok!(app.run(events).await);
    assert_eq!(app.surface().field_text(email), "ss");
}

// ============================================================================
// Lists
// ============================================================================

#[tokio::test]
async fn test_tournament_list_is_fetched_and_shown() {
    let (mut app, api, _) = signed_in().await;
    api.respond(json!({
        "success": true,
        "data": [{
            "id": 1,
            "name": "Spring Cup",
            "description": null,
            "max_players": 8,
            "current_players": 3,
            "status": "open",
            "bracket_data": null,
            "winner_id": null,
            "creator_username": "ann",
            "created_at": "2024-01-01"
        }]
    }));

    // Focus starts on the first dashboard button
    press(&mut app, Key::Enter).await;

    assert_eq!(app.surface().active(), WindowId::TournamentList);
    assert!(label_text(&app, app.screens().tournaments.body).contains("Spring Cup"));
    assert!(app.session().tournaments.is_some());

    press(&mut app, Key::Escape).await;
    assert_eq!(app.surface().active(), WindowId::Dashboard);
}

// ============================================================================
// Invites
// ============================================================================

#[tokio::test]
async fn test_escape_declines_invite() {
    let (mut app, _, socket) = signed_in().await;
    deliver(&mut app, invite("i1")).await;
    assert_eq!(app.surface().active(), WindowId::InviteOverlay);
    assert_eq!(label_text(&app, app.screens().invite.sender), "bob wants to play");

    press(&mut app, Key::Escape).await;

    assert_eq!(app.surface().active(), WindowId::Dashboard);
    assert_eq!(
        socket.last_sent(),
        Some(json!({"type": "friend_pong_decline", "inviteId": "i1"}))
    );
    assert!(app.session().invite.is_none());
}

#[tokio::test]
async fn test_invite_ignored_at_login_and_while_pending() {
    let (mut app, _, _) = new_app();
    deliver(&mut app, invite("i0")).await;
    assert_eq!(app.surface().active(), WindowId::Login);

    let (mut app, _, _) = signed_in().await;
    deliver(&mut app, invite("i1")).await;
    deliver(&mut app, invite("i2")).await;
    assert_eq!(app.surface().stack().depth(), 3);
    assert_eq!(app.session().pending_invite_id(), Some("i1"));
}

#[tokio::test]
async fn test_expired_invite_closes_overlay_without_decline() {
    let (mut app, _, socket) = signed_in().await;
    deliver(&mut app, invite("i1")).await;
    let before = socket.sent().len();

    deliver(&mut app, json!({"type": "friend_pong_expired", "inviteId": "i1"})).await;

    assert_eq!(app.surface().active(), WindowId::Dashboard);
    assert_eq!(socket.sent().len(), before);
}

#[tokio::test]
async fn test_unknown_message_is_ignored() {
    let (mut app, _, _) = signed_in().await;
    deliver(&mut app, json!({"type": "chat_message", "text": "hi"})).await;
    assert_eq!(app.surface().active(), WindowId::Dashboard);
}

#[tokio::test]
async fn test_malformed_known_message_is_fatal() {
    let (mut app, _, _) = signed_in().await;
    let result = app
        .handle_inbound(Inbound::new(json!({"type": "friend_pong_invite", "inviteId": 3})))
        .await;
    assert_err!(result);
}

#[tokio::test]
async fn test_socket_messages_handled_before_queued_keys() {
    let (mut app, _, socket) = signed_in().await;
    socket.queue(invite("i9"));
    let esc = Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
    let events = futures::stream::iter(vec![Ok(esc)]);

    assert_ok!(app.run(events).await);

    // The invite arrived first, so Escape declined it instead of logging out
    assert!(socket
        .sent()
        .contains(&json!({"type": "friend_pong_decline", "inviteId": "i9"})));
    assert!(!app.is_running());
}

// ============================================================================
// Matches
// ============================================================================

#[tokio::test]
async fn test_ready_check_enters_live_game() {
    let (app, _, socket) = in_game(false).await;
    assert!(socket
        .sent()
        .contains(&json!({"type": "pong_player_ready", "gameId": "g1"})));
    assert_eq!(
        app.surface().stack().as_slice(),
        &[WindowId::Login, WindowId::Dashboard, WindowId::LiveGame]
    );
}

#[tokio::test]
async fn test_opponent_ready_first_then_local_ready() {
    let (mut app, _, _) = signed_in().await;
    deliver(&mut app, match_start()).await;
    deliver(&mut app, ready_update(7)).await;

    assert_eq!(app.surface().active(), WindowId::ReadyCheck);
    assert_eq!(
        label_text(&app, app.screens().ready.opponent),
        "Opponent: ready"
    );

    press(&mut app, Key::Enter).await;
    assert_eq!(app.surface().active(), WindowId::LiveGame);
}

#[tokio::test]
async fn test_escape_from_invited_ready_check_declines_and_unwinds() {
    let (mut app, _, socket) = signed_in().await;
    deliver(&mut app, invite("i1")).await;
    press(&mut app, Key::Enter).await;
    deliver(&mut app, match_start()).await;
    assert_eq!(
        app.surface().stack().as_slice(),
        &[
            WindowId::Login,
            WindowId::Dashboard,
            WindowId::InviteOverlay,
            WindowId::ReadyCheck
        ]
    );

    press(&mut app, Key::Escape).await;

    assert_eq!(app.surface().active(), WindowId::Dashboard);
    assert_eq!(
        socket.last_sent(),
        Some(json!({"type": "friend_pong_decline", "inviteId": "i1"}))
    );
    assert!(app.session().game_id().is_none());
    assert!(app.session().invite.is_none());
}

#[tokio::test]
async fn test_own_ready_update_is_ignored() {
    let (mut app, _, _) = signed_in().await;
    deliver(&mut app, match_start()).await;
    press(&mut app, Key::Enter).await;
    deliver(&mut app, ready_update(12)).await;
    assert_eq!(app.surface().active(), WindowId::ReadyCheck);
}

#[tokio::test]
async fn test_ready_button_hidden_until_next_match() {
    let (mut app, _, _) = signed_in().await;
    deliver(&mut app, match_start()).await;
    let button = app.screens().ready.button;
    assert!(!app.surface().component(button).is_hidden());

    press(&mut app, Key::Enter).await;
    assert!(app.surface().component(button).is_hidden());
    assert_eq!(label_text(&app, app.screens().ready.local), "You: ready");

    press(&mut app, Key::Escape).await;
    assert_eq!(app.surface().active(), WindowId::Dashboard);
    deliver(&mut app, match_start()).await;
    assert!(!app.surface().component(button).is_hidden());
}

#[tokio::test]
async fn test_game_over_keeps_last_live_frame() {
    let (mut app, _, _) = in_game(false).await;
    let frame = |left: i64, over: bool| {
        json!({
            "type": "friend_pong_state",
            "state": {
                "ballX": 400, "ballY": 200, "ballVX": 3, "ballVY": -2,
                "leftPaddleY": 200, "rightPaddleY": 200,
                "leftScore": left, "rightScore": 2, "gameOver": over
            }
        })
    };

    deliver(&mut app, frame(1, false)).await;
    deliver(&mut app, frame(5, true)).await;
    deliver(&mut app, frame(6, false)).await;

    let game = &app.session().game;
    assert!(game.game_over());
    assert_eq!(game.final_score, Some((5, 2)));
    assert_eq!(game.last_frame.as_ref().map(|s| s.left_score), Some(1));

    // One repaint: the result banner over the last live frame
    app.surface_mut().writer_mut().clear();
    assert_ok!(app.run(futures::stream::iter(Vec::<std::io::Result<Event>>::new())).await);
    let painted = visible_text(app.surface_mut().writer_mut());
    assert!(painted.contains("Youwon5-2"), "painted: {painted}");
}

#[tokio::test]
async fn test_opponent_disconnect_unwinds_invited_match() {
    let (mut app, _, socket) = in_game(true).await;
    assert!(socket
        .sent()
        .contains(&json!({"type": "friend_pong_accept", "inviteId": "i1"})));

    deliver(&mut app, json!({"type": "opponent_disconnected", "gameId": "g1"})).await;

    assert_eq!(app.surface().active(), WindowId::Dashboard);
    assert_eq!(
        label_text(&app, app.screens().dashboard.status),
        "Your opponent disconnected."
    );
    assert!(app.session().game_id().is_none());
}

#[tokio::test]
async fn test_paddle_input_is_edge_triggered() {
    let (mut app, _, socket) = in_game(false).await;
    let paddle = |up: bool, down: bool| {
        json!({"type": "simple_pong_input", "gameId": "g1", "input": {"up": up, "down": down}})
    };
    let before = socket.sent().len();

    press(&mut app, Key::Up).await;
    press(&mut app, Key::Up).await;
    app.handle_key(KeyInput::release(Key::Up)).await.unwrap();

    let sent = socket.sent()[before..].to_vec();
    assert_eq!(sent, vec![paddle(true, false), paddle(false, false)]);
}

#[tokio::test]
async fn test_escape_leaves_game() {
    let (mut app, _, _) = in_game(false).await;
    press(&mut app, Key::Escape).await;
    assert_eq!(app.surface().active(), WindowId::Dashboard);
    assert!(app.is_running());
}
