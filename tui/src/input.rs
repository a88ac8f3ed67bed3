//! Keyboard Input
//!
//! Translates crossterm events into the handful of keys the client reacts
//! to, cleans up key-repeat artifacts, and tracks the held paddle
//! direction.

use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// How long a paddle key counts as held without a repeat, on terminals
/// that never report releases
pub const HOLD_TIMEOUT: Duration = Duration::from_millis(120);

/// Keys the client reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Escape,
    Enter,
    Backspace,
    Char(char),
    /// Ctrl-C; raw mode swallows the signal
    Interrupt,
}

impl Key {
    /// Up and Down steer the paddle during a live game
    #[must_use]
    pub fn is_paddle(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// A key going down or coming up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub pressed: bool,
}

impl KeyInput {
    #[must_use]
    pub fn press(key: Key) -> Self {
        Self { key, pressed: true }
    }

    #[must_use]
    pub fn release(key: Key) -> Self {
        Self {
            key,
            pressed: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Key(KeyInput),
    Resize(u16, u16),
}

/// Map a terminal event; `None` for anything the client ignores
#[must_use]
pub fn translate(event: &Event) -> Option<Input> {
    match event {
        Event::Key(key) => translate_key(key).map(Input::Key),
        Event::Resize(cols, rows) => Some(Input::Resize(*cols, *rows)),
        _ => None,
    }
}

fn translate_key(event: &KeyEvent) -> Option<KeyInput> {
    let key = match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Esc => Key::Escape,
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Char(c) if c == ' ' || c.is_ascii_graphic() => Key::Char(c),
        _ => return None,
    };
    let pressed = !matches!(event.kind, KeyEventKind::Release);
    Some(KeyInput { key, pressed })
}

/// Drop release-then-press pairs of a paddle key within one batch.
///
/// Only meaningful while a game is live: a held direction must not flicker
/// off between two reports of the same hold. Every other key is kept, so
/// fast typing of a doubled letter is never merged into one keystroke.
#[must_use]
pub fn coalesce_repeats(batch: Vec<Input>) -> Vec<Input> {
    let mut out = Vec::with_capacity(batch.len());
    let mut iter = batch.into_iter().peekable();
    while let Some(input) = iter.next() {
        if let Input::Key(KeyInput {
            key,
            pressed: false,
        }) = input
        {
            let repeated = key.is_paddle()
                && matches!(
                    iter.peek(),
                    Some(Input::Key(KeyInput { key: next, pressed: true })) if *next == key
                );
            if repeated {
                iter.next();
                continue;
            }
        }
        out.push(input);
    }
    out
}

// ============================================================================
// Paddle direction
// ============================================================================

/// Held up/down state for the live game
#[derive(Debug, Default)]
pub struct PaddleKeys {
    up: bool,
    down: bool,
    last_press: Option<Instant>,
    /// Set once the terminal has reported any release
    releases_seen: bool,
}

impl PaddleKeys {
    /// Apply a key; returns whether the held state changed
    pub fn apply(&mut self, input: KeyInput, now: Instant) -> bool {
        let before = self.state();
        match (input.key, input.pressed) {
            (Key::Up, true) => {
                self.up = true;
                if !self.releases_seen {
                    self.down = false;
                }
                self.last_press = Some(now);
            }
            (Key::Down, true) => {
                self.down = true;
                if !self.releases_seen {
                    self.up = false;
                }
                self.last_press = Some(now);
            }
            (Key::Up, false) => {
                self.releases_seen = true;
                self.up = false;
            }
            (Key::Down, false) => {
                self.releases_seen = true;
                self.down = false;
            }
            _ => {}
        }
        before != self.state()
    }

    /// Let go of keys whose repeats stopped; returns whether state changed.
    ///
    /// Only used until the terminal proves it reports releases.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.releases_seen {
            return false;
        }
        let stale = self
            .last_press
            .is_some_and(|at| now.duration_since(at) >= HOLD_TIMEOUT);
        if stale && (self.up || self.down) {
            self.up = false;
            self.down = false;
            self.last_press = None;
            return true;
        }
        false
    }

    /// `(up, down)`
    #[must_use]
    pub fn state(&self) -> (bool, bool) {
        (self.up, self.down)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
