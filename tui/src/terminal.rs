//! Terminal Guard
//!
//! Raw mode, the alternate screen and a hidden cursor for as long as the
//! guard lives. Dropping it, or panicking, puts the terminal back.

use std::io::{self, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, window_size,
    EnterAlternateScreen, LeaveAlternateScreen,
};

use crate::surface::DEFAULT_CELL_ASPECT;

/// Restores the terminal on drop
pub struct TerminalGuard {
    /// Key release reporting was requested and must be popped
    enhanced_keys: bool,
}

impl TerminalGuard {
    /// Take over the terminal
    ///
    /// # Errors
    ///
    /// Returns an error when raw mode or the alternate screen cannot be
    /// entered; whatever was already switched on is restored first.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();
        enable_raw_mode()?;
        let mut guard = Self {
            enhanced_keys: false,
        };

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide)?;

        // Release events let held paddle keys end precisely
        if supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            guard.enhanced_keys = true;
        }
        tracing::info!(enhanced_keys = guard.enhanced_keys, "Terminal ready");
        Ok(guard)
    }

    /// Whether the terminal reports key releases
    #[must_use]
    pub fn reports_releases(&self) -> bool {
        self.enhanced_keys
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if self.enhanced_keys {
            let _ = execute!(stdout, PopKeyboardEnhancementFlags);
        }
        restore(&mut stdout);
    }
}

fn restore(stdout: &mut io::Stdout) {
    let _ = execute!(stdout, Show, LeaveAlternateScreen);
    let _ = disable_raw_mode();
    let _ = stdout.flush();
}

fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let mut stdout = io::stdout();
        let _ = execute!(stdout, PopKeyboardEnhancementFlags);
        restore(&mut stdout);
        original_hook(panic_info);
    }));
}

/// Width of a cell divided by its height.
///
/// Uses the pixel size the terminal reports; falls back to
/// [`DEFAULT_CELL_ASPECT`] when it reports none.
#[must_use]
pub fn measure_cell_aspect() -> f32 {
    match window_size() {
        Ok(size) if size.width > 0 && size.height > 0 && size.columns > 0 && size.rows > 0 => {
            let cell_w = f32::from(size.width) / f32::from(size.columns);
            let cell_h = f32::from(size.height) / f32::from(size.rows);
            cell_w / cell_h
        }
        _ => DEFAULT_CELL_ASPECT,
    }
}
