//! Live Game Renderer
//!
//! The server streams arena snapshots in logical units. Each snapshot is
//! scaled into the largest viewport with the arena's visual proportions,
//! drawn into a `ratatui` [`Buffer`], and only the cells that differ from
//! the previous frame are written out.
//!
//! # Sub-cell precision
//!
//! - Paddles: full blocks, with a half block at either end when the paddle
//!   covers only part of that cell
//! - Ball: every cell whose centre satisfies the ellipse inequality, and
//!   always the cell under the ball's centre

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use pongterm_core::messages::GameState;

use crate::theme::{FULL_BLOCK, LOWER_HALF_BLOCK, NET_GLYPH, UPPER_HALF_BLOCK};

// ============================================================================
// Arena constants (logical units)
// ============================================================================

pub const ARENA_WIDTH: f32 = 800.0;
pub const ARENA_HEIGHT: f32 = 400.0;
pub const PADDLE_HEIGHT: f32 = 80.0;
/// Distance from the ball's centre to its edge
pub const BALL_SIZE: f32 = 10.0;

/// The arena at rest: ball and paddles centred, no score
#[must_use]
pub fn resting_state() -> GameState {
    GameState {
        ball_x: f64::from(ARENA_WIDTH / 2.0),
        ball_y: f64::from(ARENA_HEIGHT / 2.0),
        left_paddle_y: f64::from(ARENA_HEIGHT / 2.0),
        right_paddle_y: f64::from(ARENA_HEIGHT / 2.0),
        left_score: 0,
        right_score: 0,
        game_over: false,
    }
}

/// Coverage above which a paddle end gets a full block
const FULL_COVERAGE: f32 = 0.75;
/// Coverage above which a paddle end gets a half block
const HALF_COVERAGE: f32 = 0.25;

// ============================================================================
// Layout
// ============================================================================

/// Where the arena lands on screen and how logical units map to cells
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArenaLayout {
    pub area: Rect,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl ArenaLayout {
    /// Fit the arena into `bounds`, centred, keeping its visual proportions.
    ///
    /// `cell_aspect` is a cell's width divided by its height.
    #[must_use]
    pub fn fit(bounds: Rect, cell_aspect: f32) -> Self {
        let aspect = if cell_aspect > 0.0 { cell_aspect } else { 0.5 };
        let max_w = f32::from(bounds.width);
        let max_h = f32::from(bounds.height);

        let mut w = max_w;
        let mut h = w * aspect * ARENA_HEIGHT / ARENA_WIDTH;
        if h > max_h {
            h = max_h;
            w = h * ARENA_WIDTH / (ARENA_HEIGHT * aspect);
        }

        let width = to_cells(w).clamp(1, bounds.width.max(1));
        let height = to_cells(h).clamp(1, bounds.height.max(1));
        let area = Rect::new(
            bounds.x + bounds.width.saturating_sub(width) / 2,
            bounds.y + bounds.height.saturating_sub(height) / 2,
            width,
            height,
        );
        Self {
            area,
            scale_x: f32::from(width) / ARENA_WIDTH,
            scale_y: f32::from(height) / ARENA_HEIGHT,
        }
    }
}

fn to_cells(v: f32) -> u16 {
    // Saturating float-to-int cast
    v.floor() as u16
}

// ============================================================================
// Widget
// ============================================================================

/// One arena snapshot, paintable into a buffer
pub struct ArenaWidget<'a> {
    pub state: &'a GameState,
    pub layout: ArenaLayout,
}

impl Widget for ArenaWidget<'_> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let area = self.layout.area.intersection(buf.area);
        if area.is_empty() {
            return;
        }

        // Net
        let net_x = area.x + area.width / 2;
        for y in (area.y..area.bottom()).step_by(2) {
            put(buf, net_x, y, NET_GLYPH);
        }

        draw_paddle(buf, area, self.layout.scale_y, area.x, self.state.left_paddle_y);
        draw_paddle(
            buf,
            area,
            self.layout.scale_y,
            area.right() - 1,
            self.state.right_paddle_y,
        );
        draw_ball(buf, area, self.layout, self.state.ball_x, self.state.ball_y);
    }
}

fn put(buf: &mut Buffer, x: u16, y: u16, symbol: &str) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_symbol(symbol);
    }
}

/// Paddle centred on `center_y` (logical units) in column `x`
fn draw_paddle(buf: &mut Buffer, area: Rect, scale_y: f32, x: u16, center_y: f64) {
    let center = center_y as f32 * scale_y;
    let half = PADDLE_HEIGHT / 2.0 * scale_y;
    let top = (center - half).max(0.0);
    let bottom = (center + half).min(f32::from(area.height));

    let mut row = top.floor();
    while row < bottom {
        let coverage = bottom.min(row + 1.0) - top.max(row);
        let symbol = if coverage > FULL_COVERAGE {
            Some(FULL_BLOCK)
        } else if coverage > HALF_COVERAGE {
            // Partial at the top end covers the lower half of the cell
            Some(if top > row { LOWER_HALF_BLOCK } else { UPPER_HALF_BLOCK })
        } else {
            None
        };
        if let Some(symbol) = symbol {
            put(buf, x, area.y + row as u16, symbol);
        }
        row += 1.0;
    }
}

fn draw_ball(buf: &mut Buffer, area: Rect, layout: ArenaLayout, ball_x: f64, ball_y: f64) {
    let cx = ball_x as f32 * layout.scale_x;
    let cy = ball_y as f32 * layout.scale_y;
    let rx = (BALL_SIZE * layout.scale_x).max(f32::EPSILON);
    let ry = (BALL_SIZE * layout.scale_y).max(f32::EPSILON);
    let width = f32::from(area.width);
    let height = f32::from(area.height);

    let center_cell = (cx.clamp(0.0, width - 1.0), cy.clamp(0.0, height - 1.0));
    put(
        buf,
        area.x + center_cell.0 as u16,
        area.y + center_cell.1 as u16,
        FULL_BLOCK,
    );

    let x0 = (cx - rx).floor().max(0.0);
    let x1 = (cx + rx).ceil().min(width);
    let y0 = (cy - ry).floor().max(0.0);
    let y1 = (cy + ry).ceil().min(height);

    let mut row = y0;
    while row < y1 {
        let mut col = x0;
        while col < x1 {
            let dx = (col + 0.5 - cx) / rx;
            let dy = (row + 0.5 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                put(buf, area.x + col as u16, area.y + row as u16, FULL_BLOCK);
            }
            col += 1.0;
        }
        row += 1.0;
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Frame-to-frame painter for the live game screen
#[derive(Debug, Default)]
pub struct ArenaRenderer {
    previous: Option<Buffer>,
}

impl ArenaRenderer {
    /// Forget the previous frame; the next draw clears and repaints
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Compose the full screen for one snapshot
    #[must_use]
    pub fn compose(
        size: (u16, u16),
        cell_aspect: f32,
        state: &GameState,
        banner: &str,
    ) -> Buffer {
        let screen = Rect::new(0, 0, size.0, size.1);
        let mut buf = Buffer::empty(screen);
        if screen.is_empty() {
            return buf;
        }

        let score = format!("{}  :  {}", state.left_score, state.right_score);
        let score_x = screen.width.saturating_sub(score.len() as u16) / 2;
        buf.set_string(score_x, 0, &score, Style::default());

        let arena_bounds = Rect::new(0, 1, screen.width, screen.height.saturating_sub(2));
        if !arena_bounds.is_empty() {
            let layout = ArenaLayout::fit(arena_bounds, cell_aspect);
            ArenaWidget { state, layout }.render(layout.area, &mut buf);
        }

        if screen.height > 1 {
            buf.set_string(0, screen.height - 1, banner, Style::default());
        }
        buf
    }

    /// Paint one snapshot, writing only cells that changed
    pub fn draw<W: Write>(
        &mut self,
        out: &mut W,
        size: (u16, u16),
        cell_aspect: f32,
        state: &GameState,
        banner: &str,
    ) -> io::Result<()> {
        let next = Self::compose(size, cell_aspect, state, banner);

        let base = match self.previous.take() {
            Some(previous) if previous.area == next.area => previous,
            _ => {
                queue!(out, Clear(ClearType::All))?;
                Buffer::empty(next.area)
            }
        };

        for (x, y, cell) in base.diff(&next) {
            queue!(out, MoveTo(x, y), Print(cell.symbol()))?;
        }
        self.previous = Some(next);
        out.flush()
    }
}
