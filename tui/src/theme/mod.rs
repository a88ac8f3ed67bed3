//! Theme and Glyphs
//!
//! Every glyph the client paints lives here, so swapping the look of the
//! forms or the arena is a one-file change.

use crate::surface::BorderGlyphs;

// ============================================================================
// Forms
// ============================================================================

/// Plain ASCII frame used around text fields
pub const FIELD_BORDER: BorderGlyphs = BorderGlyphs {
    top: '-',
    bottom: '-',
    left: '|',
    right: '|',
    top_left: '+',
    top_right: '+',
    bottom_left: '+',
    bottom_right: '+',
};

/// Frame around overlays
pub const OVERLAY_BORDER: BorderGlyphs = BorderGlyphs {
    top: '─',
    bottom: '─',
    left: '│',
    right: '│',
    top_left: '┌',
    top_right: '┐',
    bottom_left: '└',
    bottom_right: '┘',
};

/// Shown in place of each character of a masked field
pub const MASK_GLYPH: char = '*';

// ============================================================================
// Arena
// ============================================================================

/// Fully covered paddle/ball cell
pub const FULL_BLOCK: &str = "█";

/// Paddle end covering the top half of a cell
pub const UPPER_HALF_BLOCK: &str = "▀";

/// Paddle end covering the bottom half of a cell
pub const LOWER_HALF_BLOCK: &str = "▄";

/// Centre line dash
pub const NET_GLYPH: &str = "╎";
