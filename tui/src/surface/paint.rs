//! Component Painting
//!
//! Turns a component into terminal writes. Text fields repaint only the
//! cells that changed since their last paint; everything else repaints
//! whole, after erasing whatever footprint it left before.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute};
use unicode_width::UnicodeWidthStr;

use super::component::{BoxFrame, Button, Component, ComponentKind, Label, TextField};
use crate::geometry::Aabb;

/// Paint one component if it needs it.
///
/// `force` ignores the dirty flag and skips the incremental path; the
/// caller has already cleared the screen.
pub fn paint<W: Write>(
    out: &mut W,
    component: &mut Component,
    focused: bool,
    force: bool,
) -> io::Result<()> {
    if force {
        component.painted = None;
        if let ComponentKind::TextField(field) = &mut component.kind {
            field.last_drawn = 0;
            field.hint_visible = false;
        }
    } else if !component.dirty {
        return Ok(());
    }

    let full = force || component.full_redraw;
    component.dirty = false;
    component.full_redraw = false;

    if component.hidden {
        if let Some(area) = component.painted.take() {
            blank(out, area)?;
        }
        return Ok(());
    }

    let (x, y) = (component.x, component.y);
    let area = component.bounding_box();
    match &mut component.kind {
        ComponentKind::Label(label) => {
            if let Some(stale) = component.painted {
                blank(out, stale)?;
            }
            paint_label(out, x, y, label)?;
        }
        ComponentKind::TextField(field) => paint_text_field(out, x, y, field, full, focused)?,
        ComponentKind::Box(frame) => {
            if let Some(stale) = component.painted.filter(|p| *p != area) {
                blank(out, stale)?;
            }
            paint_box(out, x, y, frame)?;
        }
        ComponentKind::Button(button) => {
            if let Some(stale) = component.painted.filter(|p| p.w > area.w) {
                blank(out, stale)?;
            }
            paint_button(out, x, y, button, focused)?;
        }
    }
    component.painted = Some(area);
    Ok(())
}

/// Overwrite an area with spaces
pub fn blank<W: Write>(out: &mut W, area: Aabb) -> io::Result<()> {
    if area.w == 0 {
        return Ok(());
    }
    let spaces = " ".repeat(usize::from(area.w));
    for row in area.y..area.bottom() {
        queue!(out, MoveTo(area.x, row), Print(&spaces))?;
    }
    Ok(())
}

fn paint_label<W: Write>(out: &mut W, x: u16, y: u16, label: &Label) -> io::Result<()> {
    for (row, line) in (y..).zip(label.lines()) {
        queue!(out, MoveTo(x, row), Print(line))?;
    }
    Ok(())
}

fn paint_button<W: Write>(
    out: &mut W,
    x: u16,
    y: u16,
    button: &Button,
    focused: bool,
) -> io::Result<()> {
    queue!(out, MoveTo(x, y))?;
    if focused {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    if button.pressed {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    queue!(out, Print(&button.text), SetAttribute(Attribute::Reset))
}

fn paint_box<W: Write>(out: &mut W, x: u16, y: u16, frame: &BoxFrame) -> io::Result<()> {
    let BoxFrame { w, h, glyphs } = *frame;
    if w == 0 || h == 0 {
        return Ok(());
    }

    let horizontal = |left: char, fill: char, right: char| -> String {
        match w {
            1 => left.to_string(),
            _ => {
                let mut row = String::with_capacity(usize::from(w));
                row.push(left);
                row.extend(std::iter::repeat(fill).take(usize::from(w - 2)));
                row.push(right);
                row
            }
        }
    };

    queue!(
        out,
        MoveTo(x, y),
        Print(horizontal(glyphs.top_left, glyphs.top, glyphs.top_right))
    )?;
    for row in y + 1..y + h.saturating_sub(1) {
        queue!(out, MoveTo(x, row), Print(glyphs.left))?;
        if w > 1 {
            queue!(out, MoveTo(x + w - 1, row), Print(glyphs.right))?;
        }
    }
    if h > 1 {
        queue!(
            out,
            MoveTo(x, y + h - 1),
            Print(horizontal(
                glyphs.bottom_left,
                glyphs.bottom,
                glyphs.bottom_right
            ))
        )?;
    }
    Ok(())
}

/// Incremental text field paint.
///
/// Growth paints only the new suffix, shrinking blanks only the vacated
/// cells; a full paint rewrites content and pads over any leftover hint or
/// content.
fn paint_text_field<W: Write>(
    out: &mut W,
    x: u16,
    y: u16,
    field: &mut TextField,
    full: bool,
    focused: bool,
) -> io::Result<()> {
    let len = field.text.len();
    let hint_width = field.hint.width();

    if len == 0 {
        queue!(out, MoveTo(x, y))?;
        if focused {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        queue!(
            out,
            SetAttribute(Attribute::Dim),
            Print(&field.hint),
            SetAttribute(Attribute::Reset)
        )?;
        let stale = field.last_drawn.saturating_sub(hint_width);
        if stale > 0 {
            queue!(out, Print(" ".repeat(stale)))?;
        }
        field.last_drawn = 0;
        field.hint_visible = true;
        return Ok(());
    }

    let shown = field.display().into_owned();
    if full || field.hint_visible {
        queue!(out, MoveTo(x, y))?;
        if focused {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        queue!(out, Print(&shown), SetAttribute(Attribute::Reset))?;

        let covered = if field.hint_visible {
            hint_width.max(field.last_drawn)
        } else {
            field.last_drawn
        };
        let pad = covered.saturating_sub(len);
        if pad > 0 {
            queue!(out, Print(" ".repeat(pad)))?;
        }
    } else if len < field.last_drawn {
        queue!(
            out,
            SetAttribute(Attribute::Reset),
            MoveTo(x + cell_offset(len), y),
            Print(" ".repeat(field.last_drawn - len))
        )?;
    } else if len > field.last_drawn {
        queue!(out, MoveTo(x + cell_offset(field.last_drawn), y))?;
        if focused {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        queue!(
            out,
            Print(&shown[field.last_drawn..]),
            SetAttribute(Attribute::Reset)
        )?;
    }

    field.last_drawn = len;
    field.hint_visible = false;
    Ok(())
}

fn cell_offset(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
