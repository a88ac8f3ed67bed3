//! Components
//!
//! The four things a window is made of. Each component carries its own
//! position, visibility and repaint bookkeeping; what it draws lives in
//! [`ComponentKind`].

use std::borrow::Cow;

use unicode_width::UnicodeWidthStr;

use crate::geometry::Aabb;
use crate::screens::Action;

/// Glyph set of a frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BorderGlyphs {
    pub top: char,
    pub bottom: char,
    pub left: char,
    pub right: char,
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
}

// ============================================================================
// Kinds
// ============================================================================

/// Static text, optionally word-wrapped
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub(crate) text: String,
    pub(crate) wrap: Option<u16>,
}

impl Label {
    /// Lines as painted: explicit breaks first, then wrapping
    #[must_use]
    pub fn lines(&self) -> Vec<Cow<'_, str>> {
        let mut lines = Vec::new();
        for line in self.text.split('\n') {
            match self.wrap {
                Some(width) if width > 0 && line.width() > usize::from(width) => {
                    lines.extend(textwrap::wrap(line, usize::from(width)));
                }
                _ => lines.push(Cow::Borrowed(line)),
            }
        }
        lines
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Single-line editable text
#[derive(Clone, Debug, PartialEq)]
pub struct TextField {
    pub(crate) text: String,
    pub(crate) capacity: usize,
    pub(crate) hint: String,
    pub(crate) masked: bool,
    /// Content cells currently on screen
    pub(crate) last_drawn: usize,
    /// Whether the hint, rather than content, is on screen
    pub(crate) hint_visible: bool,
}

impl TextField {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a printable ASCII character if there is room
    pub fn push(&mut self, c: char) -> bool {
        if self.text.len() >= self.capacity || !(c.is_ascii_graphic() || c == ' ') {
            return false;
        }
        self.text.push(c);
        true
    }

    pub fn pop(&mut self) -> bool {
        self.text.pop().is_some()
    }

    /// Replace the content, dropping anything past capacity
    pub fn set_text(&mut self, text: &str) {
        self.text = text
            .chars()
            .filter(|c| c.is_ascii_graphic() || *c == ' ')
            .take(self.capacity)
            .collect();
    }

    /// What the field shows for its current content
    #[must_use]
    pub fn display(&self) -> Cow<'_, str> {
        if self.masked {
            Cow::Owned(crate::theme::MASK_GLYPH.to_string().repeat(self.text.len()))
        } else {
            Cow::Borrowed(&self.text)
        }
    }
}

/// Rectangular frame
#[derive(Clone, Debug, PartialEq)]
pub struct BoxFrame {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) glyphs: BorderGlyphs,
}

/// Focusable text that triggers an [`Action`]
#[derive(Clone, Debug, PartialEq)]
pub struct Button {
    pub(crate) text: String,
    pub(crate) action: Action,
    pub(crate) pressed: bool,
}

impl Button {
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ComponentKind {
    Label(Label),
    TextField(TextField),
    Box(BoxFrame),
    Button(Button),
}

// ============================================================================
// Component
// ============================================================================

/// One positioned element of a window
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    pub x: u16,
    pub y: u16,
    pub kind: ComponentKind,
    pub(crate) dirty: bool,
    /// Repaint everything rather than the incremental difference
    pub(crate) full_redraw: bool,
    pub(crate) hidden: bool,
    /// Footprint left on screen by the last paint
    pub(crate) painted: Option<Aabb>,
}

impl Component {
    fn new(x: u16, y: u16, kind: ComponentKind) -> Self {
        Self {
            x,
            y,
            kind,
            dirty: true,
            full_redraw: true,
            hidden: false,
            painted: None,
        }
    }

    #[must_use]
    pub fn label(x: u16, y: u16, text: impl Into<String>) -> Self {
        Self::new(
            x,
            y,
            ComponentKind::Label(Label {
                text: text.into(),
                wrap: None,
            }),
        )
    }

    /// A label that word-wraps at `width` cells
    #[must_use]
    pub fn wrapped_label(x: u16, y: u16, width: u16, text: impl Into<String>) -> Self {
        Self::new(
            x,
            y,
            ComponentKind::Label(Label {
                text: text.into(),
                wrap: Some(width),
            }),
        )
    }

    #[must_use]
    pub fn text_field(x: u16, y: u16, capacity: usize, hint: impl Into<String>) -> Self {
        Self::new(
            x,
            y,
            ComponentKind::TextField(TextField {
                text: String::new(),
                capacity,
                hint: hint.into(),
                masked: false,
                last_drawn: 0,
                hint_visible: false,
            }),
        )
    }

    /// Mask the content of a text field; no effect on other kinds
    #[must_use]
    pub fn masked(mut self) -> Self {
        if let ComponentKind::TextField(field) = &mut self.kind {
            field.masked = true;
        }
        self
    }

    #[must_use]
    pub fn boxed(x: u16, y: u16, w: u16, h: u16, glyphs: BorderGlyphs) -> Self {
        Self::new(x, y, ComponentKind::Box(BoxFrame { w, h, glyphs }))
    }

    #[must_use]
    pub fn button(x: u16, y: u16, text: impl Into<String>, action: Action) -> Self {
        Self::new(
            x,
            y,
            ComponentKind::Button(Button {
                text: text.into(),
                action,
                pressed: false,
            }),
        )
    }

    /// Text fields and buttons take focus while visible
    #[must_use]
    pub fn is_focusable(&self) -> bool {
        !self.hidden
            && matches!(
                self.kind,
                ComponentKind::TextField(_) | ComponentKind::Button(_)
            )
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Cells the component covers with its current content
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        match &self.kind {
            ComponentKind::Label(label) => {
                let lines = label.lines();
                let w = lines.iter().map(|l| l.width()).max().unwrap_or(0);
                Aabb::new(self.x, self.y, clamp_u16(w), clamp_u16(lines.len().max(1)))
            }
            ComponentKind::TextField(field) => {
                let w = field.capacity.max(field.hint.width());
                Aabb::new(self.x, self.y, clamp_u16(w), 1)
            }
            ComponentKind::Box(frame) => Aabb::new(self.x, self.y, frame.w, frame.h),
            ComponentKind::Button(button) => {
                Aabb::new(self.x, self.y, clamp_u16(button.text.width()), 1)
            }
        }
    }

    /// Schedule a repaint; `full` discards the incremental path
    pub fn mark_dirty(&mut self, full: bool) {
        self.dirty = true;
        self.full_redraw |= full;
    }

    #[must_use]
    pub fn as_text_field(&self) -> Option<&TextField> {
        match &self.kind {
            ComponentKind::TextField(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_text_field_mut(&mut self) -> Option<&mut TextField> {
        match &mut self.kind {
            ComponentKind::TextField(field) => Some(field),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_button(&self) -> Option<&Button> {
        match &self.kind {
            ComponentKind::Button(button) => Some(button),
            _ => None,
        }
    }
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_label_wraps_and_breaks() {
        let label = Component::wrapped_label(0, 0, 10, "one two three four\nfive");
        let ComponentKind::Label(inner) = &label.kind else {
            panic!("not a label");
        };
        assert_eq!(inner.lines(), vec!["one two", "three four", "five"]);
        assert_eq!(label.bounding_box(), Aabb::new(0, 0, 10, 3));
    }

    #[test]
    fn test_text_field_capacity_and_filter() {
        let mut c = Component::text_field(0, 0, 3, "");
        let field = c.as_text_field_mut().unwrap();
        assert!(field.push('a'));
        assert!(!field.push('\u{7f}'));
        assert!(!field.push('é'));
        assert!(field.push(' '));
        assert!(field.push('c'));
        assert!(!field.push('d'));
        assert_eq!(field.text(), "a c");
        assert!(field.pop());
        assert_eq!(field.text(), "a ");
    }

    #[test]
    fn test_masked_display() {
        let mut c = Component::text_field(0, 0, 8, "password").masked();
        c.as_text_field_mut().unwrap().set_text("hunter2");
        assert_eq!(c.as_text_field().unwrap().display(), "*******");
    }

    #[test]
    fn test_focusable_kinds() {
        assert!(Component::text_field(0, 0, 4, "").is_focusable());
        assert!(Component::button(0, 0, "[ ok ]", Action::Back).is_focusable());
        assert!(!Component::label(0, 0, "x").is_focusable());
        assert!(!Component::boxed(0, 0, 3, 3, crate::theme::FIELD_BORDER).is_focusable());
    }
}
