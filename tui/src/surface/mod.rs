//! Surface Engine
//!
//! Retained-mode window system over a raw terminal writer.
//!
//! # Architecture
//!
//! ```text
//! WindowStack ──top──▶ Window registry [WindowId; 8]
//!                          │
//!                          ▼
//!                      Components ──paint──▶ W: Write (queued crossterm commands)
//! ```
//!
//! Mutations only mark components dirty. [`Surface::redraw`] then paints
//! the dirty components of the top window, or clears the screen and paints
//! all of them after a window switch or resize.

mod component;
pub mod focus;
mod paint;
mod window;

use std::io::{self, Write};

use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

pub use component::{BorderGlyphs, BoxFrame, Button, Component, ComponentKind, Label, TextField};
pub use window::{ComponentId, Window, WindowId, WindowStack, MAX_COMPONENTS};

use crate::geometry::Direction;
use crate::screens::Action;

/// Cell aspect ratio assumed when the terminal cannot report pixel sizes
pub const DEFAULT_CELL_ASPECT: f32 = 0.5;

/// The window system bound to one output
pub struct Surface<W: Write> {
    out: W,
    windows: [Window; WindowId::COUNT],
    stack: WindowStack,
    size: (u16, u16),
    cell_aspect: f32,
    needs_clear: bool,
}

impl<W: Write> Surface<W> {
    /// Start on `root` with an empty registry
    pub fn new(out: W, root: WindowId, size: (u16, u16), cell_aspect: f32) -> Self {
        Self {
            out,
            windows: std::array::from_fn(|_| Window::default()),
            stack: WindowStack::new(root),
            size,
            cell_aspect,
            needs_clear: true,
        }
    }

    // ========================================================================
    // Windows
    // ========================================================================

    #[must_use]
    pub fn active(&self) -> WindowId {
        self.stack.top()
    }

    #[must_use]
    pub fn stack(&self) -> &WindowStack {
        &self.stack
    }

    #[must_use]
    pub fn window(&self, id: WindowId) -> &Window {
        &self.windows[id.index()]
    }

    pub fn window_mut(&mut self, id: WindowId) -> &mut Window {
        &mut self.windows[id.index()]
    }

    pub fn push(&mut self, id: WindowId) {
        tracing::debug!(window = id.name(), "Push window");
        self.stack.push(id);
        self.needs_clear = true;
    }

    pub fn replace(&mut self, id: WindowId) {
        tracing::debug!(from = self.active().name(), to = id.name(), "Replace window");
        self.stack.replace(id);
        self.needs_clear = true;
    }

    /// Pop the top window; `None` at the root
    pub fn pop(&mut self) -> Option<WindowId> {
        let top = self.stack.pop()?;
        tracing::debug!(window = top.name(), "Pop to window");
        self.needs_clear = true;
        Some(top)
    }

    // ========================================================================
    // Components
    // ========================================================================

    /// Add a component to `window`
    pub fn add(&mut self, window: WindowId, component: Component) -> ComponentId {
        let index = self.window_mut(window).add(component);
        ComponentId { window, index }
    }

    /// A text field inside a `(capacity + 2) × 3` frame whose corner is at `(x, y)`
    pub fn add_boxed_field(
        &mut self,
        window: WindowId,
        x: u16,
        y: u16,
        field: Component,
        glyphs: BorderGlyphs,
    ) -> ComponentId {
        let capacity = field.as_text_field().map_or(0, TextField::capacity);
        let width = u16::try_from(capacity + 2).unwrap_or(u16::MAX);
        self.add(window, Component::boxed(x, y, width, 3, glyphs));
        let mut field = field;
        field.x = x + 1;
        field.y = y + 1;
        self.add(window, field)
    }

    /// # Panics
    ///
    /// Panics on an id not produced by [`Surface::add`].
    #[must_use]
    pub fn component(&self, id: ComponentId) -> &Component {
        &self.window(id.window).components()[id.index]
    }

    fn component_mut(&mut self, id: ComponentId) -> &mut Component {
        &mut self.window_mut(id.window).components_mut()[id.index]
    }

    /// Replace the text of a label, button or text field
    pub fn set_text(&mut self, id: ComponentId, text: &str) {
        let component = self.component_mut(id);
        match &mut component.kind {
            ComponentKind::Label(label) => {
                if label.text == text {
                    return;
                }
                label.text = text.to_string();
            }
            ComponentKind::Button(button) => {
                if button.text == text {
                    return;
                }
                button.text = text.to_string();
            }
            ComponentKind::TextField(field) => {
                if field.text == text {
                    return;
                }
                field.set_text(text);
            }
            ComponentKind::Box(_) => return,
        }
        component.mark_dirty(true);
    }

    /// Content of a text field, empty for other kinds
    #[must_use]
    pub fn field_text(&self, id: ComponentId) -> &str {
        self.component(id).as_text_field().map_or("", TextField::text)
    }

    pub fn clear_field(&mut self, id: ComponentId) {
        self.set_text(id, "");
    }

    pub fn set_hidden(&mut self, id: ComponentId, hidden: bool) {
        let component = self.component_mut(id);
        if component.hidden != hidden {
            component.hidden = hidden;
            component.mark_dirty(true);
            self.window_mut(id.window).repair_focus();
        }
    }

    pub fn hide(&mut self, id: ComponentId) {
        self.set_hidden(id, true);
    }

    pub fn show(&mut self, id: ComponentId) {
        self.set_hidden(id, false);
    }

    pub fn set_pressed(&mut self, id: ComponentId, pressed: bool) {
        let component = self.component_mut(id);
        if let ComponentKind::Button(button) = &mut component.kind {
            if button.pressed != pressed {
                button.pressed = pressed;
                component.mark_dirty(true);
            }
        }
    }

    pub fn set_focus(&mut self, id: ComponentId) {
        self.window_mut(id.window).set_focus(Some(id.index));
    }

    // ========================================================================
    // Focus and editing
    // ========================================================================

    /// Focused component of the active window
    #[must_use]
    pub fn focused(&self) -> Option<ComponentId> {
        let window = self.active();
        self.window(window)
            .focused()
            .map(|index| ComponentId { window, index })
    }

    /// Action of the focused button, if a button is focused
    #[must_use]
    pub fn focused_action(&self) -> Option<Action> {
        let id = self.focused()?;
        self.component(id).as_button().map(Button::action)
    }

    #[must_use]
    pub fn focused_is_text_field(&self) -> bool {
        self.focused()
            .is_some_and(|id| self.component(id).as_text_field().is_some())
    }

    /// Move focus in the active window; returns whether it moved
    pub fn move_focus(&mut self, dir: Direction) -> bool {
        let ratio = self.cell_aspect;
        let window = self.window_mut(self.stack.top());
        let Some(current) = window.focused() else {
            return false;
        };
        match focus::find_best_component(window.components(), current, dir, ratio) {
            Some(next) => {
                window.set_focus(Some(next));
                true
            }
            None => false,
        }
    }

    /// Type into the focused text field
    pub fn type_char(&mut self, c: char) -> bool {
        self.edit_focused(|field| field.push(c))
    }

    /// Delete the last character of the focused text field
    pub fn backspace(&mut self) -> bool {
        self.edit_focused(TextField::pop)
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut TextField) -> bool) -> bool {
        let Some(id) = self.focused() else {
            return false;
        };
        let component = self.component_mut(id);
        let changed = component.as_text_field_mut().is_some_and(edit);
        if changed {
            component.mark_dirty(false);
        }
        changed
    }

    // ========================================================================
    // Output
    // ========================================================================

    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    #[must_use]
    pub fn cell_aspect(&self) -> f32 {
        self.cell_aspect
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.size = (cols, rows);
        self.needs_clear = true;
    }

    /// Whether the next redraw starts from a cleared screen
    #[must_use]
    pub fn needs_clear(&self) -> bool {
        self.needs_clear
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Paint the active window and flush.
    ///
    /// After a window switch or resize, or with `force`, the screen is
    /// cleared and every component repainted.
    pub fn redraw(&mut self, force: bool) -> io::Result<()> {
        let full = force || self.needs_clear;
        self.needs_clear = false;
        if full {
            queue!(self.out, Clear(ClearType::All))?;
        }

        let window = &mut self.windows[self.stack.top().index()];
        let focused = window.focused();
        for (index, component) in window.components_mut().iter_mut().enumerate() {
            paint::paint(&mut self.out, component, focused == Some(index), full)?;
        }
        self.out.flush()
    }
}
