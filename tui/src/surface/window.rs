//! Windows and the Window Stack
//!
//! Every window the client can show is known up front and lives in a fixed
//! registry indexed by [`WindowId`]. Navigation is a stack of ids: the top
//! is what is on screen.

use super::component::Component;

/// Upper bound on components per window
pub const MAX_COMPONENTS: usize = 100;

/// Registry slot of a window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WindowId {
    Login,
    Register,
    Dashboard,
    FriendsList,
    TournamentList,
    InviteOverlay,
    ReadyCheck,
    LiveGame,
}

impl WindowId {
    pub const COUNT: usize = 8;

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::Dashboard => "dashboard",
            Self::FriendsList => "friends",
            Self::TournamentList => "tournaments",
            Self::InviteOverlay => "invite",
            Self::ReadyCheck => "ready_check",
            Self::LiveGame => "live_game",
        }
    }
}

/// Handle to a component inside a window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentId {
    pub window: WindowId,
    pub index: usize,
}

/// Ordered components plus the focused one
#[derive(Debug, Default)]
pub struct Window {
    components: Vec<Component>,
    focused: Option<usize>,
}

impl Window {
    /// Append a component; the first focusable one takes focus
    ///
    /// # Panics
    ///
    /// Panics when the window already holds [`MAX_COMPONENTS`].
    pub fn add(&mut self, component: Component) -> usize {
        assert!(
            self.components.len() < MAX_COMPONENTS,
            "window component capacity ({MAX_COMPONENTS}) exceeded"
        );
        let index = self.components.len();
        if self.focused.is_none() && component.is_focusable() {
            self.focused = Some(index);
        }
        self.components.push(component);
        index
    }

    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [Component] {
        &mut self.components
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Component> {
        self.components.get_mut(index)
    }

    #[must_use]
    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    /// Move focus, marking both the old and new holder for a full repaint
    pub fn set_focus(&mut self, index: Option<usize>) {
        if index == self.focused {
            return;
        }
        for i in [self.focused, index].into_iter().flatten() {
            if let Some(c) = self.components.get_mut(i) {
                c.mark_dirty(true);
            }
        }
        self.focused = index;
    }

    /// Drop focus from a hidden component, handing it to the first focusable one
    pub(crate) fn repair_focus(&mut self) {
        let valid = self
            .focused
            .and_then(|i| self.components.get(i))
            .is_some_and(Component::is_focusable);
        if !valid {
            let next = self.components.iter().position(Component::is_focusable);
            self.set_focus(next);
        }
    }
}

/// Navigation history; never empty
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowStack {
    stack: Vec<WindowId>,
}

impl WindowStack {
    #[must_use]
    pub fn new(root: WindowId) -> Self {
        Self { stack: vec![root] }
    }

    #[must_use]
    pub fn top(&self) -> WindowId {
        // Never empty: pop refuses to remove the root
        self.stack[self.stack.len() - 1]
    }

    pub fn push(&mut self, id: WindowId) {
        self.stack.push(id);
    }

    /// Swap the top for `id`
    pub fn replace(&mut self, id: WindowId) {
        let last = self.stack.len() - 1;
        self.stack[last] = id;
    }

    /// Remove the top unless it is the root; returns the new top
    pub fn pop(&mut self) -> Option<WindowId> {
        if self.stack.len() <= 1 {
            return None;
        }
        self.stack.pop();
        Some(self.top())
    }

    #[must_use]
    pub fn contains(&self, id: WindowId) -> bool {
        self.stack.contains(&id)
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[WindowId] {
        &self.stack
    }
}
