//! Screen Layouts
//!
//! Builds every window of the registry once at startup and hands back the
//! ids of the components the session updates later.

use std::io::Write;

use crate::surface::{Component, ComponentId, Surface, WindowId};
use crate::theme::{FIELD_BORDER, OVERLAY_BORDER};

/// What a button does when activated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Login,
    OpenRegister,
    Register,
    OpenTournaments,
    OpenFriends,
    Logout,
    Back,
    AcceptInvite,
    DeclineInvite,
    Ready,
}

/// Action Enter triggers from a text field of `window`
#[must_use]
pub fn primary_action(window: WindowId) -> Option<Action> {
    match window {
        WindowId::Login => Some(Action::Login),
        WindowId::Register => Some(Action::Register),
        _ => None,
    }
}

pub const CREDENTIAL_CAPACITY: usize = 40;
pub const TOTP_CAPACITY: usize = 6;

pub struct LoginScreen {
    pub email: ComponentId,
    pub password: ComponentId,
    pub totp: ComponentId,
    pub error: ComponentId,
}

pub struct RegisterScreen {
    pub username: ComponentId,
    pub email: ComponentId,
    pub password: ComponentId,
    pub display_name: ComponentId,
    pub error: ComponentId,
}

pub struct DashboardScreen {
    pub welcome: ComponentId,
    pub status: ComponentId,
}

/// Tournament and friend lists share one layout
pub struct ListScreen {
    pub body: ComponentId,
}

pub struct InviteScreen {
    pub sender: ComponentId,
    pub expiry: ComponentId,
}

pub struct ReadyScreen {
    pub info: ComponentId,
    pub opponent: ComponentId,
    pub local: ComponentId,
    /// Hidden once the local player has confirmed
    pub button: ComponentId,
}

/// Handles to every component the session touches after building
pub struct Screens {
    pub login: LoginScreen,
    pub register: RegisterScreen,
    pub dashboard: DashboardScreen,
    pub tournaments: ListScreen,
    pub friends: ListScreen,
    pub invite: InviteScreen,
    pub ready: ReadyScreen,
}

impl Screens {
    /// Lay out all windows on `surface`
    pub fn build<W: Write>(surface: &mut Surface<W>) -> Self {
        Self {
            login: build_login(surface),
            register: build_register(surface),
            dashboard: build_dashboard(surface),
            tournaments: build_list(surface, WindowId::TournamentList, "Tournaments"),
            friends: build_list(surface, WindowId::FriendsList, "Friends"),
            invite: build_invite(surface),
            ready: build_ready(surface),
        }
    }

    /// Every password field, cleared on logout
    #[must_use]
    pub fn password_fields(&self) -> [ComponentId; 2] {
        [self.login.password, self.register.password]
    }
}

fn build_login<W: Write>(s: &mut Surface<W>) -> LoginScreen {
    let w = WindowId::Login;
    s.add(w, Component::label(4, 1, "pongterm :: sign in"));
    let email = s.add_boxed_field(
        w,
        4,
        3,
        Component::text_field(0, 0, CREDENTIAL_CAPACITY, "email"),
        FIELD_BORDER,
    );
    let password = s.add_boxed_field(
        w,
        4,
        6,
        Component::text_field(0, 0, CREDENTIAL_CAPACITY, "password").masked(),
        FIELD_BORDER,
    );
    // Centred under the credential fields
    let totp = s.add_boxed_field(
        w,
        21,
        9,
        Component::text_field(0, 0, TOTP_CAPACITY, "2fa").masked(),
        FIELD_BORDER,
    );
    s.add(w, Component::button(14, 14, "[ Log in ]", Action::Login));
    s.add(w, Component::button(26, 14, "[ Register ]", Action::OpenRegister));
    let error = s.add(w, Component::wrapped_label(4, 16, 60, ""));
    s.add(w, Component::label(4, 19, "arrows: move  enter: select  esc: quit"));
    LoginScreen {
        email,
        password,
        totp,
        error,
    }
}

fn build_register<W: Write>(s: &mut Surface<W>) -> RegisterScreen {
    let w = WindowId::Register;
    s.add(w, Component::label(4, 1, "pongterm :: create account"));
    let mut field = |y: u16, hint: &str, masked: bool| {
        let mut c = Component::text_field(0, 0, CREDENTIAL_CAPACITY, hint);
        if masked {
            c = c.masked();
        }
        s.add_boxed_field(w, 4, y, c, FIELD_BORDER)
    };
    let username = field(3, "username", false);
    let email = field(6, "email", false);
    let password = field(9, "password", true);
    let display_name = field(12, "display name", false);
    s.add(w, Component::button(10, 17, "[ Create account ]", Action::Register));
    s.add(w, Component::button(30, 17, "[ Back ]", Action::Back));
    let error = s.add(w, Component::wrapped_label(4, 19, 60, ""));
    RegisterScreen {
        username,
        email,
        password,
        display_name,
        error,
    }
}

fn build_dashboard<W: Write>(s: &mut Surface<W>) -> DashboardScreen {
    let w = WindowId::Dashboard;
    let welcome = s.add(w, Component::label(4, 1, "Welcome"));
    let status = s.add(w, Component::wrapped_label(4, 3, 60, ""));
    s.add(w, Component::button(4, 5, "[ Tournaments ]", Action::OpenTournaments));
    s.add(w, Component::button(4, 7, "[ Friends ]", Action::OpenFriends));
    s.add(w, Component::button(4, 9, "[ Log out ]", Action::Logout));
    s.add(w, Component::label(4, 12, "waiting for invites...  esc: log out"));
    DashboardScreen { welcome, status }
}

fn build_list<W: Write>(s: &mut Surface<W>, w: WindowId, title: &str) -> ListScreen {
    s.add(w, Component::button(4, 1, "[ Back ]", Action::Back));
    s.add(w, Component::label(14, 1, title));
    let body = s.add(w, Component::wrapped_label(4, 3, 70, "Loading..."));
    ListScreen { body }
}

fn build_invite<W: Write>(s: &mut Surface<W>) -> InviteScreen {
    let w = WindowId::InviteOverlay;
    s.add(w, Component::boxed(10, 4, 44, 9, OVERLAY_BORDER));
    s.add(w, Component::label(12, 5, "Match invite"));
    let sender = s.add(w, Component::label(12, 7, ""));
    let expiry = s.add(w, Component::label(12, 8, ""));
    s.add(w, Component::button(14, 10, "[ Accept ]", Action::AcceptInvite));
    s.add(w, Component::button(30, 10, "[ Decline ]", Action::DeclineInvite));
    InviteScreen { sender, expiry }
}

fn build_ready<W: Write>(s: &mut Surface<W>) -> ReadyScreen {
    let w = WindowId::ReadyCheck;
    s.add(w, Component::label(4, 1, "Match found"));
    let info = s.add(w, Component::label(4, 3, ""));
    let opponent = s.add(w, Component::label(4, 5, "Opponent: not ready"));
    let local = s.add(w, Component::label(4, 6, "You: not ready"));
    let button = s.add(w, Component::button(4, 8, "[ Ready ]", Action::Ready));
    s.add(w, Component::label(4, 10, "esc: leave"));
    ReadyScreen {
        info,
        opponent,
        local,
        button,
    }
}
