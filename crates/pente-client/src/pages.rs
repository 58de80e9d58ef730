//! Page state machine.
//!
//! The client is always on exactly one [`Page`]. UI intents (already mapped
//! from raw input by the presentation layer — pixel-to-grid conversion
//! included) are interpreted relative to the active page by
//! [`handle_ui_event`], which returns a [`Step`]: whether to keep running,
//! the next page, the presentation effects to emit, and the protocol
//! requests to send.
//!
//! Transition rules are local to each page; server-driven transitions
//! (auth success, match start, game over, ...) live in
//! [`dispatcher`](crate::dispatcher).

use pente_core::board::{BOARD_COLS, BOARD_ROWS};
use pente_core::protocol::{ClientMessage, MIN_PASSWORD_LEN, validate_game_name};

use crate::session::{Effect, SessionState, Sound};

/// The application screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Register,
    Lobby,
    CreateGame,
    Game,
}

/// A user intent reported by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Window close / hard quit, valid on any page.
    Quit,

    // Login page
    SubmitLogin { username: String, password: String },
    OpenRegister,

    // Register page
    SubmitRegister {
        username: String,
        password: String,
        confirm: String,
    },
    BackToLogin,

    // Lobby page
    RefreshLobby,
    OpenCreateGame,
    JoinGame { name: String },
    Disconnect,

    // CreateGame page
    SubmitCreateGame { name: String },
    BackToLobby,

    // Game page. Clicks are grid-mapped by the presentation layer;
    // clicks that miss the grid arrive as `OutsideClick`.
    GridClick { col: usize, row: usize },
    QuitGame,
    OutsideClick,
}

/// The outcome of handling one UI event or one server message.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// False terminates the run loop.
    pub running: bool,
    /// The page active after this step.
    pub page: Page,
    /// Presentation effects to emit, in order.
    pub effects: Vec<Effect>,
    /// Protocol requests to send, in order.
    pub outbound: Vec<ClientMessage>,
}

impl Step {
    /// Stay on `page` with no side effects.
    pub fn stay(page: Page) -> Self {
        Self {
            running: true,
            page,
            effects: Vec::new(),
            outbound: Vec::new(),
        }
    }

    /// Terminate the run loop.
    pub fn halt(page: Page) -> Self {
        Self {
            running: false,
            ..Self::stay(page)
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_outbound(mut self, msg: ClientMessage) -> Self {
        self.outbound.push(msg);
        self
    }

    /// Shorthand for an error message plus the error cue, staying on `page`.
    fn error(page: Page, text: &str) -> Self {
        Self::stay(page)
            .with_effect(Effect::ShowError(text.to_string()))
            .with_effect(Effect::PlaySound(Sound::Error))
    }
}

/// Interpret one UI event relative to the active page.
///
/// Events that make no sense on the active page are ignored (a stale
/// widget firing after a transition must not corrupt state).
pub fn handle_ui_event(page: Page, state: &mut SessionState, event: UiEvent) -> Step {
    if event == UiEvent::Quit {
        return Step::halt(page);
    }
    match page {
        Page::Login => handle_login(state, event),
        Page::Register => handle_register(state, event),
        Page::Lobby => handle_lobby(event),
        Page::CreateGame => handle_create_game(event),
        Page::Game => handle_game(state, event),
    }
}

fn handle_login(state: &mut SessionState, event: UiEvent) -> Step {
    match event {
        UiEvent::SubmitLogin { username, password } => {
            if username.is_empty() || password.is_empty() {
                return Step::error(Page::Login, "Username or password is empty.");
            }
            // Optimistic: cleared again by the dispatcher on auth failure.
            state.player_name = username.clone();
            Step::stay(Page::Login).with_outbound(ClientMessage::Auth { username, password })
        }
        UiEvent::OpenRegister => Step::stay(Page::Register),
        _ => Step::stay(Page::Login),
    }
}

fn handle_register(state: &mut SessionState, event: UiEvent) -> Step {
    match event {
        UiEvent::SubmitRegister {
            username,
            password,
            confirm,
        } => {
            if username.is_empty() || password.is_empty() {
                return Step::error(Page::Register, "Username or password is empty.");
            }
            if password.chars().count() < MIN_PASSWORD_LEN {
                return Step::error(
                    Page::Register,
                    "Password must contain at least 12 characters.",
                );
            }
            if password != confirm {
                return Step::error(Page::Register, "Passwords do not match.");
            }
            state.player_name = username.clone();
            Step::stay(Page::Register).with_outbound(ClientMessage::NewAccount {
                username,
                password: password.clone(),
                conf_password: confirm,
            })
        }
        UiEvent::BackToLogin => Step::stay(Page::Login),
        _ => Step::stay(Page::Register),
    }
}

fn handle_lobby(event: UiEvent) -> Step {
    match event {
        UiEvent::RefreshLobby => Step::stay(Page::Lobby).with_outbound(ClientMessage::GetLobby),
        UiEvent::OpenCreateGame => Step::stay(Page::CreateGame),
        UiEvent::JoinGame { name } => {
            Step::stay(Page::Lobby).with_outbound(ClientMessage::JoinGame { game_name: name })
        }
        UiEvent::Disconnect => Step::stay(Page::Lobby).with_outbound(ClientMessage::Disconnect),
        _ => Step::stay(Page::Lobby),
    }
}

fn handle_create_game(event: UiEvent) -> Step {
    match event {
        UiEvent::SubmitCreateGame { name } => {
            if let Err(msg) = validate_game_name(&name) {
                return Step::stay(Page::CreateGame).with_effect(Effect::ShowError(msg));
            }
            Step::stay(Page::CreateGame)
                .with_outbound(ClientMessage::CreateGame { game_name: name })
        }
        UiEvent::BackToLobby => {
            Step::stay(Page::Lobby).with_outbound(ClientMessage::GetLobby)
        }
        _ => Step::stay(Page::CreateGame),
    }
}

fn handle_game(state: &mut SessionState, event: UiEvent) -> Step {
    match event {
        UiEvent::GridClick { col, row } => {
            if col >= BOARD_COLS || row >= BOARD_ROWS {
                return Step::stay(Page::Game)
                    .with_effect(Effect::ShowError("Click outside the grid.".to_string()));
            }
            // Courtesy check only — the server remains authoritative and
            // may still reject the move.
            if !state.in_match() || !state.is_my_turn {
                return Step::stay(Page::Game)
                    .with_effect(Effect::ShowError("It is not your turn.".to_string()));
            }
            Step::stay(Page::Game).with_outbound(ClientMessage::PlayMove {
                x: col as u32,
                y: row as u32,
            })
        }
        UiEvent::QuitGame => Step::stay(Page::Game).with_outbound(ClientMessage::QuitGame),
        UiEvent::OutsideClick => Step::stay(Page::Game)
            .with_effect(Effect::ShowError("Click outside the grid.".to_string())),
        _ => Step::stay(Page::Game),
    }
}
