//! Console presentation layer.
//!
//! Owns the event loop: stdin lines become [`UiEvent`]s for the active
//! page, server messages arrive through the controller, and effects are
//! printed as text (audio cues become short markers). This is deliberately
//! thin — all protocol and page logic lives in `pente-client`.

use pente_client::controller::{ClientController, PollResult};
use pente_client::pages::{Page, UiEvent};
use pente_client::session::{Effect, SessionState, Sound};
use pente_core::board::{BOARD_COLS, BOARD_ROWS, Cell};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Start the client and run the console loop until quit or disconnect.
pub async fn run(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctrl = ClientController::connect(host, port).await?;

    print_prompt(ctrl.page(), &ctrl.state);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while ctrl.is_running() {
        tokio::select! {
            poll = ctrl.recv() => match poll {
                PollResult::Updated(effects) => {
                    print_effects(&effects);
                    print_prompt(ctrl.page(), &ctrl.state);
                }
                PollResult::Disconnected => {
                    println!("Connection closed by the server.");
                    break;
                }
                PollResult::Empty => {}
            },

            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(ctrl.page(), line.trim()) {
                    Some(event) => {
                        let effects = ctrl.handle_ui(event);
                        print_effects(&effects);
                    }
                    None => print_help(ctrl.page()),
                }
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Command parsing
// ---------------------------------------------------------------------------

/// Map one console line to a [`UiEvent`] for the active page.
fn parse_command(page: Page, line: &str) -> Option<UiEvent> {
    let mut parts = line.split_whitespace();
    let cmd = parts.next()?;

    if cmd == "exit" {
        return Some(UiEvent::Quit);
    }

    match (page, cmd) {
        (Page::Login, "login") => Some(UiEvent::SubmitLogin {
            username: parts.next()?.to_string(),
            password: parts.next()?.to_string(),
        }),
        (Page::Login, "register") => Some(UiEvent::OpenRegister),

        (Page::Register, "create") => Some(UiEvent::SubmitRegister {
            username: parts.next()?.to_string(),
            password: parts.next()?.to_string(),
            confirm: parts.next()?.to_string(),
        }),
        (Page::Register, "back") => Some(UiEvent::BackToLogin),

        (Page::Lobby, "refresh") => Some(UiEvent::RefreshLobby),
        (Page::Lobby, "new") => Some(UiEvent::OpenCreateGame),
        (Page::Lobby, "join") => Some(UiEvent::JoinGame {
            name: parts.next()?.to_string(),
        }),
        (Page::Lobby, "logout") => Some(UiEvent::Disconnect),

        (Page::CreateGame, "create") => Some(UiEvent::SubmitCreateGame {
            name: parts.next()?.to_string(),
        }),
        (Page::CreateGame, "back") => Some(UiEvent::BackToLobby),

        (Page::Game, "move") => {
            let col: usize = parts.next()?.parse().ok()?;
            let row: usize = parts.next()?.parse().ok()?;
            Some(UiEvent::GridClick { col, row })
        }
        (Page::Game, "quit") => Some(UiEvent::QuitGame),

        _ => None,
    }
}

fn print_help(page: Page) {
    let commands = match page {
        Page::Login => "login <user> <password> | register | exit",
        Page::Register => "create <user> <password> <confirm> | back | exit",
        Page::Lobby => "refresh | new | join <game> | logout | exit",
        Page::CreateGame => "create <name> | back | exit",
        Page::Game => "move <col> <row> | quit | exit",
    };
    println!("Commands: {commands}");
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn print_effects(effects: &[Effect]) {
    for effect in effects {
        match effect {
            Effect::ShowError(text) => println!("!! {text}"),
            Effect::Instruction(text) => println!(">> {text}"),
            Effect::PlaySound(sound) => println!("(* {} *)", sound_label(*sound)),
        }
    }
}

fn sound_label(sound: Sound) -> &'static str {
    match sound {
        Sound::Error => "error",
        Sound::LobbyEntry => "lobby",
        Sound::GameStart => "game start",
        Sound::MoveFailed => "move failed",
        Sound::Capture => "capture!",
        Sound::Victory => "victory",
        Sound::Defeat => "defeat",
        Sound::Forfeit => "forfeit",
    }
}

fn print_prompt(page: Page, state: &SessionState) {
    match page {
        Page::Login => println!("-- Login --"),
        Page::Register => println!("-- Register --"),
        Page::Lobby => {
            println!(
                "-- Lobby -- {} ({} online)",
                stats_line(state),
                state.total_active_players
            );
            for game in state.lobby_display() {
                println!(
                    "  [{}] {} — {} — players: {}",
                    game.id,
                    game.name,
                    game.status_label(),
                    game.players.join(", ")
                );
            }
        }
        Page::CreateGame => println!("-- Create game --"),
        Page::Game => {
            println!(
                "-- {} -- captures: {} -- {}",
                if state.game_name.is_empty() {
                    "Game"
                } else {
                    &state.game_name
                },
                state.captures,
                if state.is_my_turn {
                    "your turn"
                } else {
                    "waiting"
                }
            );
            if let Some(board) = &state.board {
                print_board_grid(board);
            }
        }
    }
    print_help(page);
}

fn stats_line(state: &SessionState) -> String {
    format!(
        "{}: score {} / {}W {}L {}F / {} played",
        state.player_name,
        state.stats.score,
        state.stats.wins,
        state.stats.losses,
        state.stats.forfeits,
        state.stats.games_played
    )
}

fn print_board_grid(board: &pente_core::board::Board) {
    for row in 0..BOARD_ROWS {
        let mut line = String::with_capacity(BOARD_COLS * 2);
        for col in 0..BOARD_COLS {
            let c = match board.cell(col, row) {
                Some(Cell::Host) => 'x',
                Some(Cell::Opponent) => 'o',
                _ => '.',
            };
            line.push(c);
            line.push(' ');
        }
        println!("{line}");
    }
}
