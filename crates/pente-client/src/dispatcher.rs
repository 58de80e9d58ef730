//! Protocol dispatcher.
//!
//! Routes each inbound [`ServerMessage`] to the handler for its kind.
//! Handlers validate the status field, mutate exactly the session fields
//! relevant to the message, and return a [`Step`] carrying the next page,
//! presentation effects, and any follow-up requests. The dispatcher holds
//! no state of its own.
//!
//! Transport faults never reach this module — the controller terminates
//! the session before dispatching. Undecodable lines are dropped upstream.

use pente_core::board::Board;
use pente_core::protocol::{
    ClientMessage, GameListing, GameOutcome, OpponentInfo, PlayerStats, ServerMessage, Status,
};
use tracing::debug;

use crate::pages::{Page, Step};
use crate::session::{Effect, SessionState, Sound};

/// Dispatch one inbound message relative to the active page.
pub fn dispatch(msg: &ServerMessage, page: Page, state: &mut SessionState) -> Step {
    match msg {
        ServerMessage::AuthResponse {
            status,
            player_stats,
        } => on_auth_response(
            *status,
            player_stats.as_ref(),
            "Incorrect username or password.",
            page,
            state,
        ),

        ServerMessage::NewAccountResponse {
            status,
            player_stats,
        } => on_auth_response(
            *status,
            player_stats.as_ref(),
            "That account name is already taken.",
            page,
            state,
        ),

        ServerMessage::DisconnectAck { status } => on_disconnect_ack(*status, page, state),

        ServerMessage::GetLobbyResponse {
            status,
            games,
            total_active_players,
        } => on_lobby_response(*status, games, *total_active_players, state),

        ServerMessage::CreateGameResponse { status, game } => {
            on_create_game_response(*status, game.as_ref().map(|g| g.name.as_str()), page, state)
        }

        ServerMessage::JoinGameResponse { status } => on_join_game_response(*status, state),

        ServerMessage::ReadyToPlayResponse { status } => {
            if status.is_success() {
                Step::stay(page)
            } else {
                Step::stay(page)
                    .with_effect(Effect::ShowError("The server refused the match.".to_string()))
            }
        }

        ServerMessage::AlertStartGame {
            status,
            board,
            opponent_info,
            game_name,
        } => on_alert_start_game(
            *status,
            board.as_deref(),
            opponent_info.as_ref(),
            game_name.as_deref(),
            state,
        ),

        ServerMessage::QuitGameResponse {
            status,
            player_stats,
        } => on_quit_game_response(*status, player_stats.as_ref(), state),

        ServerMessage::MoveResponse {
            status,
            board_state,
            captures,
        } => on_board_update(*status, board_state.as_deref(), *captures, false, state),

        ServerMessage::NewBoardState {
            status,
            board_state,
            captures,
        } => on_board_update(*status, board_state.as_deref(), *captures, true, state),

        ServerMessage::GameOver {
            status,
            board: _,
            player_stats,
        } => on_game_over(*status, player_stats.as_ref(), state),

        ServerMessage::Unknown => {
            debug!("ignoring unknown server message kind");
            Step::stay(page)
        }
    }
}

// ---------------------------------------------------------------------------
// Per-kind handlers
// ---------------------------------------------------------------------------

fn on_auth_response(
    status: Status,
    stats: Option<&PlayerStats>,
    failure_text: &str,
    page: Page,
    state: &mut SessionState,
) -> Step {
    if !status.is_success() {
        state.player_name.clear();
        return Step::stay(page)
            .with_effect(Effect::ShowError(failure_text.to_string()))
            .with_effect(Effect::PlaySound(Sound::Error));
    }

    if let Some(stats) = stats {
        state.apply_stats(stats);
    }

    Step::stay(Page::Lobby)
        .with_effect(Effect::PlaySound(Sound::LobbyEntry))
        .with_outbound(ClientMessage::GetLobby)
}

fn on_disconnect_ack(status: Status, page: Page, state: &mut SessionState) -> Step {
    if !status.is_success() {
        return Step::stay(page)
            .with_effect(Effect::ShowError("Disconnection failed.".to_string()));
    }
    state.reset_identity();
    Step::stay(Page::Login)
}

fn on_lobby_response(
    status: Status,
    games: &[GameListing],
    total_active_players: u32,
    state: &mut SessionState,
) -> Step {
    if !status.is_success() {
        return Step::stay(Page::Lobby)
            .with_effect(Effect::ShowError(
                "Could not fetch the game list.".to_string(),
            ));
    }

    state.games = games.to_vec();
    state.total_active_players = total_active_players;

    let step = Step::stay(Page::Lobby);
    if games.is_empty() {
        step.with_effect(Effect::ShowError("No games available.".to_string()))
    } else {
        step
    }
}

fn on_create_game_response(
    status: Status,
    game_name: Option<&str>,
    page: Page,
    state: &mut SessionState,
) -> Step {
    if !status.is_success() {
        return Step::stay(page).with_effect(Effect::ShowError(
            "A game with that name already exists.".to_string(),
        ));
    }

    if let Some(name) = game_name {
        state.game_name = name.to_string();
    }
    state.is_host = true;

    Step::stay(Page::Game).with_effect(Effect::Instruction(
        "Waiting for another player...".to_string(),
    ))
}

fn on_join_game_response(status: Status, state: &mut SessionState) -> Step {
    if !status.is_success() {
        return Step::stay(Page::Lobby).with_effect(Effect::ShowError(
            "Game is full or cannot be joined.".to_string(),
        ));
    }

    state.is_host = false;
    Step::stay(Page::Game)
        .with_effect(Effect::PlaySound(Sound::GameStart))
        .with_outbound(ClientMessage::ReadyToPlay)
}

fn on_alert_start_game(
    status: Status,
    board: Option<&str>,
    opponent_info: Option<&OpponentInfo>,
    game_name: Option<&str>,
    state: &mut SessionState,
) -> Step {
    // Both the board and the opponent descriptor are required; a start
    // alert missing either is fatal for this match only.
    let parsed = board.map(Board::parse);
    let (Some(Ok(board)), Some(opponent)) = (parsed, opponent_info) else {
        return abort_to_lobby(state, "The match could not start.");
    };
    if !status.is_success() {
        return abort_to_lobby(state, "The match could not start.");
    }

    if let Some(name) = game_name {
        state.game_name = name.to_string();
    }
    state.board = Some(board);
    state.opponent = Some(opponent.clone());
    state.captures = 0;
    // The guest receives the first turn grant; the host waits.
    state.is_my_turn = !state.is_host;

    let instruction = if state.is_my_turn {
        format!("Your move, {}!", state.player_name)
    } else {
        format!("Waiting for {} to play.", opponent.name)
    };

    Step::stay(Page::Game)
        .with_effect(Effect::Instruction(instruction))
        .with_effect(Effect::PlaySound(Sound::GameStart))
}

fn on_quit_game_response(
    status: Status,
    stats: Option<&PlayerStats>,
    state: &mut SessionState,
) -> Step {
    // Match state resets even on an ambiguous status: the server has
    // already detached us from the game.
    state.reset_match();

    if !status.is_success() {
        return Step::stay(Page::Lobby);
    }
    if let Some(stats) = stats {
        state.apply_stats(stats);
    }
    Step::stay(Page::Lobby).with_effect(Effect::PlaySound(Sound::Forfeit))
}

fn on_board_update(
    status: Status,
    board_state: Option<&str>,
    captures: Option<u32>,
    opponent_moved: bool,
    state: &mut SessionState,
) -> Step {
    let parsed = board_state.map(Board::parse);
    let (true, Some(Ok(board))) = (status.is_success(), parsed) else {
        // Board and turn stay untouched on a rejected or malformed update.
        return Step::stay(Page::Game)
            .with_effect(Effect::ShowError(
                "Invalid placement or not your turn.".to_string(),
            ))
            .with_effect(Effect::PlaySound(Sound::MoveFailed));
    };

    // Order matters: board first, then the turn flip, then captures.
    state.board = Some(board);
    state.is_my_turn = !state.is_my_turn;

    let mut step = Step::stay(Page::Game);
    if let Some(reported) = captures {
        // Strict increase check: one capture cue per actual capture, none
        // for equal or stale values.
        if reported > state.captures {
            state.captures = reported;
            step = step.with_effect(Effect::PlaySound(Sound::Capture));
        }
    }

    let instruction = if opponent_moved {
        format!("Your move, {}!", state.player_name)
    } else {
        format!(
            "Waiting for {} to play.",
            state.opponent_name().unwrap_or("your opponent")
        )
    };
    step.with_effect(Effect::Instruction(instruction))
}

fn on_game_over(code: u8, stats: Option<&PlayerStats>, state: &mut SessionState) -> Step {
    let mut step = Step::stay(Page::Lobby);

    match GameOutcome::from_code(code) {
        Some(GameOutcome::Victory) => {
            step = step
                .with_effect(Effect::Instruction("You won the game!".to_string()))
                .with_effect(Effect::PlaySound(Sound::Victory));
        }
        Some(GameOutcome::Defeat) => {
            step = step
                .with_effect(Effect::Instruction("You lost the game!".to_string()))
                .with_effect(Effect::PlaySound(Sound::Defeat));
        }
        Some(GameOutcome::Withdraw) => {
            step = step
                .with_effect(Effect::Instruction("You forfeited the game!".to_string()))
                .with_effect(Effect::PlaySound(Sound::Forfeit));
        }
        None => {
            step = step.with_effect(Effect::ShowError(
                "The match ended unexpectedly.".to_string(),
            ));
        }
    }

    if let Some(stats) = stats {
        state.apply_stats(stats);
    }
    state.reset_match();
    step
}

fn abort_to_lobby(state: &mut SessionState, text: &str) -> Step {
    state.reset_match();
    Step::stay(Page::Lobby).with_effect(Effect::ShowError(text.to_string()))
}
