//! Client-side session state and presentation effects.
//!
//! [`SessionState`] is the single process-wide record of identity,
//! statistics, and current-match data. It is mutated only while handling
//! one UI event or one server message (the controller runs both in the
//! same step, sequentially), so no locking is needed.
//!
//! Handlers never touch the presentation layer directly. They return
//! [`Effect`]s — the frontend decides how to render error text, play
//! audio cues, and so on.

use pente_core::board::Board;
use pente_core::protocol::{GameListing, OpponentInfo, PlayerStats};

/// Audio cue identifiers. The frontend maps these to actual assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    /// Login / validation failure.
    Error,
    /// Entered the lobby after authenticating.
    LobbyEntry,
    /// A match is starting.
    GameStart,
    /// The server rejected our move.
    MoveFailed,
    /// Our capture count increased.
    Capture,
    /// We won the match.
    Victory,
    /// We lost the match.
    Defeat,
    /// A player forfeited.
    Forfeit,
}

/// A presentation side effect requested by a handler.
///
/// Effects never block input and carry no protocol meaning — dropping them
/// changes nothing but what the user sees or hears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Short status string shown on the current page.
    ShowError(String),
    /// Instruction text (e.g. whose turn it is) shown on the game page.
    Instruction(String),
    /// Request an audio cue.
    PlaySound(Sound),
}

/// Contains all session data the client tracks.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Our login name (set optimistically when submitting credentials,
    /// cleared again if the server refuses them).
    pub player_name: String,
    /// Our statistics. Valid once authenticated.
    pub stats: PlayerStats,
    /// Opponent identity and statistics. `Some` only during a match.
    pub opponent: Option<OpponentInfo>,
    /// Name of the current game.
    pub game_name: String,
    /// Whether we created the current game.
    pub is_host: bool,
    /// Whether the server has granted us the move.
    pub is_my_turn: bool,
    /// Our capture count for the current match. Monotonically
    /// non-decreasing within a match; reset to zero between matches.
    pub captures: u32,
    /// Board snapshot. `Some` only while a match is active.
    pub board: Option<Board>,
    /// Lobby listing in server arrival order. Rebuilt on every refresh.
    pub games: Vec<GameListing>,
    /// Players currently connected to the server.
    pub total_active_players: u32,
    /// Connection status.
    pub connected: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    /// Whether a match is currently active (board installed).
    pub fn in_match(&self) -> bool {
        self.board.is_some()
    }

    /// Replace our statistics with a server-provided snapshot.
    pub fn apply_stats(&mut self, stats: &PlayerStats) {
        self.stats = *stats;
    }

    /// Display name of the opponent, if a match is active.
    pub fn opponent_name(&self) -> Option<&str> {
        self.opponent.as_ref().map(|o| o.name.as_str())
    }

    /// Reset all match-scoped fields to their initial values.
    ///
    /// Statistics and identity survive; they belong to the session, not the
    /// match.
    pub fn reset_match(&mut self) {
        self.board = None;
        self.opponent = None;
        self.game_name.clear();
        self.is_host = false;
        self.is_my_turn = false;
        self.captures = 0;
    }

    /// Reset everything tied to the authenticated identity (logout).
    pub fn reset_identity(&mut self) {
        self.reset_match();
        self.player_name.clear();
        self.stats = PlayerStats::default();
        self.games.clear();
        self.total_active_players = 0;
    }

    /// Lobby entries in display order: reverse of arrival order, so the
    /// newest game appears first.
    pub fn lobby_display(&self) -> impl Iterator<Item = &GameListing> {
        self.games.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pente_core::protocol::GAME_WAITING;

    fn listing(id: u32, name: &str) -> GameListing {
        GameListing {
            id,
            name: name.to_string(),
            players: vec!["host".to_string()],
            status: GAME_WAITING,
        }
    }

    #[test]
    fn lobby_display_order_is_reverse_of_arrival() {
        let mut state = SessionState::new();
        state.games = vec![listing(0, "g0"), listing(1, "g1"), listing(2, "g2")];

        let shown: Vec<_> = state.lobby_display().map(|g| g.name.as_str()).collect();
        assert_eq!(shown, vec!["g2", "g1", "g0"]);
    }

    #[test]
    fn reset_match_keeps_identity_and_stats() {
        let mut state = SessionState::new();
        state.player_name = "frodo".to_string();
        state.stats.wins = 3;
        state.board = Some(Board::empty());
        state.is_host = true;
        state.is_my_turn = true;
        state.captures = 2;
        state.game_name = "moria".to_string();

        state.reset_match();

        assert!(!state.in_match());
        assert!(!state.is_host);
        assert!(!state.is_my_turn);
        assert_eq!(state.captures, 0);
        assert!(state.game_name.is_empty());
        assert_eq!(state.player_name, "frodo");
        assert_eq!(state.stats.wins, 3);
    }

    #[test]
    fn reset_identity_clears_everything() {
        let mut state = SessionState::new();
        state.player_name = "frodo".to_string();
        state.stats.score = 10;
        state.games = vec![listing(0, "g0")];

        state.reset_identity();

        assert!(state.player_name.is_empty());
        assert_eq!(state.stats, PlayerStats::default());
        assert!(state.games.is_empty());
    }
}
