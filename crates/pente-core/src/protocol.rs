//! Wire protocol for the Pente server.
//!
//! Messages are JSON objects with a `type` discriminator, one message per
//! line. Outbound messages are client-controlled and always encode cleanly;
//! inbound messages tolerate the server's quirks (missing payload fields,
//! failure statuses encoded as the string `"error"`, unknown `type` values).

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Minimum accepted password length for account creation.
pub const MIN_PASSWORD_LEN: usize = 12;

/// Maximum accepted game-name length.
pub const MAX_GAME_NAME_LEN: usize = 20;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Success/failure marker carried by every ordinary server response.
///
/// The server encodes success as the number `1` and failure as `0`, except
/// for a few code paths that emit the string `"error"` instead. Decoding is
/// therefore lenient: the integer `1` means success, anything else failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Fail,
}

impl Status {
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            Status::Success => 1,
            Status::Fail => 0,
        })
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value.as_i64() {
            Some(1) => Status::Success,
            _ => Status::Fail,
        })
    }
}

// ---------------------------------------------------------------------------
// Payload records
// ---------------------------------------------------------------------------

/// Per-player statistics, as stored by the server.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerStats {
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub forfeits: u32,
    #[serde(default)]
    pub games_played: u32,
}

/// Opponent descriptor delivered with `alert_start_game`.
///
/// The server flattens the stat fields next to `name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpponentInfo {
    pub name: String,
    #[serde(flatten)]
    pub stats: PlayerStats,
}

/// Lobby game status: a game waiting for a second player.
pub const GAME_WAITING: u8 = 0;
/// Lobby game status: a game already in progress.
pub const GAME_ONGOING: u8 = 1;

/// One entry of the lobby listing. Rebuilt on every `get_lobby_response`;
/// entries have no identity across refreshes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameListing {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub players: Vec<String>,
    pub status: u8,
}

impl GameListing {
    pub fn is_waiting(&self) -> bool {
        self.status == GAME_WAITING
    }

    /// Human-readable status label for UI display.
    pub fn status_label(&self) -> &'static str {
        if self.is_waiting() { "waiting" } else { "ongoing" }
    }
}

/// Descriptor of a freshly created game (`create_game_response` payload).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameDescriptor {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub status: u8,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub players: Vec<String>,
}

/// End-of-match outcome carried by `game_over` in its `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Victory,
    Defeat,
    Withdraw,
}

impl GameOutcome {
    /// Map the numeric `game_over` status (victory=0, defeat=1, withdraw=2).
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(GameOutcome::Victory),
            1 => Some(GameOutcome::Defeat),
            2 => Some(GameOutcome::Withdraw),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Authenticate with an existing account.
    Auth { username: String, password: String },

    /// Create a new account.
    NewAccount {
        username: String,
        password: String,
        conf_password: String,
    },

    /// Log out and return to the login screen.
    Disconnect,

    /// Request the current lobby listing.
    GetLobby,

    /// Create a new game and wait for an opponent.
    CreateGame { game_name: String },

    /// Join a waiting game by name.
    JoinGame { game_name: String },

    /// Confirm readiness after joining a game.
    ReadyToPlay,

    /// Place a stone at the 0-indexed grid column `x`, row `y`.
    PlayMove { x: u32, y: u32 },

    /// Forfeit the current match.
    QuitGame,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Reply to `auth`.
    AuthResponse {
        status: Status,
        #[serde(default)]
        player_stats: Option<PlayerStats>,
    },

    /// Reply to `new_account`.
    NewAccountResponse {
        status: Status,
        #[serde(default)]
        player_stats: Option<PlayerStats>,
    },

    /// Reply to `disconnect`.
    DisconnectAck { status: Status },

    /// Reply to `get_lobby`.
    GetLobbyResponse {
        status: Status,
        #[serde(default)]
        games: Vec<GameListing>,
        #[serde(default)]
        total_active_players: u32,
    },

    /// Reply to `create_game`.
    CreateGameResponse {
        status: Status,
        #[serde(default)]
        game: Option<GameDescriptor>,
    },

    /// Reply to `join_game`.
    JoinGameResponse { status: Status },

    /// Reply to `ready_to_play`.
    ReadyToPlayResponse { status: Status },

    /// Both players are present; the match begins.
    AlertStartGame {
        status: Status,
        #[serde(default)]
        board: Option<String>,
        #[serde(default)]
        opponent_info: Option<OpponentInfo>,
        #[serde(default)]
        game_name: Option<String>,
    },

    /// Reply to `quit_game`.
    QuitGameResponse {
        status: Status,
        #[serde(default)]
        player_stats: Option<PlayerStats>,
    },

    /// Reply to our own `play_move`.
    MoveResponse {
        status: Status,
        #[serde(default)]
        board_state: Option<String>,
        #[serde(default)]
        captures: Option<u32>,
    },

    /// Push after the opponent moved.
    NewBoardState {
        status: Status,
        #[serde(default)]
        board_state: Option<String>,
        #[serde(default)]
        captures: Option<u32>,
    },

    /// The match ended. `status` is an outcome code, see [`GameOutcome`].
    GameOver {
        status: u8,
        #[serde(default)]
        board: Option<String>,
        #[serde(default)]
        player_stats: Option<PlayerStats>,
    },

    /// Any message kind this client does not know. Dispatched as a no-op so
    /// newer servers do not break the session.
    #[serde(other)]
    Unknown,
}

// ---------------------------------------------------------------------------
// Game name validation
// ---------------------------------------------------------------------------

/// Validate a game name before it is sent to the server.
///
/// Names must be non-empty and at most [`MAX_GAME_NAME_LEN`] characters.
pub fn validate_game_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Game name cannot be empty".to_string());
    }
    if name.chars().count() > MAX_GAME_NAME_LEN {
        return Err(format!(
            "Game name must be at most {MAX_GAME_NAME_LEN} characters"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(msg: ClientMessage) {
        let encoded = serde_json::to_string(&msg).unwrap();
        let decoded: ClientMessage = serde_json::from_str(&encoded).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn outbound_round_trips() {
        round_trip(ClientMessage::Auth {
            username: "alice".into(),
            password: "secret12345!".into(),
        });
        round_trip(ClientMessage::NewAccount {
            username: "bob".into(),
            password: "longenoughpw".into(),
            conf_password: "longenoughpw".into(),
        });
        round_trip(ClientMessage::Disconnect);
        round_trip(ClientMessage::GetLobby);
        round_trip(ClientMessage::CreateGame {
            game_name: "shire".into(),
        });
        round_trip(ClientMessage::JoinGame {
            game_name: "shire".into(),
        });
        round_trip(ClientMessage::ReadyToPlay);
        round_trip(ClientMessage::PlayMove { x: 9, y: 9 });
        round_trip(ClientMessage::QuitGame);
    }

    #[test]
    fn outbound_uses_snake_case_type_tags() {
        let json = serde_json::to_string(&ClientMessage::PlayMove { x: 3, y: 15 }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "play_move");
        assert_eq!(value["x"], 3);
        assert_eq!(value["y"], 15);
    }

    #[test]
    fn status_accepts_integer_and_string_failures() {
        let ok: ServerMessage =
            serde_json::from_str(r#"{"type":"join_game_response","status":1}"#).unwrap();
        assert_eq!(
            ok,
            ServerMessage::JoinGameResponse {
                status: Status::Success
            }
        );

        let fail: ServerMessage =
            serde_json::from_str(r#"{"type":"join_game_response","status":0}"#).unwrap();
        assert_eq!(
            fail,
            ServerMessage::JoinGameResponse {
                status: Status::Fail
            }
        );

        // Some server paths report failure as the string "error".
        let quirky: ServerMessage =
            serde_json::from_str(r#"{"type":"create_game_response","status":"error"}"#).unwrap();
        assert_eq!(
            quirky,
            ServerMessage::CreateGameResponse {
                status: Status::Fail,
                game: None,
            }
        );
    }

    #[test]
    fn unknown_kind_decodes_to_catch_all() {
        let msg: ServerMessage =
            serde_json::from_str(r#"{"type":"unknown_command"}"#).unwrap();
        assert_eq!(msg, ServerMessage::Unknown);
    }

    #[test]
    fn lobby_response_decodes_listing() {
        let raw = r#"{
            "type": "get_lobby_response",
            "status": 1,
            "total_active_players": 4,
            "games": [
                {"id": 1, "name": "moria", "status": 0, "players": ["gimli"]},
                {"id": 2, "name": "gondor", "status": 1, "players": ["boromir", "faramir"]}
            ]
        }"#;
        let msg: ServerMessage = serde_json::from_str(raw).unwrap();
        let ServerMessage::GetLobbyResponse {
            status,
            games,
            total_active_players,
        } = msg
        else {
            panic!("wrong variant");
        };
        assert!(status.is_success());
        assert_eq!(total_active_players, 4);
        assert_eq!(games.len(), 2);
        assert!(games[0].is_waiting());
        assert_eq!(games[0].status_label(), "waiting");
        assert_eq!(games[1].status_label(), "ongoing");
        assert_eq!(games[1].players, vec!["boromir", "faramir"]);
    }

    #[test]
    fn alert_start_game_flattens_opponent_stats() {
        let raw = format!(
            r#"{{
                "type": "alert_start_game",
                "status": 1,
                "game_name": "moria",
                "board": "{}",
                "opponent_info": {{
                    "name": "sauron", "score": 42, "wins": 7,
                    "losses": 1, "forfeits": 0, "games_played": 8
                }}
            }}"#,
            "-".repeat(361)
        );
        let msg: ServerMessage = serde_json::from_str(&raw).unwrap();
        let ServerMessage::AlertStartGame {
            opponent_info: Some(info),
            board: Some(board),
            ..
        } = msg
        else {
            panic!("missing payload");
        };
        assert_eq!(info.name, "sauron");
        assert_eq!(info.stats.score, 42);
        assert_eq!(info.stats.wins, 7);
        assert_eq!(board.len(), 361);
    }

    #[test]
    fn game_outcome_codes() {
        assert_eq!(GameOutcome::from_code(0), Some(GameOutcome::Victory));
        assert_eq!(GameOutcome::from_code(1), Some(GameOutcome::Defeat));
        assert_eq!(GameOutcome::from_code(2), Some(GameOutcome::Withdraw));
        assert_eq!(GameOutcome::from_code(3), None);
    }

    #[test]
    fn game_name_validation() {
        assert!(validate_game_name("moria").is_ok());
        assert!(validate_game_name(&"a".repeat(20)).is_ok());
        assert!(validate_game_name("").is_err());
        assert!(validate_game_name(&"a".repeat(21)).is_err());
    }
}
