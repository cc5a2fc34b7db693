//! Response types for the web API.

use engine_core::{DisplayBoard, GameMetadata, GameType};
use serde::{Deserialize, Serialize};

use crate::game::Phase;

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Live sessions in the registry
    pub sessions: usize,
}

/// List of available games.
#[derive(Serialize, Deserialize)]
pub struct GamesListResponse {
    pub games: Vec<GameType>,
}

/// Game metadata response.
#[derive(Serialize, Deserialize)]
pub struct GameInfoResponse {
    pub game_type: GameType,
    pub display_name: String,
    pub board_width: usize,
    pub board_height: usize,
    pub num_actions: usize,
    pub obs_shape: [usize; 3],
    pub player_count: usize,
    pub player_labels: Vec<String>,
    pub player_names: Vec<String>,
    pub player_symbols: Vec<char>,
    pub description: String,
    pub board_type: String,
}

impl From<GameMetadata> for GameInfoResponse {
    fn from(meta: GameMetadata) -> Self {
        Self {
            game_type: meta.game_type,
            display_name: meta.display_name,
            board_width: meta.board_width,
            board_height: meta.board_height,
            num_actions: meta.num_actions,
            obs_shape: meta.obs_shape,
            player_count: meta.player_count,
            player_labels: meta.player_labels,
            player_names: meta.player_names,
            player_symbols: meta.player_symbols,
            description: meta.description,
            board_type: meta.board_type,
        }
    }
}

/// Response to `POST /game/start`.
#[derive(Serialize, Deserialize)]
pub struct StartGameResponse {
    pub session_id: String,
    pub game_type: GameType,
    /// Wire label of the seat to move
    pub current_player: String,
    /// Wire label of the human's seat
    pub human_player: String,
    pub observation: Vec<Vec<Vec<u8>>>,
    pub action_mask: Vec<bool>,
    pub valid_actions: Vec<usize>,
    pub done: bool,
    pub board: DisplayBoard,
    /// The AI's opening move when the human plays second
    pub ai_action: Option<usize>,
    pub ai_move: Option<String>,
}

/// Response to `POST /game/move`.
#[derive(Serialize, Deserialize)]
pub struct MoveResponse {
    pub action: usize,
    #[serde(rename = "move")]
    pub description: String,
    pub observation: Vec<Vec<Vec<u8>>>,
    pub action_mask: Vec<bool>,
    pub valid_actions: Vec<usize>,
    /// Reward for the seat now to move
    pub reward: f32,
    pub done: bool,
    pub current_player: String,
    pub board: DisplayBoard,
}

/// Response to `POST /game/ai-move`.
#[derive(Serialize, Deserialize)]
pub struct AiMoveResponse {
    pub ai_action: usize,
    pub ai_move: String,
    pub observation: Vec<Vec<Vec<u8>>>,
    pub action_mask: Vec<bool>,
    pub valid_actions: Vec<usize>,
    pub current_player: String,
    pub done: bool,
    pub reward: f32,
    pub board: DisplayBoard,
}

/// Response to `GET /game/state/:session_id`.
#[derive(Serialize, Deserialize)]
pub struct GameStateResponse {
    pub session_id: String,
    pub game_type: GameType,
    pub current_player: String,
    pub human_player: String,
    pub phase: Phase,
    pub observation: Vec<Vec<Vec<u8>>>,
    pub action_mask: Vec<bool>,
    pub valid_actions: Vec<usize>,
    pub done: bool,
    pub moves_played: usize,
    pub board: DisplayBoard,
}

/// Response to `DELETE /game/:session_id`.
#[derive(Serialize, Deserialize)]
pub struct DeleteResponse {
    pub status: String,
    pub session_id: String,
}
