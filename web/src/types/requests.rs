//! Request types for the web API.

use engine_core::MoveIntent;
use serde::{Deserialize, Serialize};

/// Request to start a new game.
#[derive(Debug, Serialize, Deserialize)]
pub struct StartGameRequest {
    /// Game to play (e.g. "tic_tac_toe", "connect_four", "chess")
    pub game_type: String,
    /// Whether the human takes the first seat
    #[serde(default = "default_human_plays_first")]
    pub human_plays_first: bool,
}

fn default_human_plays_first() -> bool {
    true
}

/// Request to make a human move.
///
/// Exactly one of `action` (raw action id) or `move` (structured intent)
/// must be given.
#[derive(Debug, Serialize, Deserialize)]
pub struct MoveRequest {
    pub session_id: String,
    #[serde(default)]
    pub action: Option<usize>,
    #[serde(default, rename = "move")]
    pub intent: Option<MoveIntent>,
}

/// Query string for `POST /game/ai-move`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AiMoveQuery {
    pub session_id: String,
}
