//! The fixed set of games a session can be created for.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Game selected at session creation. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    ConnectFour,
    TicTacToe,
    Chess,
}

impl GameType {
    /// All supported games, in display order.
    pub const ALL: [GameType; 3] = [GameType::ConnectFour, GameType::TicTacToe, GameType::Chess];

    /// Wire name (e.g. "connect_four").
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::ConnectFour => "connect_four",
            GameType::TicTacToe => "tic_tac_toe",
            GameType::Chess => "chess",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a supported game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown game type: {0}")]
pub struct ParseGameTypeError(pub String);

impl FromStr for GameType {
    type Err = ParseGameTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "connect_four" | "connect4" => Ok(GameType::ConnectFour),
            "tic_tac_toe" | "tictactoe" => Ok(GameType::TicTacToe),
            "chess" => Ok(GameType::Chess),
            other => Err(ParseGameTypeError(other.to_string())),
        }
    }
}
