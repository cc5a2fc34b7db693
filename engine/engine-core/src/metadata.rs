//! Game metadata for UI and configuration
//!
//! This module provides display-oriented metadata about games that can be
//! used by frontends and the session layer to configure themselves dynamically.

use serde::{Deserialize, Serialize};

use crate::board_game::Seat;
use crate::game_type::GameType;

/// Metadata about a game for UI display and configuration
///
/// This struct contains all the information needed to:
/// - Display the game in a UI (board dimensions, player symbols)
/// - Validate observations and masks (obs_shape, num_actions)
/// - Label the seats the way clients expect (player_labels)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMetadata {
    /// Which game this describes
    pub game_type: GameType,

    /// Human-readable display name (e.g., "Tic-Tac-Toe", "Connect Four")
    pub display_name: String,

    /// Board width in cells
    pub board_width: usize,

    /// Board height in cells
    pub board_height: usize,

    /// Size of the fixed action space
    pub num_actions: usize,

    /// Observation shape as [rows, cols, channels]
    pub obs_shape: [usize; 3],

    /// Number of players (always 2 here)
    pub player_count: usize,

    /// Wire labels for the seats, indexed by `Seat::index()`
    /// (e.g. ["player_0", "player_1"] or ["player_1", "player_2"])
    pub player_labels: Vec<String>,

    /// Display names for each player (e.g., ["X", "O"] or ["White", "Black"])
    pub player_names: Vec<String>,

    /// Single-character symbols for each player
    pub player_symbols: Vec<char>,

    /// Brief description of the game rules for UI tooltips
    pub description: String,

    /// Board rendering type for the frontend
    /// - "grid": Simple grid where clicks place pieces directly (Tic-Tac-Toe)
    /// - "drop_column": Column-based where pieces drop to bottom (Connect Four)
    /// - "chess": 8x8 board with piece codes and from/to moves
    pub board_type: String,
}

impl GameMetadata {
    /// Create a new GameMetadata with required fields
    pub fn new(game_type: GameType, display_name: impl Into<String>) -> Self {
        Self {
            game_type,
            display_name: display_name.into(),
            board_width: 0,
            board_height: 0,
            num_actions: 0,
            obs_shape: [0, 0, 0],
            player_count: 2,
            player_labels: vec!["player_0".to_string(), "player_1".to_string()],
            player_names: vec!["Player 1".to_string(), "Player 2".to_string()],
            player_symbols: vec!['1', '2'],
            description: String::new(),
            board_type: "grid".to_string(),
        }
    }

    /// Builder method for board dimensions
    pub fn with_board(mut self, width: usize, height: usize) -> Self {
        self.board_width = width;
        self.board_height = height;
        self
    }

    /// Builder method for action count
    pub fn with_actions(mut self, num_actions: usize) -> Self {
        self.num_actions = num_actions;
        self
    }

    /// Builder method for observation shape
    pub fn with_observation(mut self, rows: usize, cols: usize, channels: usize) -> Self {
        self.obs_shape = [rows, cols, channels];
        self
    }

    /// Builder method for seat labels
    pub fn with_labels(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.player_labels = vec![first.into(), second.into()];
        self
    }

    /// Builder method for player information
    pub fn with_players(mut self, names: Vec<String>, symbols: Vec<char>) -> Self {
        self.player_count = names.len();
        self.player_names = names;
        self.player_symbols = symbols;
        self
    }

    /// Builder method for description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method for board type
    pub fn with_board_type(mut self, board_type: impl Into<String>) -> Self {
        self.board_type = board_type.into();
        self
    }

    /// Get the total number of board cells
    pub fn board_size(&self) -> usize {
        self.board_width * self.board_height
    }

    /// Wire label of a seat
    pub fn label(&self, seat: Seat) -> &str {
        &self.player_labels[seat.index()]
    }

    /// Seat carrying the given wire label, if any
    pub fn seat_for_label(&self, label: &str) -> Option<Seat> {
        [Seat::First, Seat::Second]
            .into_iter()
            .find(|seat| self.label(*seat) == label)
    }
}
