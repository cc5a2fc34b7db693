//! Client-facing codec types.
//!
//! Each game translates its agent-relative observation into an absolute
//! `DisplayBoard`, and a client `MoveIntent` into a wire-level action id.

use serde::{Deserialize, Serialize};

/// Error produced when an observation cannot be decoded unambiguously
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Observation shape mismatch: expected {expected:?}, got {actual:?}")]
    Shape {
        expected: [usize; 3],
        actual: [usize; 3],
    },
    #[error("Ambiguous occupancy at row {row}, col {col}: {channels} channels set")]
    Ambiguous {
        row: usize,
        col: usize,
        channels: usize,
    },
    #[error("Invalid value {value} at row {row}, col {col}, channel {channel}")]
    InvalidValue {
        row: usize,
        col: usize,
        channel: usize,
        value: u8,
    },
}

/// Absolute board for rendering.
///
/// Row 0 is the row drawn at the top. Cell values are game specific:
/// 0 is always empty, grid games use player ids (1 = first seat, 2 = second seat),
/// chess uses piece codes 1-6 (white P,N,B,R,Q,K) and 7-12 (black P..K).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayBoard {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Vec<u8>>,
}

impl DisplayBoard {
    /// Create an empty board.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![vec![0; cols]; rows],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.cells[row][col] = value;
    }

    /// Number of non-empty cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().flatten().filter(|&&v| v != 0).count()
    }
}

/// Structured move request from a client, distinct from the integer action id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveIntent {
    /// Drop into a column (Connect Four)
    Column { column: usize },
    /// Click a cell (Tic-Tac-Toe)
    Cell { col: usize, row: usize },
    /// Move a piece between algebraic squares such as "e2" -> "e4" (Chess)
    Squares {
        from: String,
        to: String,
        #[serde(default)]
        promotion: Option<char>,
    },
}

/// Result of encoding a move intent against the current legal set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoded {
    /// Legal action id
    Action(usize),
    /// No legal action corresponds to the intent
    NotLegal,
}

impl Encoded {
    /// Accept `action` only if it is inside the mask and marked legal.
    pub fn checked(action: usize, action_mask: &[bool]) -> Self {
        if action_mask.get(action).copied().unwrap_or(false) {
            Encoded::Action(action)
        } else {
            Encoded::NotLegal
        }
    }

    pub fn action(self) -> Option<usize> {
        match self {
            Encoded::Action(a) => Some(a),
            Encoded::NotLegal => None,
        }
    }
}
