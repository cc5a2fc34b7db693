//! Tic-Tac-Toe game implementation
//!
//! Cells are addressed column-major: the action id of the cell in column `col`
//! and row `row` is `col * 3 + row`, and the observation is indexed
//! `[col][row][channel]`. Display boards are the usual `[row][col]` grid.
//!
//! ```text
//!          col 0  col 1  col 2
//! row 0:    [0]    [3]    [6]
//! row 1:    [1]    [4]    [7]
//! row 2:    [2]    [5]    [8]
//! ```
//!
//! # Usage
//!
//! ```rust
//! use games_tictactoe::register_tictactoe;
//! use engine_core::{EngineContext, GameType};
//!
//! register_tictactoe();
//!
//! let mut ctx = EngineContext::new(GameType::TicTacToe).expect("tictactoe should be registered");
//! let start = ctx.reset();
//! assert_eq!(start.valid_actions().len(), 9);
//! ```

use engine_core::board_game::{decode_two_planes, mark_two_planes};
use engine_core::{
    register_game, CodecError, DisplayBoard, Encoded, Game, GameAdapter, GameMetadata, GameType,
    MoveIntent, Observation, Outcome, Seat,
};

/// Board side length
pub const SIDE: usize = 3;
pub const BOARD_SIZE: usize = SIDE * SIDE;

/// Observation channels: current mover, opponent
pub const CHANNELS: usize = 2;

/// Register Tic-Tac-Toe with the global game registry
pub fn register_tictactoe() {
    register_game(GameType::TicTacToe, || {
        Box::new(GameAdapter::new(TicTacToe::new()))
    });
}

/// Action id of the cell at (`col`, `row`)
#[inline]
pub fn action_for(col: usize, row: usize) -> usize {
    col * SIDE + row
}

/// (`col`, `row`) of an action id
#[inline]
pub fn cell_for(action: usize) -> (usize, usize) {
    (action / SIDE, action % SIDE)
}

/// Tic-Tac-Toe game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    /// Cell owners, indexed by action id (column-major)
    board: [Option<Seat>; BOARD_SIZE],
    current: Seat,
    outcome: Option<Outcome>,
}

impl State {
    /// Create a new initial game state
    pub fn new() -> Self {
        Self {
            board: [None; BOARD_SIZE],
            current: Seat::First, // X goes first
            outcome: None,
        }
    }

    /// Check if the game is over
    pub fn is_done(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn current_player(&self) -> Seat {
        self.current
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<Seat> {
        self.board[action_for(col, row)]
    }

    /// Get legal moves (empty cells)
    pub fn legal_moves(&self) -> Vec<usize> {
        if self.is_done() {
            return Vec::new();
        }

        (0..BOARD_SIZE)
            .filter(|&pos| self.board[pos].is_none())
            .collect()
    }

    /// Make a move and return the new state
    ///
    /// Occupied or out-of-range cells and moves after the game ended leave
    /// the state unchanged.
    pub fn make_move(&self, position: usize) -> State {
        if self.is_done() || position >= BOARD_SIZE || self.board[position].is_some() {
            return *self;
        }

        let mut new_state = *self;
        new_state.board[position] = Some(self.current);
        new_state.outcome = Self::check_outcome(&new_state.board);
        new_state.current = self.current.other();

        new_state
    }

    /// Check for a finished game on the board
    fn check_outcome(board: &[Option<Seat>; BOARD_SIZE]) -> Option<Outcome> {
        // The set of lines is the same whether indices are read row- or column-major
        const LINES: [[usize; 3]; 8] = [
            [0, 1, 2],
            [3, 4, 5],
            [6, 7, 8], // columns
            [0, 3, 6],
            [1, 4, 7],
            [2, 5, 8], // rows
            [0, 4, 8],
            [2, 4, 6], // diagonals
        ];

        for [a, b, c] in LINES {
            if let Some(player) = board[a] {
                if board[b] == Some(player) && board[c] == Some(player) {
                    return Some(Outcome::Winner(player));
                }
            }
        }

        if board.iter().all(Option::is_some) {
            return Some(Outcome::Draw);
        }

        None
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// Tic-Tac-Toe game implementation
#[derive(Debug, Default)]
pub struct TicTacToe;

impl TicTacToe {
    /// Create a new Tic-Tac-Toe game
    pub fn new() -> Self {
        Self
    }
}

impl Game for TicTacToe {
    type State = State;

    fn game_type(&self) -> GameType {
        GameType::TicTacToe
    }

    fn metadata(&self) -> GameMetadata {
        GameMetadata::new(GameType::TicTacToe, "Tic-Tac-Toe")
            .with_board(SIDE, SIDE)
            .with_actions(BOARD_SIZE)
            .with_observation(SIDE, SIDE, CHANNELS)
            .with_labels("player_1", "player_2")
            .with_players(vec!["X".to_string(), "O".to_string()], vec!['X', 'O'])
            .with_description("Classic Tic-Tac-Toe on a 3x3 grid. Get three in a row to win!")
            .with_board_type("grid")
    }

    fn initial_state(&self) -> Self::State {
        State::new()
    }

    fn current_seat(state: &Self::State) -> Seat {
        state.current
    }

    fn legal_mask(state: &Self::State) -> Vec<bool> {
        if state.is_done() {
            return vec![false; BOARD_SIZE];
        }
        state.board.iter().map(Option::is_none).collect()
    }

    fn apply(state: &mut Self::State, action: usize) {
        *state = state.make_move(action);
    }

    fn outcome(state: &Self::State) -> Option<Outcome> {
        state.outcome
    }

    fn observe(state: &Self::State) -> Observation {
        let mut obs = Observation::zeros(SIDE, SIDE, CHANNELS);
        for (action, cell) in state.board.iter().enumerate() {
            if let Some(owner) = cell {
                let (col, row) = cell_for(action);
                mark_two_planes(&mut obs, col, row, *owner, state.current);
            }
        }
        obs
    }

    fn decode_board(obs: &Observation, current: Seat) -> Result<DisplayBoard, CodecError> {
        // Observation is [col][row]; transpose into the display grid
        let owners = decode_two_planes(obs, SIDE, SIDE, current)?;
        let mut board = DisplayBoard::new(SIDE, SIDE);
        for (col, column) in owners.iter().enumerate() {
            for (row, &owner) in column.iter().enumerate() {
                board.set(row, col, owner);
            }
        }
        Ok(board)
    }

    fn encode_intent(intent: &MoveIntent, _current: Seat, action_mask: &[bool]) -> Encoded {
        match *intent {
            MoveIntent::Cell { col, row } if col < SIDE && row < SIDE => {
                Encoded::checked(action_for(col, row), action_mask)
            }
            _ => Encoded::NotLegal,
        }
    }

    fn describe_action(_state: &Self::State, action: usize) -> String {
        let (col, row) = cell_for(action);
        format!("col {}, row {}", col, row)
    }
}
