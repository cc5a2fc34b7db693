//! Connect Four game implementation
//!
//! Connect Four is a two-player connection game where players drop colored discs
//! into a 7-column, 6-row vertically suspended grid. The objective is to be
//! the first to form a horizontal, vertical, or diagonal line of four discs.
//!
//! # Board Layout
//!
//! The rules store the board in row-major order with row 0 at the bottom:
//! ```text
//! Row 5: [35][36][37][38][39][40][41]  <- Top
//! Row 4: [28][29][30][31][32][33][34]
//! Row 3: [21][22][23][24][25][26][27]
//! Row 2: [14][15][16][17][18][19][20]
//! Row 1: [ 7][ 8][ 9][10][11][12][13]
//! Row 0: [ 0][ 1][ 2][ 3][ 4][ 5][ 6]  <- Bottom
//!         Col 0  1  2  3  4  5  6
//! ```
//!
//! Observations and display boards are rendered the other way up: their row 0
//! is the top of the grid, so a disc dropped into an empty column appears in
//! row 5.
//!
//! # Usage
//!
//! ```rust
//! use games_connect4::register_connect4;
//! use engine_core::{EngineContext, GameType};
//!
//! register_connect4();
//!
//! let mut ctx = EngineContext::new(GameType::ConnectFour).expect("connect four should be registered");
//! let start = ctx.reset();
//! assert_eq!(start.valid_actions().len(), 7);
//! ```

use engine_core::board_game::{decode_two_planes, mark_two_planes};
use engine_core::{
    register_game, CodecError, DisplayBoard, Encoded, Game, GameAdapter, GameMetadata, GameType,
    MoveIntent, Observation, Outcome, Seat,
};

/// Board dimensions
pub const COLS: usize = 7;
pub const ROWS: usize = 6;
pub const BOARD_SIZE: usize = COLS * ROWS; // 42

/// Observation channels: current mover, opponent
pub const CHANNELS: usize = 2;

/// Register Connect Four with the global game registry
pub fn register_connect4() {
    register_game(GameType::ConnectFour, || {
        Box::new(GameAdapter::new(Connect4::new()))
    });
}

/// Connect Four game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// Disc owners, row-major with row 0 at the bottom
    board: [Option<Seat>; BOARD_SIZE],
    /// Seat to move
    current: Seat,
    outcome: Option<Outcome>,
    /// Number of discs in each column
    column_heights: [u8; COLS],
}

impl State {
    /// Create a new initial game state
    pub fn new() -> Self {
        Self {
            board: [None; BOARD_SIZE],
            current: Seat::First,
            outcome: None,
            column_heights: [0; COLS],
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

    /// Owner of the disc at (`col`, `row`), row 0 at the bottom
    pub fn cell(&self, col: usize, row: usize) -> Option<Seat> {
        self.board[Self::pos(col, row)]
    }

    /// Get legal moves (columns that are not full)
    pub fn legal_moves(&self) -> Vec<usize> {
        if self.is_done() {
            return Vec::new();
        }

        (0..COLS)
            .filter(|&col| self.column_heights[col] < ROWS as u8)
            .collect()
    }

    /// Number of discs played so far
    pub fn moves_played(&self) -> usize {
        self.column_heights.iter().map(|&h| h as usize).sum()
    }

    /// Convert column and row to board index
    #[inline]
    fn pos(col: usize, row: usize) -> usize {
        row * COLS + col
    }

    /// Drop a piece in the given column and return the new state
    ///
    /// Dropping into a full column, an out-of-range column or after the game
    /// ended returns the state unchanged.
    pub fn drop_piece(&self, column: usize) -> State {
        if self.is_done() || column >= COLS || self.column_heights[column] >= ROWS as u8 {
            return self.clone();
        }

        let mut new_state = self.clone();
        let row = self.column_heights[column] as usize;

        new_state.board[Self::pos(column, row)] = Some(self.current);
        new_state.column_heights[column] += 1;
        new_state.outcome = new_state.check_outcome_at(column, row);
        // The turn passes on every move, including the last one
        new_state.current = self.current.other();

        new_state
    }

    /// Outcome after the disc at (col, row) was placed
    fn check_outcome_at(&self, col: usize, row: usize) -> Option<Outcome> {
        let player = self.board[Self::pos(col, row)]?;

        // Direction vectors: horizontal, vertical, diagonal /, diagonal \
        let directions: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

        for (dc, dr) in directions {
            let count = 1
                + self.run_length(col, row, dc, dr, player)
                + self.run_length(col, row, -dc, -dr, player);
            if count >= 4 {
                return Some(Outcome::Winner(player));
            }
        }

        if self.column_heights.iter().all(|&h| h >= ROWS as u8) {
            return Some(Outcome::Draw);
        }

        None
    }

    /// Consecutive discs of `player` starting one step away from (col, row)
    fn run_length(&self, col: usize, row: usize, dc: i32, dr: i32, player: Seat) -> usize {
        let mut count = 0;
        let (mut c, mut r) = (col as i32 + dc, row as i32 + dr);
        while c >= 0 && c < COLS as i32 && r >= 0 && r < ROWS as i32 {
            if self.board[Self::pos(c as usize, r as usize)] != Some(player) {
                break;
            }
            count += 1;
            c += dc;
            r += dr;
        }
        count
    }

    /// Get the row where the last piece was placed in a column
    pub fn last_row_in_column(&self, col: usize) -> Option<usize> {
        match self.column_heights[col] {
            0 => None,
            height => Some(height as usize - 1),
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// Observation row for a rules row (row 0 at the top)
#[inline]
fn obs_row(row: usize) -> usize {
    ROWS - 1 - row
}

/// Connect Four game implementation
#[derive(Debug, Default)]
pub struct Connect4;

impl Connect4 {
    /// Create a new Connect Four game
    pub fn new() -> Self {
        Self
    }
}

impl Game for Connect4 {
    type State = State;

    fn game_type(&self) -> GameType {
        GameType::ConnectFour
    }

    fn metadata(&self) -> GameMetadata {
        GameMetadata::new(GameType::ConnectFour, "Connect Four")
            .with_board(COLS, ROWS)
            .with_actions(COLS)
            .with_observation(ROWS, COLS, CHANNELS)
            .with_players(
                vec!["Red".to_string(), "Yellow".to_string()],
                vec!['\u{1F534}', '\u{1F7E1}'], // Red circle, Yellow circle emoji
            )
            .with_description("Drop discs to connect four in a row!")
            .with_board_type("drop_column")
    }

    fn initial_state(&self) -> Self::State {
        State::new()
    }

    fn current_seat(state: &Self::State) -> Seat {
        state.current
    }

    fn legal_mask(state: &Self::State) -> Vec<bool> {
        if state.is_done() {
            return vec![false; COLS];
        }
        state
            .column_heights
            .iter()
            .map(|&height| height < ROWS as u8)
            .collect()
    }

    fn apply(state: &mut Self::State, action: usize) {
        *state = state.drop_piece(action);
    }

    fn outcome(state: &Self::State) -> Option<Outcome> {
        state.outcome
    }

    fn observe(state: &Self::State) -> Observation {
        let mut obs = Observation::zeros(ROWS, COLS, CHANNELS);
        for row in 0..ROWS {
            for col in 0..COLS {
                if let Some(owner) = state.cell(col, row) {
                    mark_two_planes(&mut obs, obs_row(row), col, owner, state.current);
                }
            }
        }
        obs
    }

    fn decode_board(obs: &Observation, current: Seat) -> Result<DisplayBoard, CodecError> {
        // Observation rows are already top-down, which is the display order
        let cells = decode_two_planes(obs, ROWS, COLS, current)?;
        Ok(DisplayBoard {
            rows: ROWS,
            cols: COLS,
            cells,
        })
    }

    fn encode_intent(intent: &MoveIntent, _current: Seat, action_mask: &[bool]) -> Encoded {
        match intent {
            MoveIntent::Column { column } => Encoded::checked(*column, action_mask),
            _ => Encoded::NotLegal,
        }
    }

    fn describe_action(_state: &Self::State, action: usize) -> String {
        format!("column {}", action)
    }
}

#[cfg(test)]
mod tests;
