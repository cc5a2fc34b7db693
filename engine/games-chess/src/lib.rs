//! Chess game implementation
//!
//! Move generation and check detection come from the `chess` crate; this crate
//! adds the draw rules a complete game needs (threefold repetition, the
//! fifty-move rule, insufficient material), the 8x8x111 observation and the
//! 4672-action move-plane codec.
//!
//! White is the first seat. Every move passes the turn, so after checkmate the
//! side to move is the side that lost.
//!
//! # Usage
//!
//! ```rust
//! use games_chess::register_chess;
//! use engine_core::{EngineContext, GameType, MoveIntent};
//!
//! register_chess();
//!
//! let mut ctx = EngineContext::new(GameType::Chess).expect("chess should be registered");
//! let start = ctx.reset();
//! assert_eq!(start.valid_actions().len(), 20);
//!
//! let intent = MoveIntent::Squares { from: "e2".into(), to: "e4".into(), promotion: None };
//! assert_eq!(ctx.encode_intent(&intent).action(), Some(2410));
//! ```

use std::fmt;
use std::str::FromStr;

use chess::{Board, BoardStatus, ChessMove, Color, MoveGen, Piece};
use engine_core::game_utils::mask_from_actions;
use engine_core::{
    register_game, CodecError, DisplayBoard, Encoded, Game, GameAdapter, GameMetadata, GameType,
    MoveIntent, Observation, Outcome, Seat,
};
use tracing::warn;

pub mod moves;
pub mod observation;

pub use moves::{move_to_action, NUM_ACTIONS};
pub use observation::{piece_code, CHANNELS};

/// Halfmove clock value that ends the game under the fifty-move rule
pub const FIFTY_MOVE_PLIES: u32 = 100;

/// Register Chess with the global game registry
pub fn register_chess() {
    register_game(GameType::Chess, || Box::new(GameAdapter::new(Chess::new())));
}

#[inline]
pub fn color_for(seat: Seat) -> Color {
    match seat {
        Seat::First => Color::White,
        Seat::Second => Color::Black,
    }
}

#[inline]
pub fn seat_for(color: Color) -> Seat {
    match color {
        Color::White => Seat::First,
        Color::Black => Seat::Second,
    }
}

/// Chess game state
#[derive(Clone)]
pub struct State {
    pub(crate) board: Board,
    pub(crate) halfmove_clock: u32,
    /// Every position since the start, current position last
    pub(crate) history: Vec<Board>,
    outcome: Option<Outcome>,
}

impl State {
    /// Standard starting position
    pub fn new() -> Self {
        Self::from_board(Board::default(), 0)
    }

    /// Position from a FEN string, including its halfmove clock
    ///
    /// Returns `None` if the `chess` crate rejects the position.
    pub fn from_fen(fen: &str) -> Option<Self> {
        let board = Board::from_str(fen).ok()?;
        let halfmove_clock = fen
            .split_whitespace()
            .nth(4)
            .and_then(|clock| clock.parse().ok())
            .unwrap_or(0);
        Some(Self::from_board(board, halfmove_clock))
    }

    fn from_board(board: Board, halfmove_clock: u32) -> Self {
        let mut state = Self {
            board,
            halfmove_clock,
            history: vec![board],
            outcome: None,
        };
        state.outcome = state.evaluate();
        state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_done(&self) -> bool {
        self.outcome.is_some()
    }

    /// Number of plies played
    pub fn plies(&self) -> usize {
        self.history.len() - 1
    }

    /// Legal engine moves (none once the game ended)
    pub fn legal_moves(&self) -> Vec<ChessMove> {
        if self.is_done() {
            return Vec::new();
        }
        MoveGen::new_legal(&self.board).collect()
    }

    /// Legal move encoded as `action`, if any
    pub fn move_for_action(&self, action: usize) -> Option<ChessMove> {
        let mover = self.side_to_move();
        self.legal_moves()
            .into_iter()
            .find(|&mv| move_to_action(mv, mover) == Some(action))
    }

    /// How often the current position has occurred, including now
    pub fn repetitions(&self) -> usize {
        let hash = self.board.get_hash();
        self.history
            .iter()
            .filter(|board| board.get_hash() == hash)
            .count()
    }

    /// Play a legal move
    pub fn play(&mut self, mv: ChessMove) {
        let resets_clock = self.board.piece_on(mv.get_source()) == Some(Piece::Pawn)
            || self.board.piece_on(mv.get_dest()).is_some();

        self.board = self.board.make_move_new(mv);
        self.halfmove_clock = if resets_clock {
            0
        } else {
            self.halfmove_clock + 1
        };
        self.history.push(self.board);
        self.outcome = self.evaluate();
    }

    fn evaluate(&self) -> Option<Outcome> {
        match self.board.status() {
            BoardStatus::Checkmate => {
                return Some(Outcome::Winner(seat_for(!self.board.side_to_move())))
            }
            BoardStatus::Stalemate => return Some(Outcome::Draw),
            BoardStatus::Ongoing => {}
        }

        if self.halfmove_clock >= FIFTY_MOVE_PLIES
            || self.repetitions() >= 3
            || insufficient_material(&self.board)
        {
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

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("fen", &self.board.to_string())
            .field("halfmove_clock", &self.halfmove_clock)
            .field("plies", &self.plies())
            .field("outcome", &self.outcome)
            .finish()
    }
}

/// Bare kings, kings plus a single minor piece, or any number of bishops that
/// all stand on squares of one colour
pub fn insufficient_material(board: &Board) -> bool {
    let heavy = *board.pieces(Piece::Pawn) | *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);
    if heavy.popcnt() > 0 {
        return false;
    }
    let knights = *board.pieces(Piece::Knight);
    let bishops = *board.pieces(Piece::Bishop);
    if (knights | bishops).popcnt() <= 1 {
        return true;
    }
    if knights.popcnt() > 0 {
        return false;
    }
    let mut colours = bishops.map(|sq| (sq.get_file().to_index() + sq.get_rank().to_index()) % 2);
    match colours.next() {
        Some(first) => colours.all(|colour| colour == first),
        None => true,
    }
}

/// Chess game implementation
#[derive(Debug, Default)]
pub struct Chess;

impl Chess {
    pub fn new() -> Self {
        Self
    }
}

impl Game for Chess {
    type State = State;

    fn game_type(&self) -> GameType {
        GameType::Chess
    }

    fn metadata(&self) -> GameMetadata {
        GameMetadata::new(GameType::Chess, "Chess")
            .with_board(observation::SIZE, observation::SIZE)
            .with_actions(NUM_ACTIONS)
            .with_observation(observation::SIZE, observation::SIZE, CHANNELS)
            .with_players(
                vec!["White".to_string(), "Black".to_string()],
                vec!['\u{2654}', '\u{265A}'], // White king, black king
            )
            .with_description("Standard chess. Checkmate the opposing king to win.")
            .with_board_type("chess")
    }

    fn initial_state(&self) -> Self::State {
        State::new()
    }

    fn current_seat(state: &Self::State) -> Seat {
        seat_for(state.side_to_move())
    }

    fn legal_mask(state: &Self::State) -> Vec<bool> {
        let mover = state.side_to_move();
        let actions = state.legal_moves().into_iter().filter_map(|mv| {
            let action = move_to_action(mv, mover);
            if action.is_none() {
                warn!(mv = %mv, "legal move has no action encoding");
            }
            action
        });
        mask_from_actions(actions, NUM_ACTIONS)
    }

    fn apply(state: &mut Self::State, action: usize) {
        match state.move_for_action(action) {
            Some(mv) => state.play(mv),
            None => warn!(action, "ignoring action without a legal move"),
        }
    }

    fn outcome(state: &Self::State) -> Option<Outcome> {
        state.outcome
    }

    fn observe(state: &Self::State) -> Observation {
        observation::observe(state)
    }

    fn decode_board(obs: &Observation, current: Seat) -> Result<DisplayBoard, CodecError> {
        observation::decode(obs, current)
    }

    fn encode_intent(intent: &MoveIntent, current: Seat, action_mask: &[bool]) -> Encoded {
        let MoveIntent::Squares {
            from,
            to,
            promotion,
        } = intent
        else {
            return Encoded::NotLegal;
        };
        match moves::intent_action(from, to, *promotion, color_for(current)) {
            Some(action) => Encoded::checked(action, action_mask),
            None => Encoded::NotLegal,
        }
    }

    fn describe_action(state: &Self::State, action: usize) -> String {
        if let Some(mv) = state.move_for_action(action) {
            return moves::uci(mv.get_source(), mv.get_dest(), mv.get_promotion());
        }
        match moves::action_squares(action, state.side_to_move()) {
            Some((from, to, promotion)) => moves::uci(from, to, promotion),
            None => format!("action {}", action),
        }
    }
}
