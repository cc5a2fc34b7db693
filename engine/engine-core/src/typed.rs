//! Typed Game trait providing ergonomic interface for game developers
//!
//! A game implements its rules over a strongly-typed `State` together with the
//! pure codec functions that translate its agent-relative observation and
//! action ids to and from the client-facing view. `GameAdapter` turns any
//! implementation into the uniform, state-owning `ErasedGame` engine.

use crate::board_game::Seat;
use crate::codec::{CodecError, DisplayBoard, Encoded, MoveIntent};
use crate::game_type::GameType;
use crate::metadata::GameMetadata;
use crate::observation::Observation;

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Seat),
    Draw,
}

/// Main trait for game implementations
///
/// Rule functions take the state explicitly so they stay pure; the adapter is
/// the only owner and mutator of the state. Codec functions take only explicit
/// inputs and never consult hidden state.
///
/// Contract expected by the adapter:
/// - `legal_mask` has exactly `metadata().num_actions` entries and is all-false
///   once `outcome` is `Some`
/// - `apply` is only called with an action marked legal, and always passes the
///   turn to the other seat (also on the final move)
/// - `observe` is relative to `current_seat`
pub trait Game: Send + Sync + std::fmt::Debug + 'static {
    /// Game state type
    type State: Clone + Send + Sync + std::fmt::Debug + 'static;

    /// Which game this is
    fn game_type(&self) -> GameType;

    /// Get game metadata for UI and configuration
    fn metadata(&self) -> GameMetadata;

    /// State at the start of a game
    fn initial_state(&self) -> Self::State;

    /// Seat whose turn it is
    fn current_seat(state: &Self::State) -> Seat;

    /// Legal-action mask aligned with the fixed action space
    fn legal_mask(state: &Self::State) -> Vec<bool>;

    /// Apply a legal action for the current seat and pass the turn
    fn apply(state: &mut Self::State, action: usize);

    /// `Some` once the game has ended
    fn outcome(state: &Self::State) -> Option<Outcome>;

    /// Agent-relative observation for the current seat
    fn observe(state: &Self::State) -> Observation;

    // Codec hooks

    /// Decode an observation taken while `current` was to move into an absolute board
    fn decode_board(obs: &Observation, current: Seat) -> Result<DisplayBoard, CodecError>;

    /// Encode a client move intent for `current` into a legal action id
    fn encode_intent(intent: &MoveIntent, current: Seat, action_mask: &[bool]) -> Encoded;

    /// Human-readable form of `action` played from `state`
    fn describe_action(state: &Self::State, action: usize) -> String;
}
