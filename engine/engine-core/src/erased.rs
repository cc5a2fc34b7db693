//! Erased Game interface for runtime polymorphism
//!
//! This trait is the uniform engine contract every session drives, regardless
//! of which game sits behind it. Typed games are converted to it by
//! `GameAdapter`, enabling dynamic dispatch in the registry system.

use crate::board_game::Seat;
use crate::codec::{CodecError, DisplayBoard, Encoded, MoveIntent};
use crate::game_type::GameType;
use crate::game_utils::valid_actions;
use crate::metadata::GameMetadata;
use crate::observation::Observation;

/// Runtime error for engine operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Illegal action {action}: not in the current legal action set")]
    IllegalAction { action: usize },
    #[error("Game has already terminated")]
    Terminated,
    #[error("Game '{0}' is not registered")]
    NotRegistered(GameType),
}

/// What a client or policy sees of the engine at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Agent-relative observation for `current_player`
    pub observation: Observation,
    /// Legal-action mask over the fixed action space (all false once done)
    pub action_mask: Vec<bool>,
    /// Seat that acts next
    pub current_player: Seat,
    /// Whether the game has ended
    pub done: bool,
}

impl Snapshot {
    /// Sparse form of `action_mask`
    pub fn valid_actions(&self) -> Vec<usize> {
        valid_actions(&self.action_mask)
    }

    /// Whether `action` is currently legal
    pub fn is_legal(&self, action: usize) -> bool {
        self.action_mask.get(action).copied().unwrap_or(false)
    }
}

/// Result of a step operation
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Engine view after the action
    pub snapshot: Snapshot,
    /// Reward for the seat that now acts next
    pub reward: f32,
    /// Whether the episode has terminated
    pub done: bool,
}

/// Erased game trait owning one game's state
///
/// All mutation is confined to the implementing instance; there is no
/// shared global state between engines.
pub trait ErasedGame: Send + Sync + std::fmt::Debug + 'static {
    /// Which game this engine runs
    fn game_type(&self) -> GameType;

    /// Get game metadata for UI and configuration
    fn metadata(&self) -> GameMetadata;

    /// Reset the engine to the start of a game
    fn reset(&mut self) -> Snapshot;

    /// Apply a legal action for the current player and advance the turn
    ///
    /// # Errors
    ///
    /// - `EngineError::Terminated` if the game already ended
    /// - `EngineError::IllegalAction` if `action` is not in the legal set
    ///
    /// Neither error mutates the engine.
    fn step(&mut self, action: usize) -> Result<StepOutcome, EngineError>;

    /// Current view without mutating anything
    fn snapshot(&self) -> Snapshot;

    /// Whether the game has ended
    fn is_done(&self) -> bool;

    /// Decode an observation into an absolute display board
    fn decode_board(&self, obs: &Observation, current: Seat) -> Result<DisplayBoard, CodecError>;

    /// Encode a client move intent against a legal-action mask
    fn encode_intent(&self, intent: &MoveIntent, current: Seat, action_mask: &[bool]) -> Encoded;

    /// Human-readable form of `action` played from the current position
    ///
    /// Call before `step`: the description may depend on the position the
    /// action is played from (e.g. chess promotions).
    fn describe_action(&self, action: usize) -> String;
}
