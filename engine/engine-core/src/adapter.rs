//! Adapter layer converting typed games to the erased engine interface
//!
//! `GameAdapter` owns the typed state of one game and enforces the engine
//! contract on top of the game's rule functions: legality and termination
//! checks, the next-player-relative reward convention, and the all-false
//! mask after the game ends.

use tracing::trace;

use crate::board_game::Seat;
use crate::codec::{CodecError, DisplayBoard, Encoded, MoveIntent};
use crate::erased::{EngineError, ErasedGame, Snapshot, StepOutcome};
use crate::game_type::GameType;
use crate::game_utils::reward_for_next;
use crate::metadata::GameMetadata;
use crate::observation::Observation;
use crate::typed::Game;

/// Adapter that converts typed games to the erased interface
///
/// ```rust,ignore
/// let mut engine: Box<dyn ErasedGame> = Box::new(GameAdapter::new(TicTacToe::new()));
/// let start = engine.reset();
/// let outcome = engine.step(start.valid_actions()[0])?;
/// ```
#[derive(Debug)]
pub struct GameAdapter<T: Game> {
    game: T,
    state: T::State,
}

impl<T: Game> GameAdapter<T> {
    /// Create a new adapter wrapping the given game, positioned at the start
    pub fn new(game: T) -> Self {
        let state = game.initial_state();
        Self { game, state }
    }

    /// Create an adapter positioned at an arbitrary state
    pub fn with_state(game: T, state: T::State) -> Self {
        Self { game, state }
    }

    /// Get a reference to the underlying game
    pub fn game(&self) -> &T {
        &self.game
    }

    /// Get a reference to the current typed state
    pub fn state(&self) -> &T::State {
        &self.state
    }

    /// Consume the adapter and return the underlying game
    pub fn into_inner(self) -> T {
        self.game
    }

    fn mask(&self) -> Vec<bool> {
        let mask = T::legal_mask(&self.state);
        if T::outcome(&self.state).is_some() {
            vec![false; mask.len()]
        } else {
            mask
        }
    }
}

impl<T: Game> ErasedGame for GameAdapter<T> {
    fn game_type(&self) -> GameType {
        self.game.game_type()
    }

    fn metadata(&self) -> GameMetadata {
        self.game.metadata()
    }

    fn reset(&mut self) -> Snapshot {
        self.state = self.game.initial_state();
        self.snapshot()
    }

    fn step(&mut self, action: usize) -> Result<StepOutcome, EngineError> {
        if T::outcome(&self.state).is_some() {
            return Err(EngineError::Terminated);
        }

        let legal = T::legal_mask(&self.state);
        if !legal.get(action).copied().unwrap_or(false) {
            return Err(EngineError::IllegalAction { action });
        }

        let mover = T::current_seat(&self.state);
        T::apply(&mut self.state, action);

        let outcome = T::outcome(&self.state);
        let next = T::current_seat(&self.state);
        let reward = reward_for_next(outcome, next);
        trace!(game = %self.game.game_type(), action, ?mover, ?outcome, "engine step");

        Ok(StepOutcome {
            snapshot: self.snapshot(),
            reward,
            done: outcome.is_some(),
        })
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            observation: T::observe(&self.state),
            action_mask: self.mask(),
            current_player: T::current_seat(&self.state),
            done: T::outcome(&self.state).is_some(),
        }
    }

    fn is_done(&self) -> bool {
        T::outcome(&self.state).is_some()
    }

    fn decode_board(&self, obs: &Observation, current: Seat) -> Result<DisplayBoard, CodecError> {
        T::decode_board(obs, current)
    }

    fn encode_intent(&self, intent: &MoveIntent, current: Seat, action_mask: &[bool]) -> Encoded {
        T::encode_intent(intent, current, action_mask)
    }

    fn describe_action(&self, action: usize) -> String {
        T::describe_action(&self.state, action)
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
