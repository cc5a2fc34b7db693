//! Engine context providing a high-level API for one running game
//!
//! `EngineContext` wraps an `ErasedGame` looked up from the registry and
//! bundles the engine with its codec, so callers can move between the
//! engine's observation/action contract and client-facing boards and moves.

use crate::board_game::Seat;
use crate::codec::{CodecError, DisplayBoard, Encoded, MoveIntent};
use crate::erased::{EngineError, ErasedGame, Snapshot, StepOutcome};
use crate::game_type::GameType;
use crate::metadata::GameMetadata;
use crate::registry::create_game;

/// High-level handle on a single game engine
///
/// # Example
///
/// ```rust,ignore
/// use engine_core::{EngineContext, GameType};
///
/// let mut ctx = EngineContext::new(GameType::TicTacToe).expect("game not registered");
/// let start = ctx.reset();
/// let outcome = ctx.step(start.valid_actions()[0]).unwrap();
/// let board = ctx.board().unwrap();
/// ```
#[derive(Debug)]
pub struct EngineContext {
    game: Box<dyn ErasedGame>,
}

impl EngineContext {
    /// Create a context for a registered game, positioned at the start
    ///
    /// Returns `None` if `game_type` is not registered.
    pub fn new(game_type: GameType) -> Option<Self> {
        create_game(game_type).map(Self::from_game)
    }

    /// Same as [`EngineContext::new`] but reports a missing game as an error
    pub fn try_new(game_type: GameType) -> Result<Self, EngineError> {
        Self::new(game_type).ok_or(EngineError::NotRegistered(game_type))
    }

    /// Create a context from an existing game instance
    pub fn from_game(game: Box<dyn ErasedGame>) -> Self {
        Self { game }
    }

    pub fn game_type(&self) -> GameType {
        self.game.game_type()
    }

    pub fn metadata(&self) -> GameMetadata {
        self.game.metadata()
    }

    /// Reset the game to its initial position
    pub fn reset(&mut self) -> Snapshot {
        self.game.reset()
    }

    /// Apply one action for the current player
    pub fn step(&mut self, action: usize) -> Result<StepOutcome, EngineError> {
        self.game.step(action)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.game.snapshot()
    }

    pub fn is_done(&self) -> bool {
        self.game.is_done()
    }

    pub fn current_player(&self) -> Seat {
        self.game.snapshot().current_player
    }

    /// Decode the current observation into an absolute display board
    pub fn board(&self) -> Result<DisplayBoard, CodecError> {
        let snapshot = self.game.snapshot();
        self.game
            .decode_board(&snapshot.observation, snapshot.current_player)
    }

    /// Decode an arbitrary snapshot with this game's codec
    pub fn decode(&self, snapshot: &Snapshot) -> Result<DisplayBoard, CodecError> {
        self.game
            .decode_board(&snapshot.observation, snapshot.current_player)
    }

    /// Encode a move intent for the current player against the current mask
    pub fn encode_intent(&self, intent: &MoveIntent) -> Encoded {
        let snapshot = self.game.snapshot();
        self.game
            .encode_intent(intent, snapshot.current_player, &snapshot.action_mask)
    }

    /// Describe an action legal in the current position
    pub fn describe_action(&self, action: usize) -> String {
        self.game.describe_action(action)
    }

    /// Get access to the underlying erased game
    pub fn game(&self) -> &dyn ErasedGame {
        self.game.as_ref()
    }

    /// Get mutable access to the underlying erased game
    pub fn game_mut(&mut self) -> &mut dyn ErasedGame {
        self.game.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::GameAdapter;
    use crate::registry::{clear_registry, register_game};
    use crate::test_utils::{ClaimGame, REGISTRY_TEST_MUTEX};

    fn setup_registry() {
        clear_registry();
        register_game(GameType::TicTacToe, || Box::new(GameAdapter::new(ClaimGame)));
    }

    #[test]
    fn test_context_creation() {
        let _guard = REGISTRY_TEST_MUTEX.lock().unwrap();
        setup_registry();

        let ctx = EngineContext::new(GameType::TicTacToe).unwrap();
        assert_eq!(ctx.game_type(), GameType::TicTacToe);
        assert_eq!(ctx.metadata().num_actions, 3);
        assert_eq!(ctx.current_player(), Seat::First);
    }

    #[test]
    fn test_context_nonexistent_game() {
        let _guard = REGISTRY_TEST_MUTEX.lock().unwrap();
        setup_registry();

        assert!(EngineContext::new(GameType::Chess).is_none());
        assert_eq!(
            EngineContext::try_new(GameType::Chess).unwrap_err(),
            EngineError::NotRegistered(GameType::Chess)
        );
    }

    #[test]
    fn test_context_step_and_board() {
        let _guard = REGISTRY_TEST_MUTEX.lock().unwrap();
        setup_registry();

        let mut ctx = EngineContext::new(GameType::TicTacToe).unwrap();
        ctx.reset();
        ctx.step(0).unwrap();

        // Absolute ids survive the perspective flip
        assert_eq!(ctx.board().unwrap().cells, vec![vec![1, 0, 0]]);
        ctx.step(2).unwrap();
        assert_eq!(ctx.board().unwrap().cells, vec![vec![1, 0, 2]]);

        let snapshot = ctx.snapshot();
        assert_eq!(ctx.decode(&snapshot).unwrap(), ctx.board().unwrap());
    }

    #[test]
    fn test_context_encode_intent_uses_current_mask() {
        let _guard = REGISTRY_TEST_MUTEX.lock().unwrap();
        setup_registry();

        let mut ctx = EngineContext::new(GameType::TicTacToe).unwrap();
        ctx.step(1).unwrap();

        assert_eq!(
            ctx.encode_intent(&MoveIntent::Cell { col: 1, row: 0 }),
            Encoded::NotLegal
        );
        assert_eq!(
            ctx.encode_intent(&MoveIntent::Cell { col: 2, row: 0 }),
            Encoded::Action(2)
        );
        assert_eq!(ctx.encode_intent(&MoveIntent::Column { column: 0 }), Encoded::NotLegal);
    }

    #[test]
    fn test_context_full_episode() {
        let _guard = REGISTRY_TEST_MUTEX.lock().unwrap();
        setup_registry();

        let mut ctx = EngineContext::new(GameType::TicTacToe).unwrap();
        let mut snapshot = ctx.reset();
        let mut steps = 0;
        while !snapshot.done {
            let action = snapshot.valid_actions()[0];
            snapshot = ctx.step(action).unwrap().snapshot;
            steps += 1;
        }

        assert_eq!(steps, 3);
        assert!(ctx.is_done());
        assert_eq!(ctx.step(1).unwrap_err(), EngineError::Terminated);
    }
}
