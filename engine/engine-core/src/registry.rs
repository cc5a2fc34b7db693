//! Static game registry for runtime game lookup
//!
//! This module provides a thread-safe registry that maps each `GameType` to
//! a factory producing a fresh engine positioned at the start of a game.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::warn;

use crate::erased::ErasedGame;
use crate::game_type::GameType;

/// Factory function type for creating game instances
pub type GameFactory = fn() -> Box<dyn ErasedGame>;

/// Thread-safe registry mapping game type to factory functions
static REGISTRY: Lazy<Mutex<HashMap<GameType, GameFactory>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn registry() -> MutexGuard<'static, HashMap<GameType, GameFactory>> {
    // The map holds plain function pointers, so a poisoned lock is still consistent
    REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Register a game with the global registry
///
/// Registering the same game type twice replaces the earlier factory.
///
/// # Example
///
/// ```rust,ignore
/// fn tictactoe_factory() -> Box<dyn ErasedGame> {
///     Box::new(GameAdapter::new(TicTacToe::new()))
/// }
///
/// register_game(GameType::TicTacToe, tictactoe_factory);
/// ```
pub fn register_game(game_type: GameType, factory: GameFactory) {
    let mut registry = registry();
    if registry.contains_key(&game_type) {
        warn!(game = %game_type, "Overriding existing game registration");
    }
    registry.insert(game_type, factory);
}

/// Create a new engine for `game_type`
///
/// Returns `None` if no factory is registered for it.
pub fn create_game(game_type: GameType) -> Option<Box<dyn ErasedGame>> {
    let registry = registry();
    match registry.get(&game_type) {
        Some(factory) => Some(factory()),
        None => {
            warn!(game = %game_type, "Attempted to create unregistered game");
            None
        }
    }
}

/// Get all registered game types, in declaration order
pub fn list_registered_games() -> Vec<GameType> {
    let registry = registry();
    GameType::ALL
        .iter()
        .copied()
        .filter(|game_type| registry.contains_key(game_type))
        .collect()
}

/// Check if a game is registered
pub fn is_registered(game_type: GameType) -> bool {
    registry().contains_key(&game_type)
}

/// Clear all registered games (mainly for testing)
pub fn clear_registry() {
    registry().clear();
}

/// Convenience macro for registering games with a `Default` implementation
///
/// ```ignore
/// register_game!(TicTacToe, GameType::TicTacToe);
/// ```
#[macro_export]
macro_rules! register_game {
    ($game:ty, $game_type:expr) => {{
        fn factory() -> Box<dyn $crate::erased::ErasedGame> {
            Box::new($crate::adapter::GameAdapter::new(<$game>::default()))
        }
        $crate::registry::register_game($game_type, factory);
    }};
}
