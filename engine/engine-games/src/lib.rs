//! Game registration
//!
//! This crate provides a single initialization point for registering all
//! available games with the engine-core registry.
//!
//! # Usage
//!
//! ```rust
//! use engine_games::register_all_games;
//!
//! // Call once at startup - safe to call multiple times
//! register_all_games();
//! ```

use std::sync::Once;

static INIT: Once = Once::new();

/// Register all available games with the engine-core registry.
///
/// This function uses `std::sync::Once` to ensure registration only
/// happens once, even if called multiple times. Safe to call from
/// multiple threads.
///
/// Currently registers:
/// - Connect Four (`connect_four`)
/// - Tic-Tac-Toe (`tic_tac_toe`)
/// - Chess (`chess`)
pub fn register_all_games() {
    INIT.call_once(|| {
        games_connect4::register_connect4();
        games_tictactoe::register_tictactoe();
        games_chess::register_chess();
    });
}

// Re-export individual registration functions for advanced use cases
pub use games_chess::register_chess;
pub use games_connect4::register_connect4;
pub use games_tictactoe::register_tictactoe;
