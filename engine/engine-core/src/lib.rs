//! Core traits and types for the Tabletop game engine
//!
//! This crate provides the fundamental abstractions shared by every game:
//! - `Game`: Typed trait with the rules and the observation/action codec of one game
//! - `GameAdapter`: Owns one game's state and enforces the uniform engine contract
//! - `ErasedGame`: Object-safe engine interface used for runtime polymorphism
//! - `Registry`: Static registration system for games, keyed by `GameType`
//! - `EngineContext`: High-level handle used by sessions to drive one engine

pub mod adapter;
pub mod board_game;
pub mod codec;
pub mod context;
pub mod erased;
pub mod game_type;
pub mod game_utils;
pub mod metadata;
pub mod observation;
pub mod registry;
pub mod typed;

// Re-export main types for convenience
pub use adapter::GameAdapter;
pub use board_game::{owner_of_channel, relative_channel, Seat};
pub use codec::{CodecError, DisplayBoard, Encoded, MoveIntent};
pub use context::EngineContext;
pub use erased::{EngineError, ErasedGame, Snapshot, StepOutcome};
pub use game_type::{GameType, ParseGameTypeError};
pub use metadata::GameMetadata;
pub use observation::Observation;
pub use registry::{
    clear_registry, create_game, is_registered, list_registered_games, register_game, GameFactory,
};
pub use typed::{Game, Outcome};
