//! HTTP request handlers.

mod game;
mod health;

pub use game::*;
pub use health::*;
