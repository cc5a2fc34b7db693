//! Shared utilities for two-player game implementations
//!
//! This module provides common functionality used across multiple game implementations
//! to reduce code duplication and ensure consistent behavior.

use crate::board_game::Seat;
use crate::typed::Outcome;

/// Reward reported by `step`, from the perspective of the seat that acts next.
///
/// The engine reports rewards to the player who is now next to act, not to
/// the player who just moved. A winning move therefore yields `-1.0`.
///
/// # Example
/// ```
/// use engine_core::game_utils::reward_for_next;
/// use engine_core::{Outcome, Seat};
///
/// // First seat just won; second seat acts next and sees a loss
/// assert_eq!(reward_for_next(Some(Outcome::Winner(Seat::First)), Seat::Second), -1.0);
///
/// // Draw
/// assert_eq!(reward_for_next(Some(Outcome::Draw), Seat::First), 0.0);
///
/// // Game ongoing
/// assert_eq!(reward_for_next(None, Seat::First), 0.0);
/// ```
#[inline]
pub fn reward_for_next(outcome: Option<Outcome>, next: Seat) -> f32 {
    match outcome {
        Some(Outcome::Winner(winner)) if winner == next => 1.0,
        Some(Outcome::Winner(_)) => -1.0,
        Some(Outcome::Draw) | None => 0.0,
    }
}

/// Sparse list of legal action ids (indices where the mask is true).
pub fn valid_actions(action_mask: &[bool]) -> Vec<usize> {
    action_mask
        .iter()
        .enumerate()
        .filter_map(|(idx, &legal)| legal.then_some(idx))
        .collect()
}

/// Dense mask of `size` entries with the given actions marked legal.
///
/// Actions outside the action space are ignored.
pub fn mask_from_actions(actions: impl IntoIterator<Item = usize>, size: usize) -> Vec<bool> {
    let mut mask = vec![false; size];
    for action in actions {
        if let Some(slot) = mask.get_mut(action) {
            *slot = true;
        }
    }
    mask
}
