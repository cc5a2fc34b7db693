//! Action selection policies for the AI seat
//!
//! The session layer treats a policy as an opaque function from
//! `(observation, action_mask)` to one action id. It never re-derives
//! legality from the policy's side: an action outside the mask is rejected
//! by the session as a contract violation.

use anyhow::{anyhow, Result};
use engine_core::game_utils::valid_actions;
use engine_core::Observation;
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::central_config::PolicyConfig;

/// Chooses the AI's move.
pub trait Policy: Send + Sync {
    /// Select one action id for the seat to move
    fn select_action(&self, observation: &Observation, action_mask: &[bool]) -> Result<usize>;
}

/// Configured policy implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    Random,
    FirstLegal,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Random => f.write_str("random"),
            PolicyKind::FirstLegal => f.write_str("first_legal"),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "random" => Ok(PolicyKind::Random),
            "first_legal" => Ok(PolicyKind::FirstLegal),
            other => Err(anyhow!("Unknown policy kind: {}", other)),
        }
    }
}

/// Uniform choice over the legal actions.
#[derive(Debug)]
pub struct RandomPolicy {
    rng: Mutex<ChaCha20Rng>,
}

impl RandomPolicy {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for RandomPolicy {
    fn select_action(&self, _observation: &Observation, action_mask: &[bool]) -> Result<usize> {
        let legal = valid_actions(action_mask);
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        legal
            .choose(&mut *rng)
            .copied()
            .ok_or_else(|| anyhow!("No legal actions to choose from"))
    }
}

/// Always plays the lowest legal action id.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalPolicy;

impl Policy for FirstLegalPolicy {
    fn select_action(&self, _observation: &Observation, action_mask: &[bool]) -> Result<usize> {
        action_mask
            .iter()
            .position(|&legal| legal)
            .ok_or_else(|| anyhow!("No legal actions to choose from"))
    }
}

/// Build the configured policy.
pub fn build_policy(config: &PolicyConfig) -> Arc<dyn Policy> {
    info!(kind = %config.kind, seed = ?config.seed, "Building policy");
    match config.kind {
        PolicyKind::Random => match config.seed {
            Some(seed) => Arc::new(RandomPolicy::with_seed(seed)),
            None => Arc::new(RandomPolicy::new()),
        },
        PolicyKind::FirstLegal => Arc::new(FirstLegalPolicy),
    }
}
