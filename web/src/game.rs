//! Game session state machine
//!
//! A session wraps one `EngineContext` and remembers which seat the human
//! occupies. Its phase is derived from the engine snapshot:
//!
//! - `Terminal` once the engine reports `done`
//! - `AwaitingHumanMove` while the human's seat is to move
//! - `AwaitingAiMove` otherwise
//!
//! Every rejected call leaves the engine untouched.

use engine_core::{
    DisplayBoard, EngineContext, GameMetadata, GameType, MoveIntent, Observation, Seat, Snapshot,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::error::SessionError;
use crate::metrics;
use crate::types::{AiMoveResponse, GameStateResponse, MoveResponse, StartGameResponse};

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingHumanMove,
    AwaitingAiMove,
    Terminal,
}

/// One applied move and the position it produced.
#[derive(Debug, Clone)]
pub struct MoveRecord {
    pub action: usize,
    /// Human-readable move, described in the position it was played from
    pub description: String,
    pub snapshot: Snapshot,
    pub reward: f32,
    pub done: bool,
}

/// A game session tracking one human against the AI seat
#[derive(Debug)]
pub struct GameSession {
    id: String,
    game_type: GameType,
    ctx: EngineContext,
    metadata: GameMetadata,
    human_seat: Seat,
    snapshot: Snapshot,
    moves_played: usize,
    last_activity: Instant,
}

impl GameSession {
    /// Create a session positioned at the start of the game.
    pub fn new(id: String, game_type: GameType, human_plays_first: bool) -> Result<Self, SessionError> {
        let mut ctx = EngineContext::new(game_type)
            .ok_or_else(|| SessionError::UnknownGame(game_type.to_string()))?;
        let snapshot = ctx.reset();
        let metadata = ctx.metadata();
        let human_seat = if human_plays_first {
            Seat::First
        } else {
            Seat::Second
        };

        Ok(Self {
            id,
            game_type,
            ctx,
            metadata,
            human_seat,
            snapshot,
            moves_played: 0,
            last_activity: Instant::now(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    pub fn human_seat(&self) -> Seat {
        self.human_seat
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn moves_played(&self) -> usize {
        self.moves_played
    }

    pub fn phase(&self) -> Phase {
        if self.snapshot.done {
            Phase::Terminal
        } else if self.snapshot.current_player == self.human_seat {
            Phase::AwaitingHumanMove
        } else {
            Phase::AwaitingAiMove
        }
    }

    /// Mark the session as used now.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }

    fn ensure_human_turn(&self) -> Result<(), SessionError> {
        match self.phase() {
            Phase::AwaitingHumanMove => Ok(()),
            Phase::Terminal => Err(SessionError::Terminated),
            Phase::AwaitingAiMove => Err(SessionError::InvalidState(
                "waiting for the AI move".to_string(),
            )),
        }
    }

    /// Apply a raw action id for the human seat.
    pub fn apply_human_move(&mut self, action: usize) -> Result<MoveRecord, SessionError> {
        self.touch();
        self.ensure_human_turn()?;
        if !self.snapshot.is_legal(action) {
            return Err(SessionError::IllegalAction { action });
        }
        self.step(action)
    }

    /// Encode a structured move for the human seat and apply it.
    pub fn apply_human_intent(&mut self, intent: &MoveIntent) -> Result<MoveRecord, SessionError> {
        self.touch();
        self.ensure_human_turn()?;
        match self.ctx.encode_intent(intent).action() {
            Some(action) => self.apply_human_move(action),
            None => Err(SessionError::IllegalMove(format!(
                "{} is not a legal move",
                describe_intent(intent)
            ))),
        }
    }

    /// Observation and mask handed to the policy for the seat to move.
    pub fn policy_inputs(&self) -> Result<(Observation, Vec<bool>), SessionError> {
        if self.snapshot.done {
            return Err(SessionError::Terminated);
        }
        Ok((
            self.snapshot.observation.clone(),
            self.snapshot.action_mask.clone(),
        ))
    }

    /// Apply an action chosen by the policy.
    ///
    /// An action outside the legal set is a policy defect and is never
    /// replaced by a fallback move.
    pub fn apply_ai_action(&mut self, action: usize) -> Result<MoveRecord, SessionError> {
        self.touch();
        if self.snapshot.done {
            return Err(SessionError::Terminated);
        }
        if !self.snapshot.is_legal(action) {
            metrics::POLICY_FAILURES.inc();
            error!(
                session_id = %self.id,
                game = %self.game_type,
                action,
                "Policy returned an action outside the legal set"
            );
            return Err(SessionError::PolicyContractViolation { action });
        }
        self.step(action)
    }

    fn step(&mut self, action: usize) -> Result<MoveRecord, SessionError> {
        // Described before stepping: chess needs the pre-move position.
        let description = self.ctx.describe_action(action);
        let mover = self.snapshot.current_player;
        let outcome = self.ctx.step(action)?;

        self.snapshot = outcome.snapshot.clone();
        self.moves_played += 1;
        metrics::MOVES_PLAYED.inc();
        debug!(
            session_id = %self.id,
            player = self.metadata.label(mover),
            action,
            mv = %description,
            "Move applied"
        );

        if outcome.done {
            metrics::GAMES_COMPLETED.inc();
            info!(
                session_id = %self.id,
                game = %self.game_type,
                moves = self.moves_played,
                last_mover = self.metadata.label(mover),
                reward = outcome.reward,
                "Game finished"
            );
        }

        Ok(MoveRecord {
            action,
            description,
            snapshot: outcome.snapshot,
            reward: outcome.reward,
            done: outcome.done,
        })
    }

    /// Absolute board for the current position.
    pub fn board(&self) -> Result<DisplayBoard, SessionError> {
        Ok(self.ctx.decode(&self.snapshot)?)
    }

    fn label(&self, seat: Seat) -> String {
        self.metadata.label(seat).to_string()
    }

    pub fn to_start_response(
        &self,
        opening: Option<MoveRecord>,
    ) -> Result<StartGameResponse, SessionError> {
        Ok(StartGameResponse {
            session_id: self.id.clone(),
            game_type: self.game_type,
            current_player: self.label(self.snapshot.current_player),
            human_player: self.label(self.human_seat),
            observation: self.snapshot.observation.to_nested(),
            action_mask: self.snapshot.action_mask.clone(),
            valid_actions: self.snapshot.valid_actions(),
            done: self.snapshot.done,
            board: self.board()?,
            ai_action: opening.as_ref().map(|record| record.action),
            ai_move: opening.map(|record| record.description),
        })
    }

    pub fn to_move_response(&self, record: MoveRecord) -> Result<MoveResponse, SessionError> {
        let board = self.ctx.decode(&record.snapshot)?;
        Ok(MoveResponse {
            action: record.action,
            description: record.description,
            valid_actions: record.snapshot.valid_actions(),
            current_player: self.label(record.snapshot.current_player),
            observation: record.snapshot.observation.to_nested(),
            action_mask: record.snapshot.action_mask,
            reward: record.reward,
            done: record.done,
            board,
        })
    }

    pub fn to_ai_move_response(&self, record: MoveRecord) -> Result<AiMoveResponse, SessionError> {
        let board = self.ctx.decode(&record.snapshot)?;
        Ok(AiMoveResponse {
            ai_action: record.action,
            ai_move: record.description,
            valid_actions: record.snapshot.valid_actions(),
            current_player: self.label(record.snapshot.current_player),
            observation: record.snapshot.observation.to_nested(),
            action_mask: record.snapshot.action_mask,
            done: record.done,
            reward: record.reward,
            board,
        })
    }

    pub fn to_state_response(&self) -> Result<GameStateResponse, SessionError> {
        Ok(GameStateResponse {
            session_id: self.id.clone(),
            game_type: self.game_type,
            current_player: self.label(self.snapshot.current_player),
            human_player: self.label(self.human_seat),
            phase: self.phase(),
            observation: self.snapshot.observation.to_nested(),
            action_mask: self.snapshot.action_mask.clone(),
            valid_actions: self.snapshot.valid_actions(),
            done: self.snapshot.done,
            moves_played: self.moves_played,
            board: self.board()?,
        })
    }
}

fn describe_intent(intent: &MoveIntent) -> String {
    match intent {
        MoveIntent::Column { column } => format!("column {}", column),
        MoveIntent::Cell { col, row } => format!("col {}, row {}", col, row),
        MoveIntent::Squares {
            from,
            to,
            promotion,
        } => match promotion {
            Some(piece) => format!("{}{}{}", from, to, piece),
            None => format!("{}{}", from, to),
        },
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod tests;
