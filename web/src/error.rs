//! Session-level errors and their HTTP status codes.

use axum::http::StatusCode;
use engine_core::{CodecError, EngineError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Game not found: {0}. Use /games to list available games.")]
    UnknownGame(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Illegal move: action {action} is not in the legal action set")]
    IllegalAction { action: usize },

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Game is already over")]
    Terminated,

    #[error("Invalid session state: {0}")]
    InvalidState(String),

    #[error("Policy returned illegal action {action}")]
    PolicyContractViolation { action: usize },

    #[error("Policy failed: {0}")]
    Policy(String),

    #[error("Policy did not answer within {0} ms")]
    PolicyTimeout(u64),

    #[error("Session limit of {0} reached")]
    CapacityExceeded(usize),

    #[error("Board decode failed: {0}")]
    Codec(#[from] CodecError),

    #[error("Engine error: {0}")]
    Engine(EngineError),
}

impl From<EngineError> for SessionError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::IllegalAction { action } => SessionError::IllegalAction { action },
            EngineError::Terminated => SessionError::Terminated,
            other => SessionError::Engine(other),
        }
    }
}

impl SessionError {
    pub fn status(&self) -> StatusCode {
        match self {
            SessionError::BadRequest(_)
            | SessionError::IllegalAction { .. }
            | SessionError::IllegalMove(_) => StatusCode::BAD_REQUEST,
            SessionError::NotFound(_) | SessionError::UnknownGame(_) => StatusCode::NOT_FOUND,
            SessionError::Terminated | SessionError::InvalidState(_) => StatusCode::CONFLICT,
            SessionError::PolicyContractViolation { .. }
            | SessionError::Policy(_)
            | SessionError::Codec(_)
            | SessionError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SessionError::CapacityExceeded(_) => StatusCode::SERVICE_UNAVAILABLE,
            SessionError::PolicyTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<SessionError> for (StatusCode, String) {
    fn from(err: SessionError) -> Self {
        (err.status(), err.to_string())
    }
}
