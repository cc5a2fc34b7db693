//! Game-related handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use engine_core::{create_game, list_registered_games, GameType};
use prometheus::HistogramTimer;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::SessionError;
use crate::game::{GameSession, MoveRecord};
use crate::metrics;
use crate::types::{
    AiMoveQuery, AiMoveResponse, DeleteResponse, GameInfoResponse, GameStateResponse,
    GamesListResponse, MoveRequest, MoveResponse, StartGameRequest, StartGameResponse,
};
use crate::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

/// Log a rejected request and convert it to an HTTP error.
fn reject(err: SessionError) -> (StatusCode, String) {
    let status = err.status();
    if status.is_server_error() {
        error!(status = status.as_u16(), "Request failed: {}", err);
    } else {
        warn!(status = status.as_u16(), "Request rejected: {}", err);
    }
    err.into()
}

fn parse_game_type(raw: &str) -> Result<GameType, SessionError> {
    raw.parse()
        .map_err(|_| SessionError::UnknownGame(raw.to_string()))
}

/// List all available games.
pub async fn list_games() -> Json<GamesListResponse> {
    Json(GamesListResponse {
        games: list_registered_games(),
    })
}

/// Get metadata for a specific game.
pub async fn get_game_info(Path(raw): Path<String>) -> ApiResult<GameInfoResponse> {
    let game = parse_game_type(&raw)
        .ok()
        .and_then(create_game)
        .ok_or_else(|| SessionError::UnknownGame(raw.clone()))
        .map_err(reject)?;

    Ok(Json(game.metadata().into()))
}

/// Run the policy for the seat to move on a blocking thread, bounded by the
/// configured timeout. The session is only mutated once a legal answer
/// arrives in time.
async fn run_policy(state: &AppState, session: &mut GameSession) -> Result<MoveRecord, SessionError> {
    let (observation, mask) = session.policy_inputs()?;
    let policy = Arc::clone(&state.policy);
    let timeout_ms = state.policy_timeout.as_millis() as u64;

    let timer = metrics::AI_MOVE_SECONDS.start_timer();
    let task = tokio::task::spawn_blocking(move || policy.select_action(&observation, &mask));
    let result = match tokio::time::timeout(state.policy_timeout, task).await {
        Ok(Ok(Ok(action))) => Ok(action),
        Ok(Ok(Err(e))) => Err(SessionError::Policy(e.to_string())),
        Ok(Err(join_err)) => Err(SessionError::Policy(join_err.to_string())),
        Err(_) => Err(SessionError::PolicyTimeout(timeout_ms)),
    };
    finish_policy_timer(timer, &result);
    if result.is_err() {
        metrics::POLICY_FAILURES.inc();
    }
    let action = result?;

    session.apply_ai_action(action)
}

/// Record latency for answered policy calls only.
fn finish_policy_timer<T>(timer: HistogramTimer, result: &Result<T, SessionError>) {
    match result {
        Ok(_) => timer.observe_duration(),
        Err(_) => {
            timer.stop_and_discard();
        }
    }
}

/// Start a new game session.
///
/// When the human plays second the AI's opening move is already applied in
/// the response.
pub async fn start_game(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartGameRequest>,
) -> ApiResult<StartGameResponse> {
    let game_type = parse_game_type(&req.game_type).map_err(reject)?;
    state.sessions.check_capacity().map_err(reject)?;

    let mut session = GameSession::new(state.sessions.new_id(), game_type, req.human_plays_first)
        .map_err(reject)?;
    let opening = if req.human_plays_first {
        None
    } else {
        Some(run_policy(&state, &mut session).await.map_err(reject)?)
    };

    let response = session.to_start_response(opening).map_err(reject)?;
    state.sessions.create(session).map_err(reject)?;
    info!(
        session_id = %response.session_id,
        game = %game_type,
        human_plays_first = req.human_plays_first,
        "Game started"
    );
    Ok(Json(response))
}

/// Apply the human's move, given as a raw action id or a structured move.
pub async fn make_move(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MoveRequest>,
) -> ApiResult<MoveResponse> {
    let shared = state.sessions.get(&req.session_id).map_err(reject)?;
    let mut session = shared.lock().await;

    let record = match (req.action, &req.intent) {
        (Some(action), None) => session.apply_human_move(action),
        (None, Some(intent)) => session.apply_human_intent(intent),
        _ => Err(SessionError::BadRequest(
            "exactly one of `action` or `move` is required".to_string(),
        )),
    }
    .map_err(reject)?;

    Ok(Json(session.to_move_response(record).map_err(reject)?))
}

/// Let the policy play for the seat to move.
pub async fn ai_move(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AiMoveQuery>,
) -> ApiResult<AiMoveResponse> {
    let shared = state.sessions.get(&query.session_id).map_err(reject)?;
    let mut session = shared.lock().await;

    let record = run_policy(&state, &mut session).await.map_err(reject)?;
    Ok(Json(session.to_ai_move_response(record).map_err(reject)?))
}

/// Get the current state of a session.
pub async fn get_game_state(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<GameStateResponse> {
    let shared = state.sessions.get(&session_id).map_err(reject)?;
    let mut session = shared.lock().await;
    session.touch();
    Ok(Json(session.to_state_response().map_err(reject)?))
}

/// Delete a session.
pub async fn delete_game(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<DeleteResponse> {
    state.sessions.remove(&session_id).map_err(reject)?;
    Ok(Json(DeleteResponse {
        status: "deleted".to_string(),
        session_id,
    }))
}
