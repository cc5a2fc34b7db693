//! Tabletop Web Server
//!
//! REST API for playing Connect Four, Tic-Tac-Toe and Chess against a policy.
//! Endpoints:
//! - GET    /, /health               - Health check
//! - GET    /games                   - List available games
//! - GET    /game-info/:game_type    - Metadata for one game
//! - POST   /game/start              - Start a session (AI opens if the human plays second)
//! - POST   /game/move               - Apply the human's move
//! - POST   /game/ai-move?session_id - Let the policy move
//! - GET    /game/state/:session_id  - Current session state
//! - DELETE /game/:session_id        - Delete a session
//! - GET    /metrics                 - Prometheus metrics

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod central_config;
mod error;
mod game;
mod handlers;
mod metrics;
mod policy;
mod sessions;
mod types;

use central_config::load_config;
use handlers::{
    ai_move, delete_game, get_game_info, get_game_state, health, list_games, make_move,
    metrics_handler, start_game,
};
use policy::{build_policy, Policy};
use sessions::{spawn_eviction, SessionRegistry};

/// Shared application state
pub struct AppState {
    /// Live game sessions
    pub sessions: Arc<SessionRegistry>,
    /// Chooses the AI's moves
    pub policy: Arc<dyn Policy>,
    /// Upper bound on one policy call
    pub policy_timeout: Duration,
}

/// Create the application router with the given state.
/// This is separated out for testing purposes.
pub fn create_app(state: Arc<AppState>) -> Router {
    // CORS layer for browser clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/games", get(list_games))
        .route("/game-info/:game_type", get(get_game_info))
        .route("/game/start", post(start_game))
        .route("/game/move", post(make_move))
        .route("/game/ai-move", post(ai_move))
        .route("/game/state/:session_id", get(get_game_state))
        .route("/game/:session_id", delete(delete_game))
        .route("/metrics", get(metrics_handler))
        .layer(cors)
        .with_state(state)
}

/// Workspace crates that emit log events
const LOGGED_CRATES: &[&str] = &["tabletop_web", "engine_core", "games_chess"];

/// `RUST_LOG` plus a `level` directive for every workspace crate that logs.
fn log_filter(level: &str) -> anyhow::Result<EnvFilter> {
    let mut filter = EnvFilter::from_default_env();
    for krate in LOGGED_CRATES {
        filter = filter.add_directive(format!("{}={}", krate, level).parse()?);
    }
    Ok(filter)
}

/// Creates a future that completes when a shutdown signal is received.
/// Handles Ctrl+C on all platforms.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        return;
    }
    info!("Shutdown signal received, stopping server...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from config.toml with env var overrides
    let config = load_config();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&config.common.log_level)?)
        .init();

    info!(
        "Configuration: max_sessions={}, idle_ttl_secs={}, policy={}, policy_timeout_ms={}",
        config.sessions.max_sessions,
        config.sessions.idle_ttl_secs,
        config.policy.kind,
        config.sessions.policy_timeout_ms
    );

    metrics::init_metrics();
    engine_games::register_all_games();
    info!("Registered all games");

    let sessions = Arc::new(SessionRegistry::new(config.sessions.max_sessions));
    if let Some(ttl) = config.sessions.idle_ttl() {
        info!("Evicting sessions idle for more than {}s", ttl.as_secs());
        spawn_eviction(Arc::clone(&sessions), ttl);
    }

    let state = Arc::new(AppState {
        sessions,
        policy: build_policy(&config.policy),
        policy_timeout: config.sessions.policy_timeout(),
    });

    let app = create_app(state);

    let addr = format!("{}:{}", config.web.host, config.web.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}
