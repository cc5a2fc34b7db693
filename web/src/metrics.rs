//! Prometheus metrics for the web server component.
//!
//! Session lifecycle counters, move throughput and AI move latency.

use lazy_static::lazy_static;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Once;
use tracing::warn;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ========== Game Session Metrics ==========

    /// Total game sessions created
    pub static ref GAMES_CREATED: IntCounter = IntCounter::with_opts(
        Opts::new("web_games_created_total", "Total game sessions created")
    ).unwrap();

    /// Currently live game sessions
    pub static ref GAMES_ACTIVE: IntGauge = IntGauge::with_opts(
        Opts::new("web_games_active", "Currently live game sessions")
    ).unwrap();

    /// Total moves played across all games
    pub static ref MOVES_PLAYED: IntCounter = IntCounter::with_opts(
        Opts::new("web_moves_played_total", "Total moves played across all games")
    ).unwrap();

    /// Games that reached a terminal position
    pub static ref GAMES_COMPLETED: IntCounter = IntCounter::with_opts(
        Opts::new("web_games_completed_total", "Total games completed")
    ).unwrap();

    /// Sessions removed by idle eviction
    pub static ref SESSIONS_EVICTED: IntCounter = IntCounter::with_opts(
        Opts::new("web_sessions_evicted_total", "Sessions removed after idling past the TTL")
    ).unwrap();

    // ========== Policy Metrics ==========

    /// Time for the policy to choose a move
    pub static ref AI_MOVE_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new("web_ai_move_seconds", "Time for the policy to choose a move")
            .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0])
    ).unwrap();

    /// Policy calls that failed, timed out or returned an illegal action
    pub static ref POLICY_FAILURES: IntCounter = IntCounter::with_opts(
        Opts::new("web_policy_failures_total", "Policy calls that failed, timed out or broke the legality contract")
    ).unwrap();
}

static INIT: Once = Once::new();

/// Initialize and register all metrics with the registry.
/// Safe to call multiple times - only initializes once.
pub fn init_metrics() {
    INIT.call_once(|| {
        REGISTRY.register(Box::new(GAMES_CREATED.clone())).unwrap();
        REGISTRY.register(Box::new(GAMES_ACTIVE.clone())).unwrap();
        REGISTRY.register(Box::new(MOVES_PLAYED.clone())).unwrap();
        REGISTRY
            .register(Box::new(GAMES_COMPLETED.clone()))
            .unwrap();
        REGISTRY
            .register(Box::new(SESSIONS_EVICTED.clone()))
            .unwrap();
        REGISTRY
            .register(Box::new(AI_MOVE_SECONDS.clone()))
            .unwrap();
        REGISTRY
            .register(Box::new(POLICY_FAILURES.clone()))
            .unwrap();
    });
}

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}
