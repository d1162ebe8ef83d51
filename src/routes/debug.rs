use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Report service configuration and cache state
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {}
    });

    match state.gain_cache {
        Some(ref cache) => {
            status["checks"]["gain_cache"] = json!({
                "backend": cache.backend_name(),
                "stats": cache.get_stats().await,
            });
        }
        None => {
            status["checks"]["gain_cache"] = json!("disabled");
        }
    }

    let config = state.route_generator.config();
    status["checks"]["generator"] = json!({
        "candidate_count": config.candidate_count,
        "max_consecutive_failures": config.max_consecutive_failures,
    });

    Json(status)
}
