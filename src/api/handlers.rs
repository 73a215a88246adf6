//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::{error::TimerError, state::AppState};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Wait for the command to land and report the resulting session
async fn settled(
    state: &AppState,
    outcome: Result<(), TimerError>,
    action: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    if let Err(e) = outcome {
        error!("Failed to {} timer: {}", action, e);
        state.add_error(e.to_string());
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    match state.timer.settle().await {
        Ok(session) => {
            info!("{} endpoint called - timer {}", action, session.state.as_str());
            Ok(Json(ApiResponse::new(
                format!("Timer {} requested", action),
                session,
            )))
        }
        Err(e) => {
            error!("Failed to read timer after {}: {}", action, e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Handle POST /start - Start or resume the current interval
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let outcome = state.start();
    settled(&state, outcome, "start").await
}

/// Handle POST /pause - Freeze the current interval
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let outcome = state.pause();
    settled(&state, outcome, "pause").await
}

/// Handle POST /stop - Reset the current interval
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let outcome = state.stop();
    settled(&state, outcome, "stop").await
}

/// Handle POST /skip - Switch between focus and break
pub async fn skip_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let outcome = state.skip();
    settled(&state, outcome, "skip").await
}

/// Handle GET /status - Return current session and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        session: state.timer.session().into(),
        errors: state.get_errors(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
