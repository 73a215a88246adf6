//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/stop", post(stop_handler))
        .route("/skip", post(skip_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        store::{InMemoryTimerStore, LocalTimer},
        timer::{Countdown, CountdownCore, Interval, PomodoroTimer, TimerState},
    };
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use chrono::Utc;
    use crate::api::responses::{ApiResponse, StatusResponse};
    use serde::de::DeserializeOwned;
    use std::time::Duration;
    use tokio::runtime::Handle;
    use tower::ServiceExt;

    fn app_state() -> Arc<AppState> {
        let now = Utc::now();
        let core = CountdownCore::new(
            Interval::starting_at(now, Duration::from_secs(1500)),
            Interval::starting_at(now, Duration::from_secs(300)),
            1.0,
        );
        let countdown = Countdown::spawn(&Handle::current(), core, Duration::from_secs(1)).unwrap();
        Arc::new(AppState::new(
            PomodoroTimer::new(countdown),
            LocalTimer::new(Arc::new(InMemoryTimerStore::new())),
            0,
            "test".to_string(),
        ))
    }

    async fn call<T: DeserializeOwned>(router: &Router, method: &str, uri: &str) -> (StatusCode, T) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_reports_running_focus() {
        let router = create_router(app_state());

        let (status, body): (_, ApiResponse) = call(&router, "POST", "/start").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "running");
        assert_eq!(body.session.state, TimerState::Running);
        assert!(!body.session.is_break);
        assert_eq!(body.session.remaining_seconds, 1500.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_reports_break() {
        let router = create_router(app_state());

        let (_, body): (_, ApiResponse) = call(&router, "POST", "/skip").await;
        assert_eq!(body.session.state, TimerState::Stopped);
        assert!(body.session.is_break);
        assert_eq!(body.session.remaining_seconds, 300.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_tracks_ticks_and_last_action() {
        let state = app_state();
        let router = create_router(state.clone());

        let _: (_, ApiResponse) = call(&router, "POST", "/start").await;
        tokio::time::sleep(Duration::from_millis(2500)).await;
        let (_, paused): (_, ApiResponse) = call(&router, "POST", "/pause").await;
        assert_eq!(paused.session.elapsed_seconds, 2.0);

        let (status, body): (_, StatusResponse) = call(&router, "GET", "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.session.state, TimerState::Paused);
        assert_eq!(body.session.elapsed_seconds, 2.0);
        assert_eq!(body.last_action.as_deref(), Some("pause"));
        assert!(body.errors.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_resets_elapsed() {
        let router = create_router(app_state());

        let _: (_, ApiResponse) = call(&router, "POST", "/start").await;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let (_, body): (_, ApiResponse) = call(&router, "POST", "/stop").await;

        assert_eq!(body.status, "stopped");
        assert_eq!(body.session.elapsed_seconds, 0.0);
    }

    #[tokio::test]
    async fn test_health() {
        let router = create_router(app_state());
        let (status, body): (_, serde_json::Value) = call(&router, "GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
