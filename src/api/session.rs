//! Demo session endpoints.

use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{AppMode, Role, Session, SessionRequest};
use crate::{mode, AppState};

const DEFAULT_WATCH_TIMEOUT_MS: u64 = 25_000;
const MAX_WATCH_TIMEOUT_MS: u64 = 60_000;

/// GET /api/session - Current session snapshot, `null` when none.
pub async fn get_session(State(state): State<AppState>) -> ApiResult<Option<Session>> {
    success(state.bridge.snapshot().await)
}

/// POST /api/session - Demo sign-in.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SessionRequest>,
) -> ApiResult<Session> {
    let role: Role = request.role.parse()?;
    state.sessions.set_session(role).await;
    persisted_session(&state).await
}

/// PUT /api/session/role - Switch the role of the running demo session.
pub async fn switch_role(
    State(state): State<AppState>,
    Json(request): Json<SessionRequest>,
) -> ApiResult<Session> {
    let role: Role = request.role.parse()?;
    if !state.sessions.switch_role(role).await {
        return Err(AppError::Unauthorized(
            "No active demo session".to_string(),
        ));
    }
    persisted_session(&state).await
}

async fn persisted_session(state: &AppState) -> ApiResult<Session> {
    match state.bridge.snapshot().await {
        Some(session) => success(session),
        None => Err(AppError::Unavailable(
            "Demo session could not be persisted".to_string(),
        )),
    }
}

/// DELETE /api/session - Exit the demo.
pub async fn exit_demo(State(state): State<AppState>) -> ApiResult<()> {
    mode::exit_demo(&state.sessions, &state.data, state.config.exit_policy).await;
    success(())
}

/// POST /api/session/login-surface - The UI arrived at the login screen.
pub async fn enter_login_surface(State(state): State<AppState>) -> ApiResult<()> {
    mode::enter_login_surface(&state.sessions).await;
    success(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchQuery {
    #[serde(default)]
    pub since: u64,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchResponse {
    pub sequence: u64,
    pub session: Option<Session>,
}

/// GET /api/session/watch - Long-poll until the session changes past `since`.
pub async fn watch_session(
    State(state): State<AppState>,
    Query(query): Query<WatchQuery>,
) -> ApiResult<WatchResponse> {
    let timeout_ms = query
        .timeout_ms
        .unwrap_or(DEFAULT_WATCH_TIMEOUT_MS)
        .min(MAX_WATCH_TIMEOUT_MS);
    let sequence = state
        .feed
        .wait_past(query.since, Duration::from_millis(timeout_ms))
        .await;
    success(WatchResponse {
        sequence,
        session: state.bridge.snapshot().await,
    })
}

/// GET /api/mode - Resolve the application mode. A bearer token on the request
/// stands in for the identity provider reporting a signed-in user.
pub async fn get_mode(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<AppMode> {
    let identity_session = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .is_some_and(|token| !token.trim().is_empty());

    success(mode::resolve_mode(&state.sessions, identity_session).await)
}
