//! Guard and reset notice endpoints.

use axum::extract::State;
use serde::Serialize;

use super::{success, ApiResult};
use crate::guard::{guard_status, GuardStatus};
use crate::AppState;

/// GET /api/guard - Whether backend mutations are disabled.
pub async fn get_guard(State(state): State<AppState>) -> ApiResult<GuardStatus> {
    success(guard_status(&state.sessions).await)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetFlagStatus {
    pub was_reset: bool,
}

/// GET /api/reset-flag - Whether corrupted demo state was repaired recently.
pub async fn get_reset_flag(State(state): State<AppState>) -> ApiResult<ResetFlagStatus> {
    success(ResetFlagStatus {
        was_reset: state.sessions.was_data_reset().await,
    })
}

/// DELETE /api/reset-flag - Acknowledge the reset notice.
pub async fn clear_reset_flag(State(state): State<AppState>) -> ApiResult<ResetFlagStatus> {
    state.sessions.clear_data_reset_flag().await;
    success(ResetFlagStatus { was_reset: false })
}
