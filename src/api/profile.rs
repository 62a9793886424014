//! Demo profile endpoints.

use axum::extract::{Path, State};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::identity::create_demo_profile;
use crate::models::{DemoProfile, Role};
use crate::AppState;

/// GET /api/profile - Profile for the running demo session.
pub async fn current_profile(State(state): State<AppState>) -> ApiResult<DemoProfile> {
    match state.bridge.snapshot().await {
        Some(session) => success(create_demo_profile(session.role)),
        None => Err(AppError::Unauthorized(
            "No active demo session".to_string(),
        )),
    }
}

/// GET /api/profiles/:role - Profile a demo session would show for `role`.
pub async fn profile_for_role(Path(role): Path<String>) -> ApiResult<DemoProfile> {
    let role: Role = role.parse()?;
    success(create_demo_profile(role))
}
