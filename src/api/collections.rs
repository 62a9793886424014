//! Raw collection endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use super::{success, ApiResult};
use crate::data::CollectionId;
use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteOutcome {
    pub durable: bool,
}

fn collection_id(raw: &str) -> Result<CollectionId, AppError> {
    raw.parse().map_err(AppError::NotFound)
}

/// GET /api/collections/:id - Read one collection.
pub async fn get_collection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = collection_id(&id)?;
    success(state.data.read_json(id).await)
}

/// PUT /api/collections/:id - Replace one collection.
pub async fn put_collection(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(value): Json<Value>,
) -> ApiResult<WriteOutcome> {
    let id = collection_id(&id)?;
    match state.data.write_json(id, value).await {
        Ok(durable) => success(WriteOutcome { durable }),
        Err(reason) => Err(AppError::Validation(format!(
            "Invalid {} collection: {}",
            id, reason
        ))),
    }
}

/// DELETE /api/collections - Reset all demo data.
pub async fn clear_collections(State(state): State<AppState>) -> ApiResult<()> {
    state.data.clear_all().await;
    success(())
}
