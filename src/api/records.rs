//! Demo business record endpoints, answering in place of the real backend.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    AcademicQuery, CreateAcademicQueryRequest, CreateSchoolRequest, CreateTrainingVisitRequest,
    OutstandingAmount, PackingCount, PackingStatus, School, SetOutstandingRequest,
    SetPackingCountRequest, TrainingVisit, UpdatePackingStatusRequest,
};
use crate::AppState;

/// GET /api/schools - List all schools.
pub async fn list_schools(State(state): State<AppState>) -> ApiResult<Vec<School>> {
    success(state.data.list_schools().await)
}

/// POST /api/schools - Create a school.
pub async fn create_school(
    State(state): State<AppState>,
    Json(request): Json<CreateSchoolRequest>,
) -> ApiResult<School> {
    success(state.data.create_school(&request).await?)
}

/// GET /api/schools/:id/packing-status - Current packing stage of a school.
pub async fn get_packing_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PackingStatus> {
    match state.data.packing_status(&id).await {
        Some(status) => success(status),
        None => Err(AppError::NotFound(format!(
            "No packing status for school {}",
            id
        ))),
    }
}

/// PUT /api/schools/:id/packing-status - Move a school's kit to a new stage.
pub async fn set_packing_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePackingStatusRequest>,
) -> ApiResult<PackingStatus> {
    success(state.data.set_packing_stage(&id, request.stage).await?)
}

/// GET /api/schools/:id/packing-counts - Packed counts for one school.
pub async fn list_packing_counts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<PackingCount>> {
    success(state.data.list_packing_counts(&id).await)
}

/// GET /api/schools/:id/outstanding - What a school still owes.
pub async fn get_outstanding(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<OutstandingAmount> {
    match state.data.outstanding_amount(&id).await {
        Some(amount) => success(amount),
        None => Err(AppError::NotFound(format!(
            "No outstanding amount for school {}",
            id
        ))),
    }
}

/// PUT /api/schools/:id/outstanding - Set a school's outstanding amount.
pub async fn set_outstanding(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SetOutstandingRequest>,
) -> ApiResult<OutstandingAmount> {
    success(state.data.set_outstanding(&id, request.amount_minor).await?)
}

/// POST /api/packing-counts - Set the packed count for a school, class and theme.
pub async fn set_packing_count(
    State(state): State<AppState>,
    Json(request): Json<SetPackingCountRequest>,
) -> ApiResult<PackingCount> {
    success(state.data.set_packing_count(&request).await?)
}

/// GET /api/training-visits - List training visits by date.
pub async fn list_training_visits(State(state): State<AppState>) -> ApiResult<Vec<TrainingVisit>> {
    success(state.data.list_training_visits().await)
}

/// POST /api/training-visits - Schedule a training visit.
pub async fn add_training_visit(
    State(state): State<AppState>,
    Json(request): Json<CreateTrainingVisitRequest>,
) -> ApiResult<TrainingVisit> {
    success(state.data.add_training_visit(&request).await?)
}

/// GET /api/academic-queries - List academic queries, newest first.
pub async fn list_academic_queries(State(state): State<AppState>) -> ApiResult<Vec<AcademicQuery>> {
    success(state.data.list_academic_queries().await)
}

/// POST /api/academic-queries - Raise an academic query.
pub async fn raise_academic_query(
    State(state): State<AppState>,
    Json(request): Json<CreateAcademicQueryRequest>,
) -> ApiResult<AcademicQuery> {
    success(state.data.raise_academic_query(&request).await?)
}

/// PUT /api/academic-queries/:id/resolve - Mark a query resolved.
pub async fn resolve_academic_query(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<AcademicQuery> {
    success(state.data.resolve_academic_query(&id).await?)
}
