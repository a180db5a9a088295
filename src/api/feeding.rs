//! Feeding tracker endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        feeding::{FeedingHistoryQuery, FeedingRecord, FeedingRoundResult, RecordFeeding},
        kennel::Kennel,
    },
};

use super::AuthenticatedStaff;

/// Kennels to feed
#[utoipa::path(
    get,
    path = "/feeding/occupied",
    tag = "feeding",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Occupied kennels", body = Vec<Kennel>)
    )
)]
pub async fn list_occupied(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
) -> AppResult<Json<Vec<Kennel>>> {
    let kennels = state.services.feeding.occupied_kennels().await?;
    Ok(Json(kennels))
}

/// Record a feeding round
#[utoipa::path(
    post,
    path = "/feeding",
    tag = "feeding",
    security(("bearer_auth" = [])),
    request_body = RecordFeeding,
    responses(
        (status = 200, description = "Round recorded", body = FeedingRoundResult),
        (status = 422, description = "No occupied kennels")
    )
)]
pub async fn record_feeding(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Json(data): Json<RecordFeeding>,
) -> AppResult<Json<FeedingRoundResult>> {
    let result = state.services.feeding.record_round(data).await?;
    Ok(Json(result))
}

/// Daily feeding log per kennel
#[utoipa::path(
    get,
    path = "/feeding/history",
    tag = "feeding",
    security(("bearer_auth" = [])),
    params(FeedingHistoryQuery),
    responses(
        (status = 200, description = "Feeding history", body = Vec<FeedingRecord>)
    )
)]
pub async fn feeding_history(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Query(query): Query<FeedingHistoryQuery>,
) -> AppResult<Json<Vec<FeedingRecord>>> {
    let history = state.services.feeding.history(&query).await?;
    Ok(Json(history))
}
