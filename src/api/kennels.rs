//! Kennel inventory endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        enums::KennelStatus,
        kennel::{CreateKennelSet, ExtendKennelSet, Kennel, KennelSet, UpdateKennelSet, UpdateKennelStatus},
    },
};

use super::AuthenticatedStaff;

/// List kennels grouped by set
#[utoipa::path(
    get,
    path = "/kennels",
    tag = "kennels",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Kennel sets", body = Vec<KennelSet>)
    )
)]
pub async fn list_kennel_sets(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
) -> AppResult<Json<Vec<KennelSet>>> {
    let sets = state.services.kennels.list_sets().await?;
    Ok(Json(sets))
}

/// Kennels that can take a new reservation
#[utoipa::path(
    get,
    path = "/kennels/available",
    tag = "kennels",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Available kennels", body = Vec<Kennel>)
    )
)]
pub async fn list_available_kennels(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
) -> AppResult<Json<Vec<Kennel>>> {
    let kennels = state.services.kennels.list_by_status(KennelStatus::Available).await?;
    Ok(Json(kennels))
}

/// Get kennel by ID
#[utoipa::path(
    get,
    path = "/kennels/{id}",
    tag = "kennels",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Kennel ID")),
    responses(
        (status = 200, description = "Kennel", body = Kennel),
        (status = 404, description = "Kennel not found")
    )
)]
pub async fn get_kennel(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<i32>,
) -> AppResult<Json<Kennel>> {
    let kennel = state.services.kennels.get_by_id(id).await?;
    Ok(Json(kennel))
}

/// Create a kennel set
#[utoipa::path(
    post,
    path = "/kennels/sets",
    tag = "kennels",
    security(("bearer_auth" = [])),
    request_body = CreateKennelSet,
    responses(
        (status = 201, description = "Set created", body = Vec<Kennel>),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Set already exists")
    )
)]
pub async fn create_kennel_set(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Json(data): Json<CreateKennelSet>,
) -> AppResult<(StatusCode, Json<Vec<Kennel>>)> {
    claims.require_admin()?;
    let kennels = state.services.kennels.create_set(data).await?;
    Ok((StatusCode::CREATED, Json(kennels)))
}

/// Add kennels to an existing set
#[utoipa::path(
    post,
    path = "/kennels/sets/{name}/kennels",
    tag = "kennels",
    security(("bearer_auth" = [])),
    params(("name" = String, Path, description = "Set name")),
    request_body = ExtendKennelSet,
    responses(
        (status = 201, description = "Kennels added", body = Vec<Kennel>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Set not found")
    )
)]
pub async fn extend_kennel_set(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Path(name): Path<String>,
    Json(data): Json<ExtendKennelSet>,
) -> AppResult<(StatusCode, Json<Vec<Kennel>>)> {
    claims.require_admin()?;
    let kennels = state.services.kennels.extend_set(&name, data).await?;
    Ok((StatusCode::CREATED, Json(kennels)))
}

/// Move kennels into a set or retire them to maintenance
#[utoipa::path(
    put,
    path = "/kennels/sets/{name}",
    tag = "kennels",
    security(("bearer_auth" = [])),
    params(("name" = String, Path, description = "Set name")),
    request_body = UpdateKennelSet,
    responses(
        (status = 200, description = "Set updated", body = KennelSet),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Set or kennel not found"),
        (status = 422, description = "Kennel is reserved or occupied")
    )
)]
pub async fn update_kennel_set(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Path(name): Path<String>,
    Json(data): Json<UpdateKennelSet>,
) -> AppResult<Json<KennelSet>> {
    claims.require_admin()?;
    let set = state.services.kennels.update_set(&name, data).await?;
    Ok(Json(set))
}

/// Toggle a kennel between available and maintenance
#[utoipa::path(
    put,
    path = "/kennels/{id}/status",
    tag = "kennels",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Kennel ID")),
    request_body = UpdateKennelStatus,
    responses(
        (status = 200, description = "Status changed", body = Kennel),
        (status = 422, description = "Kennel is reserved or occupied")
    )
)]
pub async fn update_kennel_status(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<i32>,
    Json(data): Json<UpdateKennelStatus>,
) -> AppResult<Json<Kennel>> {
    let kennel = state.services.kennels.update_status(id, data.status).await?;
    Ok(Json(kennel))
}
