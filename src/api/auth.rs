//! Staff authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        enums::StaffRole,
        staff::{CreateStaff, Staff},
    },
};

use super::AuthenticatedStaff;

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for the Authorization header
    pub token: String,
    pub token_type: String,
    pub staff: StaffInfo,
}

/// Public view of a staff account
#[derive(Serialize, ToSchema)]
pub struct StaffInfo {
    pub id: i32,
    pub login: String,
    pub display_name: Option<String>,
    pub role: StaffRole,
}

impl From<Staff> for StaffInfo {
    fn from(staff: Staff) -> Self {
        Self {
            id: staff.id,
            login: staff.login,
            display_name: staff.display_name,
            role: staff.role,
        }
    }
}

/// Log in with login and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, staff) = state
        .services
        .auth
        .authenticate(&request.login, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        staff: staff.into(),
    }))
}

/// Current staff member
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current staff member", body = StaffInfo),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
) -> AppResult<Json<StaffInfo>> {
    let staff = state.services.auth.get_by_id(claims.staff_id).await?;
    Ok(Json(staff.into()))
}

/// Create a staff account (admin only)
#[utoipa::path(
    post,
    path = "/staff",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = CreateStaff,
    responses(
        (status = 201, description = "Staff account created", body = StaffInfo),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Login already exists")
    )
)]
pub async fn create_staff(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Json(data): Json<CreateStaff>,
) -> AppResult<(StatusCode, Json<StaffInfo>)> {
    claims.require_admin()?;
    let staff = state.services.auth.create_staff(data).await?;
    Ok((StatusCode::CREATED, Json(staff.into())))
}
