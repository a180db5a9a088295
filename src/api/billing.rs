//! Billing endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::bill::{Bill, BillQuote, CheckoutRequest},
};

use super::AuthenticatedStaff;

/// Preview the bill of a reservation
#[utoipa::path(
    get,
    path = "/reservations/{id}/bill-quote",
    tag = "billing",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reservation ID"),
        CheckoutRequest
    ),
    responses(
        (status = 200, description = "Bill preview", body = BillQuote),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn bill_quote(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<i32>,
    Query(overrides): Query<CheckoutRequest>,
) -> AppResult<Json<BillQuote>> {
    let quote = state.services.billing.quote(id, &overrides).await?;
    Ok(Json(quote))
}

/// Check a reservation out and store its bill
#[utoipa::path(
    post,
    path = "/reservations/{id}/checkout",
    tag = "billing",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Checked out", body = Bill),
        (status = 422, description = "Reservation is not checked in")
    )
)]
pub async fn checkout(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<i32>,
    Json(overrides): Json<CheckoutRequest>,
) -> AppResult<Json<Bill>> {
    let bill = state.services.billing.checkout(id, overrides).await?;
    Ok(Json(bill))
}

/// List bills, newest first
#[utoipa::path(
    get,
    path = "/bills",
    tag = "billing",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bills", body = Vec<Bill>)
    )
)]
pub async fn list_bills(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
) -> AppResult<Json<Vec<Bill>>> {
    let bills = state.services.billing.list_bills().await?;
    Ok(Json(bills))
}

/// Get bill by ID
#[utoipa::path(
    get,
    path = "/bills/{id}",
    tag = "billing",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Bill ID")),
    responses(
        (status = 200, description = "Bill", body = Bill),
        (status = 404, description = "Bill not found")
    )
)]
pub async fn get_bill(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<i32>,
) -> AppResult<Json<Bill>> {
    let bill = state.services.billing.get_bill(id).await?;
    Ok(Json(bill))
}

/// Bills written for one reservation
#[utoipa::path(
    get,
    path = "/reservations/{id}/bills",
    tag = "billing",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Bills of the reservation", body = Vec<Bill>)
    )
)]
pub async fn reservation_bills(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Bill>>> {
    let bills = state.services.billing.bills_for_reservation(id).await?;
    Ok(Json(bills))
}
