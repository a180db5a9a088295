//! Analytics endpoints

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedStaff;

/// Business analytics derived from reservations, bills and kennels
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsResponse {
    /// Number of registered customers
    pub total_customers: i64,
    /// Reservations per customer, most frequent first
    pub reservation_frequency: Vec<CustomerFrequency>,
    pub stays: StayStats,
    pub revenue: RevenueStats,
    /// Reservations by status
    pub status_breakdown: Vec<StatEntry>,
    /// Reservations by breed, most popular first
    pub breed_popularity: Vec<StatEntry>,
    pub service_utilization: ServiceUtilization,
    pub kennels: KennelStats,
    /// Canceled share of archived reservations (percent), null without archive
    pub cancellation_rate: Option<f64>,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct CustomerFrequency {
    pub customer_id: i32,
    pub customer_name: String,
    pub reservations: i64,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct StayStats {
    /// Sum of stay lengths in days (both ends counted)
    pub total_days: i64,
    /// Null when there are no reservations
    pub average_days: Option<f64>,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct RevenueStats {
    pub total: Decimal,
    /// Average bill over billed reservations, null when nothing was billed
    pub average: Option<Decimal>,
    /// Revenue per checkout month (`YYYY-MM`), ascending
    pub monthly: BTreeMap<String, Decimal>,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct ServiceUtilization {
    pub pickup: i64,
    pub groom: i64,
    pub drop: i64,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct KennelStats {
    pub total: i64,
    pub occupied: i64,
    /// Occupied share of all kennels (percent), null without kennels
    pub occupancy_rate: Option<f64>,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct StatEntry {
    /// Label
    pub label: String,
    /// Value
    pub value: i64,
}

/// Get business analytics
#[utoipa::path(
    get,
    path = "/analytics",
    tag = "analytics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Analytics report", body = AnalyticsResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_analytics(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
) -> AppResult<Json<AnalyticsResponse>> {
    let report = state.services.analytics.report().await?;
    Ok(Json(report))
}
