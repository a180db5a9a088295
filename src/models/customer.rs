//! Customer model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::reservation::ReservationDetails;

/// Customer record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Customer fields captured by the reservation form
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewCustomer {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub name: String,
    #[validate(length(min = 3, max = 32, message = "Invalid phone number"))]
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Update customer request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCustomer {
    #[validate(length(min = 1, message = "Customer name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 3, max = 32, message = "Invalid phone number"))]
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Customer with the reservations booked under it
#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerDetails {
    #[serde(flatten)]
    pub customer: Customer,
    pub reservations: Vec<ReservationDetails>,
}
