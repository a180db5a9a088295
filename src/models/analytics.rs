//! Raw rows feeding the analytics reduction

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use super::enums::ReservationStatus;

/// One reservation with its billed revenue (zero until checkout)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnalyticsRow {
    pub reservation_id: i32,
    pub customer_id: i32,
    pub customer_name: String,
    pub pet_breed: Option<String>,
    pub status: ReservationStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub pickup: bool,
    pub groom: bool,
    pub drop_off: bool,
    pub revenue: Decimal,
}
