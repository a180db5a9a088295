//! Reservation model, pet information and the registry filters

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::{
    customer::{Customer, NewCustomer},
    enums::ReservationStatus,
    kennel::KennelShort,
};

/// Reservation row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: i32,
    pub customer_id: i32,
    pub pet_name: String,
    pub pet_breed: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ReservationStatus,
    pub kennel_ids: Vec<i32>,
    pub pickup: bool,
    pub groom: bool,
    #[serde(rename = "drop")]
    pub drop_off: bool,
    pub advance_amount: Decimal,
    pub created_at: Option<DateTime<Utc>>,
}

/// Care notes attached to a reservation (one per reservation)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PetInformation {
    pub id: i32,
    pub reservation_id: i32,
    pub dietary_requirements: Option<String>,
    pub special_care_instructions: Option<String>,
    pub medical_notes: Option<String>,
}

/// Pet information as entered on the reservation form
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PetInformationInput {
    pub dietary_requirements: Option<String>,
    pub special_care_instructions: Option<String>,
    pub medical_notes: Option<String>,
}

/// Reservation joined with its customer, kennels and pet information
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReservationDetails {
    pub id: i32,
    pub customer: Customer,
    pub pet_name: String,
    pub pet_breed: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ReservationStatus,
    pub kennel_ids: Vec<i32>,
    pub kennels: Vec<KennelShort>,
    pub pickup: bool,
    pub groom: bool,
    #[serde(rename = "drop")]
    pub drop_off: bool,
    pub advance_amount: Decimal,
    pub created_at: Option<DateTime<Utc>>,
    pub pet_information: Option<PetInformation>,
}

/// Create reservation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_create_reservation"))]
pub struct CreateReservation {
    /// Existing customer; when absent `customer` is inserted
    pub customer_id: Option<i32>,
    #[validate(nested)]
    pub customer: Option<NewCustomer>,
    #[validate(length(min = 1, message = "Pet name is required"))]
    pub pet_name: String,
    pub pet_breed: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(min = 1, message = "At least one kennel must be selected"))]
    pub kennel_ids: Vec<i32>,
    #[serde(default)]
    pub pickup: bool,
    #[serde(default)]
    pub groom: bool,
    #[serde(default, rename = "drop")]
    pub drop_off: bool,
    #[serde(default)]
    pub advance_amount: Decimal,
    pub pet_information: Option<PetInformationInput>,
}

fn validate_create_reservation(data: &CreateReservation) -> Result<(), ValidationError> {
    if data.pet_name.trim().is_empty() {
        return Err(ValidationError::new("pet_name_blank"));
    }
    if data.customer_id.is_none() && data.customer.is_none() {
        return Err(ValidationError::new("customer_required"));
    }
    if data.end_date < data.start_date {
        return Err(ValidationError::new("end_before_start"));
    }
    if data.advance_amount.is_sign_negative() {
        return Err(ValidationError::new("negative_advance"));
    }
    Ok(())
}

/// Move a reservation from one kennel to another
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct KennelReassignment {
    pub from_kennel_id: i32,
    pub to_kennel_id: i32,
}

/// Edit reservation request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_update_reservation"))]
pub struct UpdateReservation {
    #[validate(length(min = 1, message = "Pet name cannot be empty"))]
    pub pet_name: Option<String>,
    pub pet_breed: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub pickup: Option<bool>,
    pub groom: Option<bool>,
    #[serde(rename = "drop")]
    pub drop_off: Option<bool>,
    pub advance_amount: Option<Decimal>,
    pub pet_information: Option<PetInformationInput>,
    pub reassign_kennel: Option<KennelReassignment>,
}

fn validate_update_reservation(data: &UpdateReservation) -> Result<(), ValidationError> {
    if data.pet_name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(ValidationError::new("pet_name_blank"));
    }
    Ok(())
}

/// New date range for a reservation (calendar drag)
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct RescheduleReservation {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Archived copy of a canceled reservation
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HistoricalReservation {
    pub id: i32,
    pub original_reservation_id: i32,
    pub customer_id: i32,
    pub pet_name: String,
    pub pet_breed: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ReservationStatus,
    pub kennel_ids: Vec<i32>,
    pub pickup: bool,
    pub groom: bool,
    #[serde(rename = "drop")]
    pub drop_off: bool,
    pub advance_amount: Decimal,
    pub created_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
}

/// How check-in/check-out bounds are compared with a reservation's dates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DateMatch {
    /// start_date equals check_in and end_date equals check_out
    #[default]
    Exact,
    /// Reservation lies within [check_in, check_out]
    Range,
}

/// Reservation search query (customer registry and reservation list)
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ReservationQuery {
    /// Case-insensitive substring over customer name, pet name and breed
    pub search: Option<String>,
    pub status: Option<ReservationStatus>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub date_match: Option<DateMatch>,
}

impl ReservationQuery {
    pub fn matches(&self, reservation: &ReservationDetails, default_mode: DateMatch) -> bool {
        if let Some(status) = self.status {
            if reservation.status != status {
                return false;
            }
        }

        if let Some(ref term) = self.search {
            let fields = [
                Some(reservation.customer.name.as_str()),
                Some(reservation.pet_name.as_str()),
                reservation.pet_breed.as_deref(),
            ];
            if !matches_search(term, &fields) {
                return false;
            }
        }

        matches_dates(
            reservation.start_date,
            reservation.end_date,
            self.check_in,
            self.check_out,
            self.date_match.unwrap_or(default_mode),
        )
    }
}

/// True when `term` is blank or appears in any field, ignoring case
pub fn matches_search(term: &str, fields: &[Option<&str>]) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Compare a stay with optional check-in/check-out bounds
pub fn matches_dates(
    start: NaiveDate,
    end: NaiveDate,
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    mode: DateMatch,
) -> bool {
    match mode {
        DateMatch::Exact => {
            check_in.map_or(true, |d| start == d) && check_out.map_or(true, |d| end == d)
        }
        DateMatch::Range => {
            check_in.map_or(true, |d| start >= d) && check_out.map_or(true, |d| end <= d)
        }
    }
}
