//! Reservations repository: lookups and lifecycle transitions.
//!
//! Every transition runs in a single transaction and locks the reservation
//! and its kennels, so a reservation and its kennels never disagree on status.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{postgres::PgRow, PgConnection, Pool, Postgres, Row};

use super::{customers, kennels};
use crate::{
    error::{AppError, AppResult},
    models::{
        analytics::AnalyticsRow,
        bill::{compute_quote, Bill, CheckoutRequest},
        customer::Customer,
        enums::{KennelStatus, ReservationStatus},
        kennel::KennelShort,
        reservation::{
            CreateReservation, HistoricalReservation, PetInformation, PetInformationInput,
            Reservation, ReservationDetails, RescheduleReservation, UpdateReservation,
        },
    },
};

const DETAILS_SELECT: &str = r#"
    SELECT r.*,
           c.name AS customer_name, c.phone AS customer_phone,
           c.address AS customer_address, c.created_at AS customer_created_at,
           p.id AS pet_info_id, p.dietary_requirements,
           p.special_care_instructions, p.medical_notes
    FROM reservations r
    JOIN customers c ON c.id = r.customer_id
    LEFT JOIN pet_information p ON p.reservation_id = r.id
"#;

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get reservation by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))
    }

    /// Get a reservation with customer, kennels and pet information
    pub async fn get_details(&self, id: i32) -> AppResult<ReservationDetails> {
        let sql = format!("{} WHERE r.id = $1", DETAILS_SELECT);
        let rows = sqlx::query(&sql).bind(id).fetch_all(&self.pool).await?;
        self.attach_kennels(rows)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))
    }

    /// All reservations (active and checked out), newest stay first
    pub async fn list_details(&self) -> AppResult<Vec<ReservationDetails>> {
        let sql = format!("{} ORDER BY r.start_date DESC, r.id DESC", DETAILS_SELECT);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        self.attach_kennels(rows).await
    }

    /// Reservations booked by one customer
    pub async fn list_details_for_customer(&self, customer_id: i32) -> AppResult<Vec<ReservationDetails>> {
        let sql = format!(
            "{} WHERE r.customer_id = $1 ORDER BY r.start_date DESC, r.id DESC",
            DETAILS_SELECT
        );
        let rows = sqlx::query(&sql).bind(customer_id).fetch_all(&self.pool).await?;
        self.attach_kennels(rows).await
    }

    async fn attach_kennels(&self, rows: Vec<PgRow>) -> AppResult<Vec<ReservationDetails>> {
        let mut details: Vec<ReservationDetails> = rows.iter().map(details_from_row).collect();

        let mut ids: Vec<i32> = details.iter().flat_map(|d| d.kennel_ids.iter().copied()).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(details);
        }

        let labels: HashMap<i32, KennelShort> = sqlx::query_as::<_, KennelShort>(
            "SELECT id, kennel_number, set_name FROM kennels WHERE id = ANY($1)"
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|k| (k.id, k))
        .collect();

        for d in details.iter_mut() {
            d.kennels = d
                .kennel_ids
                .iter()
                .filter_map(|id| labels.get(id).cloned())
                .collect();
        }
        Ok(details)
    }

    /// Archived (canceled) reservations
    pub async fn list_historical(&self) -> AppResult<Vec<HistoricalReservation>> {
        let rows = sqlx::query_as::<_, HistoricalReservation>(
            "SELECT * FROM historical_reservations ORDER BY archived_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Reservations joined with their billed totals, for analytics
    pub async fn analytics_rows(&self) -> AppResult<Vec<AnalyticsRow>> {
        let rows = sqlx::query_as::<_, AnalyticsRow>(
            r#"
            SELECT r.id AS reservation_id, r.customer_id, c.name AS customer_name,
                   r.pet_breed, r.status, r.start_date, r.end_date,
                   r.pickup, r.groom, r.drop_off,
                   COALESCE(b.total, 0)::numeric AS revenue
            FROM reservations r
            JOIN customers c ON c.id = r.customer_id
            LEFT JOIN (
                SELECT reservation_id, SUM(total_bill) AS total
                FROM bills GROUP BY reservation_id
            ) b ON b.reservation_id = r.id
            ORDER BY r.start_date
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a reservation and reserve its kennels
    pub async fn create(&self, data: &CreateReservation) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;

        let customer = match (data.customer_id, &data.customer) {
            (Some(id), _) => customers::get_in_tx(&mut tx, id).await?,
            (None, Some(new_customer)) => customers::insert(&mut tx, new_customer).await?,
            (None, None) => {
                return Err(AppError::Validation("Customer is required".to_string()));
            }
        };

        let mut kennel_ids = data.kennel_ids.clone();
        kennel_ids.sort_unstable();
        kennel_ids.dedup();

        let locked = kennels::lock_kennels(&mut tx, &kennel_ids).await?;
        for id in &kennel_ids {
            let kennel = locked
                .iter()
                .find(|k| k.id == *id)
                .ok_or_else(|| AppError::NotFound(format!("Kennel {} not found", id)))?;
            if kennel.status != KennelStatus::Available {
                return Err(AppError::KennelNotAvailable(format!(
                    "Kennel {} ({}) is {}",
                    kennel.kennel_number, kennel.set_name, kennel.status
                )));
            }
        }

        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (
                customer_id, pet_name, pet_breed, start_date, end_date, status,
                kennel_ids, pickup, groom, drop_off, advance_amount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(customer.id)
        .bind(data.pet_name.trim())
        .bind(&data.pet_breed)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(ReservationStatus::Reserved)
        .bind(&kennel_ids)
        .bind(data.pickup)
        .bind(data.groom)
        .bind(data.drop_off)
        .bind(data.advance_amount)
        .fetch_one(&mut *tx)
        .await?;

        let pet_info = data.pet_information.clone().unwrap_or_default();
        upsert_pet_information(&mut tx, reservation.id, &pet_info).await?;

        kennels::set_status(&mut tx, &kennel_ids, ReservationStatus::Reserved.kennel_status()).await?;

        tx.commit().await?;
        Ok(reservation)
    }

    /// Check a reservation in: status `checkin`, kennels `occupied`
    pub async fn check_in(&self, id: i32) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;

        let reservation = lock_reservation(&mut tx, id).await?;
        ensure_transition(&reservation, ReservationStatus::Checkin)?;

        let updated = set_reservation_status(&mut tx, id, ReservationStatus::Checkin).await?;
        kennels::lock_kennels(&mut tx, &reservation.kennel_ids).await?;
        kennels::set_status(&mut tx, &reservation.kennel_ids, ReservationStatus::Checkin.kennel_status()).await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Cancel a reservation: free kennels, archive a copy, delete the original
    pub async fn cancel(&self, id: i32) -> AppResult<HistoricalReservation> {
        let mut tx = self.pool.begin().await?;

        let reservation = lock_reservation(&mut tx, id).await?;
        ensure_transition(&reservation, ReservationStatus::Canceled)?;

        kennels::lock_kennels(&mut tx, &reservation.kennel_ids).await?;
        kennels::set_status(&mut tx, &reservation.kennel_ids, ReservationStatus::Canceled.kennel_status()).await?;

        let archived = sqlx::query_as::<_, HistoricalReservation>(
            r#"
            INSERT INTO historical_reservations (
                original_reservation_id, customer_id, pet_name, pet_breed,
                start_date, end_date, status, kennel_ids, pickup, groom, drop_off,
                advance_amount, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(reservation.id)
        .bind(reservation.customer_id)
        .bind(&reservation.pet_name)
        .bind(&reservation.pet_breed)
        .bind(reservation.start_date)
        .bind(reservation.end_date)
        .bind(ReservationStatus::Canceled)
        .bind(&reservation.kennel_ids)
        .bind(reservation.pickup)
        .bind(reservation.groom)
        .bind(reservation.drop_off)
        .bind(reservation.advance_amount)
        .bind(reservation.created_at)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(archived)
    }

    /// Edit reservation fields and optionally move it to another kennel.
    ///
    /// On reassignment the new kennel takes the previous kennel's status and
    /// the previous kennel becomes available.
    pub async fn update(&self, id: i32, data: &UpdateReservation) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;

        let reservation = lock_reservation(&mut tx, id).await?;
        if reservation.status.is_terminal() {
            return Err(AppError::BusinessRule(format!(
                "Reservation {} is {} and can no longer be edited",
                id, reservation.status
            )));
        }

        let start = data.start_date.unwrap_or(reservation.start_date);
        let end = data.end_date.unwrap_or(reservation.end_date);
        if end < start {
            return Err(AppError::Validation("End date is before start date".to_string()));
        }
        if let Some(advance) = data.advance_amount {
            if advance.is_sign_negative() {
                return Err(AppError::Validation("Advance amount cannot be negative".to_string()));
            }
        }

        let mut kennel_ids = reservation.kennel_ids.clone();
        if let Some(swap) = data.reassign_kennel {
            if swap.from_kennel_id != swap.to_kennel_id {
                let position = kennel_ids
                    .iter()
                    .position(|k| *k == swap.from_kennel_id)
                    .ok_or_else(|| {
                        AppError::BadRequest(format!(
                            "Kennel {} is not assigned to reservation {}",
                            swap.from_kennel_id, id
                        ))
                    })?;
                if kennel_ids.contains(&swap.to_kennel_id) {
                    return Err(AppError::BadRequest(format!(
                        "Kennel {} is already assigned to reservation {}",
                        swap.to_kennel_id, id
                    )));
                }

                let locked = kennels::lock_kennels(&mut tx, &[swap.from_kennel_id, swap.to_kennel_id]).await?;
                let previous = locked
                    .iter()
                    .find(|k| k.id == swap.from_kennel_id)
                    .ok_or_else(|| AppError::NotFound(format!("Kennel {} not found", swap.from_kennel_id)))?;
                let target = locked
                    .iter()
                    .find(|k| k.id == swap.to_kennel_id)
                    .ok_or_else(|| AppError::NotFound(format!("Kennel {} not found", swap.to_kennel_id)))?;
                if target.status != KennelStatus::Available {
                    return Err(AppError::KennelNotAvailable(format!(
                        "Kennel {} ({}) is {}",
                        target.kennel_number, target.set_name, target.status
                    )));
                }

                kennels::set_status(&mut tx, &[target.id], previous.status).await?;
                kennels::set_status(&mut tx, &[previous.id], KennelStatus::Available).await?;
                kennel_ids[position] = target.id;

                tracing::info!(
                    "Reservation {} moved from kennel {} to kennel {} ({})",
                    id, previous.id, target.id, previous.status
                );
            }
        }

        let updated = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations SET
                pet_name = COALESCE($2, pet_name),
                pet_breed = COALESCE($3, pet_breed),
                start_date = $4,
                end_date = $5,
                pickup = COALESCE($6, pickup),
                groom = COALESCE($7, groom),
                drop_off = COALESCE($8, drop_off),
                advance_amount = COALESCE($9, advance_amount),
                kennel_ids = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.pet_name.as_deref().map(str::trim))
        .bind(&data.pet_breed)
        .bind(start)
        .bind(end)
        .bind(data.pickup)
        .bind(data.groom)
        .bind(data.drop_off)
        .bind(data.advance_amount)
        .bind(&kennel_ids)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(ref pet_info) = data.pet_information {
            upsert_pet_information(&mut tx, id, pet_info).await?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Move a live reservation to new dates
    pub async fn reschedule(&self, id: i32, dates: &RescheduleReservation) -> AppResult<Reservation> {
        if dates.end_date < dates.start_date {
            return Err(AppError::Validation("End date is before start date".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let reservation = lock_reservation(&mut tx, id).await?;
        if reservation.status.is_terminal() {
            return Err(AppError::BusinessRule(format!(
                "Reservation {} is {} and cannot be rescheduled",
                id, reservation.status
            )));
        }

        let updated = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET start_date = $2, end_date = $3 WHERE id = $1 RETURNING *"
        )
        .bind(id)
        .bind(dates.start_date)
        .bind(dates.end_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Close a stay: write the bill, mark checkout, free kennels, drop feeding rows
    pub async fn checkout(
        &self,
        id: i32,
        default_rate: Decimal,
        overrides: &CheckoutRequest,
    ) -> AppResult<Bill> {
        let mut tx = self.pool.begin().await?;

        let reservation = lock_reservation(&mut tx, id).await?;
        ensure_transition(&reservation, ReservationStatus::Checkout)?;

        let customer = customers::get_in_tx(&mut tx, reservation.customer_id).await?;
        let quote = compute_quote(
            reservation.id,
            reservation.start_date,
            reservation.end_date,
            default_rate,
            overrides,
        )?;

        let bill = sqlx::query_as::<_, Bill>(
            r#"
            INSERT INTO bills (
                reservation_id, customer_name, customer_phone, pet_name, pet_breed,
                check_in_date, check_out_date, days_stayed, per_day_bill, total_bill
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(reservation.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&reservation.pet_name)
        .bind(&reservation.pet_breed)
        .bind(quote.check_in_date)
        .bind(quote.check_out_date)
        .bind(quote.days_stayed)
        .bind(quote.per_day_bill)
        .bind(quote.total_bill)
        .fetch_one(&mut *tx)
        .await?;

        set_reservation_status(&mut tx, id, ReservationStatus::Checkout).await?;
        kennels::lock_kennels(&mut tx, &reservation.kennel_ids).await?;
        kennels::set_status(&mut tx, &reservation.kennel_ids, ReservationStatus::Checkout.kennel_status()).await?;

        let cleared = sqlx::query("DELETE FROM feeding_schedule WHERE kennel_id = ANY($1)")
            .bind(&reservation.kennel_ids)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        tracing::debug!("Checkout of reservation {} cleared {} feeding rows", id, cleared);
        Ok(bill)
    }
}

fn ensure_transition(reservation: &Reservation, next: ReservationStatus) -> AppResult<()> {
    if reservation.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(AppError::BusinessRule(format!(
            "Reservation {} cannot go from {} to {}",
            reservation.id, reservation.status, next
        )))
    }
}

async fn lock_reservation(conn: &mut PgConnection, id: i32) -> AppResult<Reservation> {
    sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))
}

async fn set_reservation_status(
    conn: &mut PgConnection,
    id: i32,
    status: ReservationStatus,
) -> AppResult<Reservation> {
    let row = sqlx::query_as::<_, Reservation>(
        "UPDATE reservations SET status = $2 WHERE id = $1 RETURNING *"
    )
    .bind(id)
    .bind(status)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

async fn upsert_pet_information(
    conn: &mut PgConnection,
    reservation_id: i32,
    data: &PetInformationInput,
) -> AppResult<PetInformation> {
    let row = sqlx::query_as::<_, PetInformation>(
        r#"
        INSERT INTO pet_information (
            reservation_id, dietary_requirements, special_care_instructions, medical_notes
        )
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (reservation_id) DO UPDATE SET
            dietary_requirements = EXCLUDED.dietary_requirements,
            special_care_instructions = EXCLUDED.special_care_instructions,
            medical_notes = EXCLUDED.medical_notes
        RETURNING *
        "#,
    )
    .bind(reservation_id)
    .bind(&data.dietary_requirements)
    .bind(&data.special_care_instructions)
    .bind(&data.medical_notes)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

fn details_from_row(row: &PgRow) -> ReservationDetails {
    let id: i32 = row.get("id");
    let pet_info_id: Option<i32> = row.get("pet_info_id");

    ReservationDetails {
        id,
        customer: Customer {
            id: row.get("customer_id"),
            name: row.get("customer_name"),
            phone: row.get("customer_phone"),
            address: row.get("customer_address"),
            created_at: row.get("customer_created_at"),
        },
        pet_name: row.get("pet_name"),
        pet_breed: row.get("pet_breed"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        status: row.get("status"),
        kennel_ids: row.get("kennel_ids"),
        kennels: Vec::new(),
        pickup: row.get("pickup"),
        groom: row.get("groom"),
        drop_off: row.get("drop_off"),
        advance_amount: row.get("advance_amount"),
        created_at: row.get("created_at"),
        pet_information: pet_info_id.map(|pet_id| PetInformation {
            id: pet_id,
            reservation_id: id,
            dietary_requirements: row.get("dietary_requirements"),
            special_care_instructions: row.get("special_care_instructions"),
            medical_notes: row.get("medical_notes"),
        }),
    }
}
