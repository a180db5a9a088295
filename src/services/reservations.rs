//! Reservation lifecycle service

use validator::Validate;

use crate::{
    error::AppResult,
    models::reservation::{
        CreateReservation, DateMatch, HistoricalReservation, Reservation, ReservationDetails,
        ReservationQuery, UpdateReservation,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
}

impl ReservationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a reservation; its kennels become reserved
    pub async fn create(&self, data: CreateReservation) -> AppResult<ReservationDetails> {
        data.validate()?;
        let reservation = self.repository.reservations.create(&data).await?;
        tracing::info!(
            "Reservation {} created for {} in kennels {:?} ({} to {})",
            reservation.id,
            reservation.pet_name,
            reservation.kennel_ids,
            reservation.start_date,
            reservation.end_date
        );
        self.repository.reservations.get_details(reservation.id).await
    }

    pub async fn get(&self, id: i32) -> AppResult<ReservationDetails> {
        self.repository.reservations.get_details(id).await
    }

    /// Filter reservations; date bounds use range containment unless overridden
    pub async fn list(&self, query: &ReservationQuery) -> AppResult<Vec<ReservationDetails>> {
        let all = self.repository.reservations.list_details().await?;
        Ok(all
            .into_iter()
            .filter(|r| query.matches(r, DateMatch::Range))
            .collect())
    }

    /// Confirm arrival: reservation checkin, kennels occupied
    pub async fn check_in(&self, id: i32) -> AppResult<Reservation> {
        let reservation = self.repository.reservations.check_in(id).await.map_err(|e| {
            tracing::warn!("Check-in of reservation {} refused: {}", id, e);
            e
        })?;
        tracing::info!("Reservation {} checked in", id);
        Ok(reservation)
    }

    /// Cancel: kennels freed, reservation archived then removed
    pub async fn cancel(&self, id: i32) -> AppResult<HistoricalReservation> {
        let archived = self.repository.reservations.cancel(id).await.map_err(|e| {
            tracing::warn!("Cancellation of reservation {} refused: {}", id, e);
            e
        })?;
        tracing::info!("Reservation {} canceled and archived as {}", id, archived.id);
        Ok(archived)
    }

    pub async fn update(&self, id: i32, data: UpdateReservation) -> AppResult<ReservationDetails> {
        data.validate()?;
        self.repository.reservations.update(id, &data).await?;
        self.repository.reservations.get_details(id).await
    }

    /// Archived (canceled) reservations
    pub async fn list_historical(&self) -> AppResult<Vec<HistoricalReservation>> {
        self.repository.reservations.list_historical().await
    }
}
