//! Billing service: quotes and checkout

use crate::{
    config::BillingConfig,
    error::AppResult,
    models::bill::{compute_quote, Bill, BillQuote, CheckoutRequest},
    repository::Repository,
};

#[derive(Clone)]
pub struct BillingService {
    repository: Repository,
    config: BillingConfig,
}

impl BillingService {
    pub fn new(repository: Repository, config: BillingConfig) -> Self {
        Self { repository, config }
    }

    /// Preview the bill of a reservation without writing anything
    pub async fn quote(&self, reservation_id: i32, overrides: &CheckoutRequest) -> AppResult<BillQuote> {
        let reservation = self.repository.reservations.get_by_id(reservation_id).await?;
        compute_quote(
            reservation.id,
            reservation.start_date,
            reservation.end_date,
            self.config.default_per_day_rate,
            overrides,
        )
    }

    /// Finalize the stay and store the bill
    pub async fn checkout(&self, reservation_id: i32, overrides: CheckoutRequest) -> AppResult<Bill> {
        let bill = self
            .repository
            .reservations
            .checkout(reservation_id, self.config.default_per_day_rate, &overrides)
            .await
            .map_err(|e| {
                tracing::warn!("Checkout of reservation {} refused: {}", reservation_id, e);
                e
            })?;

        tracing::info!(
            "Reservation {} checked out: {} days, total {} {}",
            reservation_id,
            bill.days_stayed,
            bill.total_bill,
            self.config.currency
        );
        Ok(bill)
    }

    pub async fn list_bills(&self) -> AppResult<Vec<Bill>> {
        self.repository.bills.list().await
    }

    pub async fn get_bill(&self, id: i32) -> AppResult<Bill> {
        self.repository.bills.get_by_id(id).await
    }

    pub async fn bills_for_reservation(&self, reservation_id: i32) -> AppResult<Vec<Bill>> {
        self.repository.bills.list_for_reservation(reservation_id).await
    }
}
