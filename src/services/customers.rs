//! Customer registry service

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        customer::{Customer, CustomerDetails, UpdateCustomer},
        reservation::{DateMatch, ReservationDetails, ReservationQuery},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CustomersService {
    repository: Repository,
}

impl CustomersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Registry rows (reservation + customer + pet + kennels).
    ///
    /// Check-in/check-out bounds match exact dates unless `date_match=range`.
    pub async fn registry(&self, query: &ReservationQuery) -> AppResult<Vec<ReservationDetails>> {
        let all = self.repository.reservations.list_details().await?;
        Ok(all
            .into_iter()
            .filter(|r| query.matches(r, DateMatch::Exact))
            .collect())
    }

    /// Customer with all of its reservations
    pub async fn get(&self, id: i32) -> AppResult<CustomerDetails> {
        let customer = self.repository.customers.get_by_id(id).await?;
        let reservations = self
            .repository
            .reservations
            .list_details_for_customer(id)
            .await?;
        Ok(CustomerDetails {
            customer,
            reservations,
        })
    }

    pub async fn update(&self, id: i32, data: UpdateCustomer) -> AppResult<Customer> {
        data.validate()?;
        self.repository.customers.update(id, &data).await
    }
}
