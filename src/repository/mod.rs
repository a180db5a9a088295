//! Repository layer for database operations

pub mod bills;
pub mod customers;
pub mod feeding;
pub mod kennels;
pub mod reservations;
pub mod staff;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub kennels: kennels::KennelsRepository,
    pub customers: customers::CustomersRepository,
    pub reservations: reservations::ReservationsRepository,
    pub feeding: feeding::FeedingRepository,
    pub bills: bills::BillsRepository,
    pub staff: staff::StaffRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            kennels: kennels::KennelsRepository::new(pool.clone()),
            customers: customers::CustomersRepository::new(pool.clone()),
            reservations: reservations::ReservationsRepository::new(pool.clone()),
            feeding: feeding::FeedingRepository::new(pool.clone()),
            bills: bills::BillsRepository::new(pool.clone()),
            staff: staff::StaffRepository::new(pool.clone()),
            pool,
        }
    }

    /// Ping the database (readiness probe)
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Postgres unique_violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .as_deref()
        == Some("23505")
}
