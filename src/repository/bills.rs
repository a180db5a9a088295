//! Bills repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::bill::Bill,
};

#[derive(Clone)]
pub struct BillsRepository {
    pool: Pool<Postgres>,
}

impl BillsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List bills, most recent first
    pub async fn list(&self) -> AppResult<Vec<Bill>> {
        let rows = sqlx::query_as::<_, Bill>("SELECT * FROM bills ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get bill by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Bill> {
        sqlx::query_as::<_, Bill>("SELECT * FROM bills WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Bill {} not found", id)))
    }

    /// Bills written for one reservation
    pub async fn list_for_reservation(&self, reservation_id: i32) -> AppResult<Vec<Bill>> {
        let rows = sqlx::query_as::<_, Bill>(
            "SELECT * FROM bills WHERE reservation_id = $1 ORDER BY id"
        )
        .bind(reservation_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
