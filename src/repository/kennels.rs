//! Kennels repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use super::is_unique_violation;
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::KennelStatus,
        kennel::{free_kennel_number, next_kennel_numbers, Kennel, MAINTENANCE_SET},
    },
};

#[derive(Clone)]
pub struct KennelsRepository {
    pool: Pool<Postgres>,
}

impl KennelsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all kennels ordered by set name then number
    pub async fn list(&self) -> AppResult<Vec<Kennel>> {
        let rows = sqlx::query_as::<_, Kennel>(
            "SELECT * FROM kennels ORDER BY set_name, kennel_number"
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// List kennels in the given status
    pub async fn list_by_status(&self, status: KennelStatus) -> AppResult<Vec<Kennel>> {
        let rows = sqlx::query_as::<_, Kennel>(
            "SELECT * FROM kennels WHERE status = $1 ORDER BY set_name, kennel_number"
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get kennel by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Kennel> {
        sqlx::query_as::<_, Kennel>("SELECT * FROM kennels WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Kennel {} not found", id)))
    }

    /// Check whether a set with this name already has kennels
    pub async fn set_exists(&self, set_name: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM kennels WHERE set_name = $1)"
        )
        .bind(set_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Create a new set of `count` kennels numbered 1..=count
    pub async fn create_set(&self, set_name: &str, count: i32) -> AppResult<Vec<Kennel>> {
        let mut tx = self.pool.begin().await?;

        let current_max: Option<i32> = sqlx::query_scalar(
            "SELECT MAX(kennel_number) FROM kennels WHERE set_name = $1"
        )
        .bind(set_name)
        .fetch_one(&mut *tx)
        .await?;

        if current_max.is_some() {
            return Err(AppError::Conflict(format!("Set '{}' already exists", set_name)));
        }

        let numbers = next_kennel_numbers(current_max, count);
        let kennels = insert_numbers(&mut tx, set_name, &numbers)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict(format!("Set '{}' already exists", set_name))
                } else {
                    e.into()
                }
            })?;

        tx.commit().await?;
        Ok(kennels)
    }

    /// Append `count` kennels to an existing set, continuing its numbering
    pub async fn extend_set(&self, set_name: &str, count: i32) -> AppResult<Vec<Kennel>> {
        let mut tx = self.pool.begin().await?;

        let current_max: Option<i32> = sqlx::query_scalar(
            "SELECT MAX(kennel_number) FROM kennels WHERE set_name = $1"
        )
        .bind(set_name)
        .fetch_one(&mut *tx)
        .await?;

        if current_max.is_none() {
            return Err(AppError::NotFound(format!("Set '{}' not found", set_name)));
        }

        let numbers = next_kennel_numbers(current_max, count);
        let kennels = insert_numbers(&mut tx, set_name, &numbers)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict("Kennel numbers changed concurrently, retry".to_string())
                } else {
                    e.into()
                }
            })?;

        tx.commit().await?;
        Ok(kennels)
    }

    /// Move kennels into a set and retire others to the Maintenance set
    pub async fn update_set_membership(
        &self,
        set_name: &str,
        add_ids: &[i32],
        remove_ids: &[i32],
    ) -> AppResult<Vec<Kennel>> {
        let mut tx = self.pool.begin().await?;

        let mut touched: Vec<i32> = add_ids.to_vec();
        touched.extend_from_slice(remove_ids);
        let locked = lock_kennels(&mut tx, &touched).await?;

        for id in remove_ids {
            let kennel = locked
                .iter()
                .find(|k| k.id == *id)
                .ok_or_else(|| AppError::NotFound(format!("Kennel {} not found", id)))?;
            if kennel.set_name != set_name {
                return Err(AppError::BadRequest(format!(
                    "Kennel {} does not belong to set '{}'",
                    id, set_name
                )));
            }
            if kennel.status.is_engaged() {
                return Err(AppError::BusinessRule(format!(
                    "Kennel {} is {} and cannot be removed",
                    kennel.kennel_number, kennel.status
                )));
            }
            move_kennel(&mut tx, kennel, MAINTENANCE_SET, KennelStatus::Maintenance).await?;
        }

        for id in add_ids {
            let kennel = locked
                .iter()
                .find(|k| k.id == *id)
                .ok_or_else(|| AppError::NotFound(format!("Kennel {} not found", id)))?;
            if kennel.set_name == set_name {
                continue;
            }
            let status = if kennel.status == KennelStatus::Maintenance {
                KennelStatus::Available
            } else {
                kennel.status
            };
            move_kennel(&mut tx, kennel, set_name, status).await?;
        }

        let kennels = sqlx::query_as::<_, Kennel>(
            "SELECT * FROM kennels WHERE set_name = $1 ORDER BY kennel_number"
        )
        .bind(set_name)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(kennels)
    }

    /// Manually switch a kennel between available and maintenance
    pub async fn update_status(&self, id: i32, status: KennelStatus) -> AppResult<Kennel> {
        let mut tx = self.pool.begin().await?;

        let kennel = lock_kennels(&mut tx, &[id])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Kennel {} not found", id)))?;

        if kennel.status.is_engaged() {
            return Err(AppError::BusinessRule(format!(
                "Kennel {} is {}; its status follows its reservation",
                kennel.kennel_number, kennel.status
            )));
        }

        set_status(&mut tx, &[id], status).await?;
        let updated = sqlx::query_as::<_, Kennel>("SELECT * FROM kennels WHERE id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }
}

async fn insert_numbers(
    conn: &mut PgConnection,
    set_name: &str,
    numbers: &[i32],
) -> Result<Vec<Kennel>, sqlx::Error> {
    sqlx::query_as::<_, Kennel>(
        r#"
        INSERT INTO kennels (kennel_number, set_name, status)
        SELECT n, $2, 'available' FROM UNNEST($1::int[]) AS n
        RETURNING *
        "#,
    )
    .bind(numbers)
    .bind(set_name)
    .fetch_all(conn)
    .await
}

/// Reassign a kennel to another set, renumbering only on collision
async fn move_kennel(
    conn: &mut PgConnection,
    kennel: &Kennel,
    target_set: &str,
    status: KennelStatus,
) -> AppResult<()> {
    let taken: Vec<i32> = sqlx::query_scalar(
        "SELECT kennel_number FROM kennels WHERE set_name = $1 AND id != $2"
    )
    .bind(target_set)
    .bind(kennel.id)
    .fetch_all(&mut *conn)
    .await?;

    let number = free_kennel_number(&taken, kennel.kennel_number);

    sqlx::query("UPDATE kennels SET set_name = $1, kennel_number = $2, status = $3 WHERE id = $4")
        .bind(target_set)
        .bind(number)
        .bind(status)
        .bind(kennel.id)
        .execute(&mut *conn)
        .await?;

    tracing::info!(
        "Kennel {} moved from '{}' #{} to '{}' #{}",
        kennel.id, kennel.set_name, kennel.kennel_number, target_set, number
    );
    Ok(())
}

/// Lock the given kennels for the rest of the transaction
pub(crate) async fn lock_kennels(conn: &mut PgConnection, ids: &[i32]) -> AppResult<Vec<Kennel>> {
    let rows = sqlx::query_as::<_, Kennel>(
        "SELECT * FROM kennels WHERE id = ANY($1) ORDER BY id FOR UPDATE"
    )
    .bind(ids)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

/// Set the status of every given kennel
pub(crate) async fn set_status(conn: &mut PgConnection, ids: &[i32], status: KennelStatus) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    sqlx::query("UPDATE kennels SET status = $1 WHERE id = ANY($2)")
        .bind(status)
        .bind(ids)
        .execute(conn)
        .await?;
    Ok(())
}
