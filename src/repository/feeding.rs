//! Feeding schedule repository

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        enums::FeedingSlot,
        feeding::{FeedingEntry, FeedingHistoryQuery},
    },
};

const ENTRY_SELECT: &str = r#"
    SELECT f.id, f.kennel_id, k.kennel_number, k.set_name,
           f.feeding_date, f.feeding_time, f.fed, f.eaten
    FROM feeding_schedule f
    JOIN kennels k ON k.id = f.kennel_id
"#;

#[derive(Clone)]
pub struct FeedingRepository {
    pool: Pool<Postgres>,
}

impl FeedingRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Write one row per kennel for a date/slot, replacing any earlier round
    pub async fn upsert_round(
        &self,
        feeding_date: NaiveDate,
        feeding_time: FeedingSlot,
        kennel_ids: &[i32],
        fed: &[bool],
        eaten: &[bool],
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO feeding_schedule (kennel_id, feeding_date, feeding_time, fed, eaten)
            SELECT k, $4, $5, f, e
            FROM UNNEST($1::int[], $2::bool[], $3::bool[]) AS t(k, f, e)
            ON CONFLICT (kennel_id, feeding_date, feeding_time) DO UPDATE SET
                fed = EXCLUDED.fed,
                eaten = EXCLUDED.eaten,
                created_at = NOW()
            "#,
        )
        .bind(kennel_ids)
        .bind(fed)
        .bind(eaten)
        .bind(feeding_date)
        .bind(feeding_time)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Raw entries, newest day first; ascending id within a kennel/day
    pub async fn history(&self, query: &FeedingHistoryQuery) -> AppResult<Vec<FeedingEntry>> {
        let sql = format!(
            r#"{}
            WHERE ($1::int IS NULL OR f.kennel_id = $1)
              AND ($2::date IS NULL OR f.feeding_date >= $2)
              AND ($3::date IS NULL OR f.feeding_date <= $3)
            ORDER BY f.feeding_date DESC, k.set_name, k.kennel_number, f.id
            "#,
            ENTRY_SELECT
        );
        let rows = sqlx::query_as::<_, FeedingEntry>(&sql)
            .bind(query.kennel_id)
            .bind(query.start_date)
            .bind(query.end_date)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Raw entries for a set of kennels, optionally on a single date
    pub async fn history_for_kennels(
        &self,
        kennel_ids: &[i32],
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<FeedingEntry>> {
        let sql = format!(
            r#"{}
            WHERE f.kennel_id = ANY($1)
              AND f.feeding_date BETWEEN $2 AND $3
            ORDER BY f.feeding_date DESC, k.set_name, k.kennel_number, f.id
            "#,
            ENTRY_SELECT
        );
        let rows = sqlx::query_as::<_, FeedingEntry>(&sql)
            .bind(kennel_ids)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
