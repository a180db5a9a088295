//! Feeding tracker service

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::KennelStatus,
        feeding::{aggregate_feeding, FeedingHistoryQuery, FeedingRecord, FeedingRoundResult, RecordFeeding},
        kennel::Kennel,
    },
    repository::Repository,
};

/// Column-wise rows for one feeding round
#[derive(Debug, Default, PartialEq, Eq)]
struct FeedingRound {
    kennel_ids: Vec<i32>,
    fed: Vec<bool>,
    eaten: Vec<bool>,
    skipped: Vec<i32>,
}

/// One row per occupied kennel; requested IDs that are not occupied are skipped
fn plan_round(occupied: &[Kennel], fed_ids: &[i32], eaten_ids: &[i32]) -> FeedingRound {
    let mut round = FeedingRound::default();
    for kennel in occupied {
        round.kennel_ids.push(kennel.id);
        round.fed.push(fed_ids.contains(&kennel.id));
        round.eaten.push(eaten_ids.contains(&kennel.id));
    }

    let mut skipped: Vec<i32> = fed_ids
        .iter()
        .chain(eaten_ids)
        .copied()
        .filter(|id| !round.kennel_ids.contains(id))
        .collect();
    skipped.sort_unstable();
    skipped.dedup();
    round.skipped = skipped;
    round
}

#[derive(Clone)]
pub struct FeedingService {
    repository: Repository,
}

impl FeedingService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Kennels that currently hold a pet
    pub async fn occupied_kennels(&self) -> AppResult<Vec<Kennel>> {
        self.repository.kennels.list_by_status(KennelStatus::Occupied).await
    }

    /// Record a feeding round for a date and slot
    pub async fn record_round(&self, data: RecordFeeding) -> AppResult<FeedingRoundResult> {
        let occupied = self.occupied_kennels().await?;
        if occupied.is_empty() {
            return Err(AppError::BusinessRule("No occupied kennels to record".to_string()));
        }

        let round = plan_round(&occupied, &data.fed_kennel_ids, &data.eaten_kennel_ids);
        if !round.skipped.is_empty() {
            tracing::warn!("Ignoring feeding for unoccupied kennels {:?}", round.skipped);
        }

        self.repository
            .feeding
            .upsert_round(
                data.feeding_date,
                data.feeding_time,
                &round.kennel_ids,
                &round.fed,
                &round.eaten,
            )
            .await?;

        tracing::info!(
            "Recorded {} feeding for {} kennels on {}",
            data.feeding_time,
            round.kennel_ids.len(),
            data.feeding_date
        );

        Ok(FeedingRoundResult {
            feeding_date: data.feeding_date,
            feeding_time: data.feeding_time,
            recorded: round.kennel_ids.len(),
            skipped_kennel_ids: round.skipped,
        })
    }

    /// Per-kennel daily feeding log
    pub async fn history(&self, query: &FeedingHistoryQuery) -> AppResult<Vec<FeedingRecord>> {
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            if end < start {
                return Err(AppError::Validation("End date is before start date".to_string()));
            }
        }
        let entries = self.repository.feeding.history(query).await?;
        Ok(aggregate_feeding(&entries))
    }

    /// Feeding log of specific kennels between two dates, inclusive
    pub async fn history_for_kennels(
        &self,
        kennel_ids: &[i32],
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<FeedingRecord>> {
        if kennel_ids.is_empty() || to < from {
            return Ok(Vec::new());
        }
        let entries = self
            .repository
            .feeding
            .history_for_kennels(kennel_ids, from, to)
            .await?;
        Ok(aggregate_feeding(&entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupied(id: i32) -> Kennel {
        Kennel {
            id,
            kennel_number: id,
            set_name: "A".to_string(),
            status: KennelStatus::Occupied,
            created_at: None,
        }
    }

    #[test]
    fn test_round_covers_every_occupied_kennel() {
        let kennels = vec![occupied(1), occupied(2), occupied(3)];
        let round = plan_round(&kennels, &[1, 3], &[3]);

        assert_eq!(round.kennel_ids, vec![1, 2, 3]);
        assert_eq!(round.fed, vec![true, false, true]);
        assert_eq!(round.eaten, vec![false, false, true]);
        assert!(round.skipped.is_empty());
    }

    #[test]
    fn test_round_skips_unoccupied_requests() {
        let kennels = vec![occupied(4)];
        let round = plan_round(&kennels, &[4, 9, 7], &[9]);

        assert_eq!(round.kennel_ids, vec![4]);
        assert_eq!(round.fed, vec![true]);
        assert_eq!(round.skipped, vec![7, 9]);
    }

    #[test]
    fn test_round_with_nothing_checked() {
        let kennels = vec![occupied(1), occupied(2)];
        let round = plan_round(&kennels, &[], &[]);
        assert_eq!(round.fed, vec![false, false]);
        assert_eq!(round.eaten, vec![false, false]);
    }
}
