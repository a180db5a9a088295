//! Feeding schedule entries and the per-kennel daily log

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::FeedingSlot;

/// Feeding schedule row joined with its kennel label
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FeedingEntry {
    pub id: i32,
    pub kennel_id: i32,
    pub kennel_number: i32,
    pub set_name: String,
    pub feeding_date: NaiveDate,
    pub feeding_time: FeedingSlot,
    pub fed: bool,
    pub eaten: bool,
}

/// One row per kennel and day, folded from the raw entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FeedingRecord {
    pub kennel_id: i32,
    pub kennel_number: i32,
    pub set_name: String,
    pub feeding_date: NaiveDate,
    pub morning_fed: bool,
    pub noon_fed: bool,
}

/// Record a feeding round for every occupied kennel
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordFeeding {
    pub feeding_date: NaiveDate,
    pub feeding_time: FeedingSlot,
    /// Occupied kennels that were fed this round; the others are stored as not fed
    #[serde(default)]
    pub fed_kennel_ids: Vec<i32>,
    /// Occupied kennels whose pet finished the meal
    #[serde(default)]
    pub eaten_kennel_ids: Vec<i32>,
}

/// Result of a feeding round
#[derive(Debug, Serialize, ToSchema)]
pub struct FeedingRoundResult {
    pub feeding_date: NaiveDate,
    pub feeding_time: FeedingSlot,
    /// Number of kennel rows written
    pub recorded: usize,
    /// Requested kennels that are not currently occupied (ignored)
    pub skipped_kennel_ids: Vec<i32>,
}

/// Feeding history filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct FeedingHistoryQuery {
    pub kennel_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Fold raw entries into one record per (kennel, date).
///
/// Entries must be in fetch order; among duplicates for the same slot the
/// last one wins. Slots without any entry read as not fed. Output keeps the
/// order in which each (kennel, date) pair was first seen.
pub fn aggregate_feeding(entries: &[FeedingEntry]) -> Vec<FeedingRecord> {
    let mut records: IndexMap<(i32, NaiveDate), FeedingRecord> = IndexMap::new();

    for entry in entries {
        let record = records
            .entry((entry.kennel_id, entry.feeding_date))
            .or_insert_with(|| FeedingRecord {
                kennel_id: entry.kennel_id,
                kennel_number: entry.kennel_number,
                set_name: entry.set_name.clone(),
                feeding_date: entry.feeding_date,
                morning_fed: false,
                noon_fed: false,
            });

        match entry.feeding_time {
            FeedingSlot::Morning => record.morning_fed = entry.fed,
            FeedingSlot::Noon => record.noon_fed = entry.fed,
        }
    }

    records.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn entry(id: i32, kennel_id: i32, day: u32, slot: FeedingSlot, fed: bool) -> FeedingEntry {
        FeedingEntry {
            id,
            kennel_id,
            kennel_number: kennel_id,
            set_name: "A".to_string(),
            feeding_date: date(day),
            feeding_time: slot,
            fed,
            eaten: false,
        }
    }

    #[test]
    fn test_one_record_per_kennel_and_date() {
        let entries = vec![
            entry(1, 1, 1, FeedingSlot::Morning, true),
            entry(2, 1, 1, FeedingSlot::Noon, true),
            entry(3, 2, 1, FeedingSlot::Morning, true),
            entry(4, 1, 2, FeedingSlot::Noon, true),
        ];

        let records = aggregate_feeding(&entries);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].kennel_id, 1);
        assert_eq!(records[0].feeding_date, date(1));
        assert!(records[0].morning_fed && records[0].noon_fed);

        assert_eq!(records[1].kennel_id, 2);
        assert!(records[1].morning_fed);
        assert!(!records[1].noon_fed);

        assert_eq!(records[2].feeding_date, date(2));
        assert!(!records[2].morning_fed);
        assert!(records[2].noon_fed);
    }

    #[test]
    fn test_duplicates_last_observed_wins() {
        let entries = vec![
            entry(1, 1, 1, FeedingSlot::Morning, true),
            entry(2, 1, 1, FeedingSlot::Morning, false),
            entry(3, 1, 1, FeedingSlot::Noon, false),
            entry(4, 1, 1, FeedingSlot::Noon, true),
        ];

        let records = aggregate_feeding(&entries);
        assert_eq!(records.len(), 1);
        assert!(!records[0].morning_fed);
        assert!(records[0].noon_fed);
    }

    #[test]
    fn test_fold_is_idempotent_over_refetch() {
        let entries = vec![
            entry(1, 3, 4, FeedingSlot::Noon, true),
            entry(2, 3, 4, FeedingSlot::Morning, true),
        ];
        assert_eq!(aggregate_feeding(&entries), aggregate_feeding(&entries));
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_feeding(&[]).is_empty());
    }
}
