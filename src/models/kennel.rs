//! Kennel model and set grouping

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::KennelStatus;

/// Set that kennels removed from service are moved into
pub const MAINTENANCE_SET: &str = "Maintenance";

/// Kennel record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Kennel {
    pub id: i32,
    /// Number unique within the set
    pub kennel_number: i32,
    /// Grouping label (physical row or building section)
    pub set_name: String,
    pub status: KennelStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// Kennels sharing a set name, ordered by number
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct KennelSet {
    pub set_name: String,
    pub kennels: Vec<Kennel>,
    pub available: usize,
    pub total: usize,
}

/// Create a new set of kennels
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateKennelSet {
    #[validate(length(min = 1, max = 64, message = "Set name is required"))]
    pub set_name: String,
    #[validate(range(min = 1, max = 500, message = "Count must be positive"))]
    pub count: i32,
}

/// Append kennels to an existing set
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ExtendKennelSet {
    #[validate(range(min = 1, max = 500, message = "Count must be positive"))]
    pub count: i32,
}

/// Change the membership of a set
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateKennelSet {
    /// Kennels moved into this set from elsewhere
    #[serde(default)]
    pub add_kennel_ids: Vec<i32>,
    /// Kennels moved out of this set into Maintenance
    #[serde(default)]
    pub remove_kennel_ids: Vec<i32>,
}

/// Manual status change (available <-> maintenance)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateKennelStatus {
    pub status: KennelStatus,
}

/// Kennel summary embedded in reservation views
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct KennelShort {
    pub id: i32,
    pub kennel_number: i32,
    pub set_name: String,
}

/// Group kennels by set name, sets ordered by name and kennels by number
pub fn group_into_sets(mut kennels: Vec<Kennel>) -> Vec<KennelSet> {
    kennels.sort_by(|a, b| {
        a.set_name
            .cmp(&b.set_name)
            .then(a.kennel_number.cmp(&b.kennel_number))
    });

    let mut sets: IndexMap<String, Vec<Kennel>> = IndexMap::new();
    for kennel in kennels {
        sets.entry(kennel.set_name.clone()).or_default().push(kennel);
    }

    sets.into_iter()
        .map(|(set_name, kennels)| KennelSet {
            available: kennels
                .iter()
                .filter(|k| k.status == KennelStatus::Available)
                .count(),
            total: kennels.len(),
            set_name,
            kennels,
        })
        .collect()
}

/// Numbers for `count` new kennels continuing after the highest number in the set
pub fn next_kennel_numbers(current_max: Option<i32>, count: i32) -> Vec<i32> {
    let start = current_max.unwrap_or(0) + 1;
    (start..start + count.max(0)).collect()
}

/// Keep `preferred` when free in the target set, else take the next free number
pub fn free_kennel_number(taken: &[i32], preferred: i32) -> i32 {
    if !taken.contains(&preferred) {
        return preferred;
    }
    taken.iter().copied().max().unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kennel(id: i32, number: i32, set: &str, status: KennelStatus) -> Kennel {
        Kennel {
            id,
            kennel_number: number,
            set_name: set.to_string(),
            status,
            created_at: None,
        }
    }

    #[test]
    fn test_next_numbers_continue_from_set_max() {
        assert_eq!(next_kennel_numbers(Some(12), 3), vec![13, 14, 15]);
        assert_eq!(next_kennel_numbers(None, 2), vec![1, 2]);
        assert!(next_kennel_numbers(Some(4), 0).is_empty());
    }

    #[test]
    fn test_free_number() {
        assert_eq!(free_kennel_number(&[1, 2, 3], 5), 5);
        assert_eq!(free_kennel_number(&[1, 2, 3], 2), 4);
        assert_eq!(free_kennel_number(&[], 7), 7);
    }

    #[test]
    fn test_group_into_sets_orders_by_name_then_number() {
        let sets = group_into_sets(vec![
            kennel(1, 2, "B", KennelStatus::Available),
            kennel(2, 1, "A", KennelStatus::Occupied),
            kennel(3, 1, "B", KennelStatus::Reserved),
            kennel(4, 3, "A", KennelStatus::Available),
            kennel(5, 2, "A", KennelStatus::Available),
        ]);

        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].set_name, "A");
        let numbers: Vec<i32> = sets[0].kennels.iter().map(|k| k.kennel_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(sets[0].available, 2);
        assert_eq!(sets[0].total, 3);
        assert_eq!(sets[1].set_name, "B");
        assert_eq!(sets[1].kennels[0].id, 3);
        assert_eq!(sets[1].available, 1);
    }

    #[test]
    fn test_create_set_validation() {
        let ok = CreateKennelSet { set_name: "A".into(), count: 3 };
        assert!(ok.validate().is_ok());

        let empty = CreateKennelSet { set_name: String::new(), count: 3 };
        assert!(empty.validate().is_err());

        let zero = CreateKennelSet { set_name: "A".into(), count: 0 };
        assert!(zero.validate().is_err());
    }
}
