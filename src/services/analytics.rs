//! Analytics service

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;
use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::{
    api::analytics::{
        AnalyticsResponse, CustomerFrequency, KennelStats, RevenueStats, ServiceUtilization,
        StatEntry, StayStats,
    },
    error::AppResult,
    models::{
        analytics::AnalyticsRow,
        bill::stay_days,
        customer::Customer,
        enums::{KennelStatus, ReservationStatus},
        kennel::Kennel,
        reservation::HistoricalReservation,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AnalyticsService {
    repository: Repository,
}

impl AnalyticsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn report(&self) -> AppResult<AnalyticsResponse> {
        let rows = self.repository.reservations.analytics_rows().await?;
        let customers = self.repository.customers.list().await?;
        let historical = self.repository.reservations.list_historical().await?;
        let kennels = self.repository.kennels.list().await?;

        tracing::debug!(
            "Computing analytics over {} reservations, {} archived, {} kennels",
            rows.len(),
            historical.len(),
            kennels.len()
        );
        Ok(compute_report(&rows, &customers, &historical, &kennels))
    }
}

fn percent(part: i64, whole: i64) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64 * 100.0)
}

/// Count labels, most frequent first; ties keep first-seen order
fn ranked(counts: IndexMap<String, i64>) -> Vec<StatEntry> {
    let mut entries: Vec<StatEntry> = counts
        .into_iter()
        .map(|(label, value)| StatEntry { label, value })
        .collect();
    entries.sort_by(|a, b| b.value.cmp(&a.value));
    entries
}

/// Reduce raw collections into the analytics report
pub fn compute_report(
    rows: &[AnalyticsRow],
    customers: &[Customer],
    historical: &[HistoricalReservation],
    kennels: &[Kennel],
) -> AnalyticsResponse {
    let names: HashMap<i32, &str> = customers.iter().map(|c| (c.id, c.name.as_str())).collect();

    // Frequency counts live and archived reservations
    let mut frequency: IndexMap<i32, i64> = IndexMap::new();
    for customer_id in rows
        .iter()
        .map(|r| r.customer_id)
        .chain(historical.iter().map(|h| h.customer_id))
    {
        *frequency.entry(customer_id).or_default() += 1;
    }
    let mut reservation_frequency: Vec<CustomerFrequency> = frequency
        .into_iter()
        .map(|(customer_id, reservations)| CustomerFrequency {
            customer_id,
            customer_name: names.get(&customer_id).copied().unwrap_or_default().to_string(),
            reservations,
        })
        .collect();
    reservation_frequency.sort_by(|a, b| b.reservations.cmp(&a.reservations));

    let total_days: i64 = rows.iter().map(|r| stay_days(r.start_date, r.end_date)).sum();
    let stays = StayStats {
        total_days,
        average_days: (!rows.is_empty()).then(|| total_days as f64 / rows.len() as f64),
    };

    let mut monthly: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut total_revenue = Decimal::ZERO;
    let mut billed = 0i64;
    for row in rows.iter().filter(|r| r.status == ReservationStatus::Checkout) {
        total_revenue += row.revenue;
        billed += 1;
        let month = format!("{:04}-{:02}", row.end_date.year(), row.end_date.month());
        *monthly.entry(month).or_default() += row.revenue;
    }
    let revenue = RevenueStats {
        total: total_revenue,
        average: (billed > 0).then(|| total_revenue / Decimal::from(billed)),
        monthly,
    };

    let mut statuses: IndexMap<String, i64> = IndexMap::new();
    let mut breeds: IndexMap<String, i64> = IndexMap::new();
    let mut services = ServiceUtilization {
        pickup: 0,
        groom: 0,
        drop: 0,
    };
    for row in rows {
        *statuses.entry(row.status.to_string()).or_default() += 1;

        let breed = row
            .pet_breed
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_lowercase)
            .unwrap_or_else(|| "Unknown".to_string());
        *breeds.entry(breed).or_default() += 1;

        services.pickup += i64::from(row.pickup);
        services.groom += i64::from(row.groom);
        services.drop += i64::from(row.drop_off);
    }

    let total_kennels = kennels.len() as i64;
    let occupied = kennels
        .iter()
        .filter(|k| k.status == KennelStatus::Occupied)
        .count() as i64;

    let canceled = historical
        .iter()
        .filter(|h| h.status == ReservationStatus::Canceled)
        .count() as i64;

    AnalyticsResponse {
        total_customers: customers.len() as i64,
        reservation_frequency,
        stays,
        revenue,
        status_breakdown: ranked(statuses),
        breed_popularity: ranked(breeds),
        service_utilization: services,
        kennels: KennelStats {
            total: total_kennels,
            occupied,
            occupancy_rate: percent(occupied, total_kennels),
        },
        cancellation_rate: percent(canceled, historical.len() as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn customer(id: i32, name: &str) -> Customer {
        Customer {
            id,
            name: name.to_string(),
            phone: None,
            address: None,
            created_at: None,
        }
    }

    fn row(id: i32, customer_id: i32, breed: Option<&str>, status: ReservationStatus) -> AnalyticsRow {
        AnalyticsRow {
            reservation_id: id,
            customer_id,
            customer_name: String::new(),
            pet_breed: breed.map(str::to_string),
            status,
            start_date: date(1, 1),
            end_date: date(1, 3),
            pickup: false,
            groom: false,
            drop_off: false,
            revenue: Decimal::ZERO,
        }
    }

    fn kennel(id: i32, status: KennelStatus) -> Kennel {
        Kennel {
            id,
            kennel_number: id,
            set_name: "A".to_string(),
            status,
            created_at: None,
        }
    }

    #[test]
    fn test_empty_inputs_yield_null_rates() {
        let report = compute_report(&[], &[], &[], &[]);
        assert_eq!(report.total_customers, 0);
        assert_eq!(report.stays.average_days, None);
        assert_eq!(report.revenue.average, None);
        assert_eq!(report.kennels.occupancy_rate, None);
        assert_eq!(report.cancellation_rate, None);
        assert!(report.revenue.monthly.is_empty());
    }

    #[test]
    fn test_revenue_and_stays() {
        let mut first = row(1, 1, Some("Lab"), ReservationStatus::Checkout);
        first.revenue = dec!(1200);
        let mut second = row(2, 1, Some("lab"), ReservationStatus::Checkout);
        second.end_date = date(2, 2);
        second.start_date = date(2, 1);
        second.revenue = dec!(800);
        let third = row(3, 2, None, ReservationStatus::Reserved);

        let report = compute_report(
            &[first, second, third],
            &[customer(1, "Asha"), customer(2, "Ravi")],
            &[],
            &[],
        );

        assert_eq!(report.stays.total_days, 3 + 2 + 3);
        assert_eq!(report.revenue.total, dec!(2000));
        assert_eq!(report.revenue.average, Some(dec!(1000)));
        assert_eq!(
            report.revenue.monthly.iter().collect::<Vec<_>>(),
            vec![(&"2024-01".to_string(), &dec!(1200)), (&"2024-02".to_string(), &dec!(800))]
        );
        assert_eq!(report.breed_popularity[0], StatEntry { label: "lab".to_string(), value: 2 });
        assert_eq!(report.breed_popularity[1].label, "Unknown");
        assert_eq!(report.reservation_frequency[0].customer_name, "Asha");
        assert_eq!(report.reservation_frequency[0].reservations, 2);
    }

    #[test]
    fn test_rates_and_services() {
        let mut groomed = row(1, 1, None, ReservationStatus::Checkin);
        groomed.groom = true;
        groomed.pickup = true;
        let kennels = vec![
            kennel(1, KennelStatus::Occupied),
            kennel(2, KennelStatus::Available),
            kennel(3, KennelStatus::Available),
            kennel(4, KennelStatus::Reserved),
        ];

        let report = compute_report(&[groomed], &[customer(1, "Asha")], &[], &kennels);
        assert_eq!(report.kennels.occupancy_rate, Some(25.0));
        assert_eq!(report.service_utilization, ServiceUtilization { pickup: 1, groom: 1, drop: 0 });
        assert_eq!(report.status_breakdown, vec![StatEntry { label: "checkin".to_string(), value: 1 }]);
    }
}
