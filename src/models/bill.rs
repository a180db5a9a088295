//! Bill model and stay charge computation

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// Bill snapshot written at checkout
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Bill {
    pub id: i32,
    pub reservation_id: i32,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub pet_name: String,
    pub pet_breed: Option<String>,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub days_stayed: i32,
    pub per_day_bill: Decimal,
    pub total_bill: Decimal,
    pub created_at: Option<DateTime<Utc>>,
}

/// Staff overrides for the computed bill; unset fields are computed
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct CheckoutRequest {
    pub per_day_bill: Option<Decimal>,
    pub days_stayed: Option<i32>,
    /// Manual total, kept as typed even when the rate was edited too
    pub total_bill: Option<Decimal>,
}

/// Computed bill figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BillQuote {
    pub reservation_id: i32,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub days_stayed: i32,
    pub per_day_bill: Decimal,
    pub total_bill: Decimal,
}

/// Largest amount a `NUMERIC(12, 2)` bill column holds
pub fn max_bill_amount() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

/// Reject negative amounts and amounts the bill columns cannot store
fn check_amount(value: Decimal, label: &str) -> AppResult<Decimal> {
    if value.is_sign_negative() {
        return Err(AppError::Validation(format!("{} cannot be negative", label)));
    }
    let max = max_bill_amount();
    if value.round_dp(2) > max {
        return Err(AppError::Validation(format!("{} cannot exceed {}", label, max)));
    }
    Ok(value)
}

/// Days boarded, counting both the arrival and the departure date
pub fn stay_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Compute days and total for a stay, applying staff overrides
pub fn compute_quote(
    reservation_id: i32,
    start: NaiveDate,
    end: NaiveDate,
    default_rate: Decimal,
    overrides: &CheckoutRequest,
) -> AppResult<BillQuote> {
    let days = match overrides.days_stayed {
        Some(days) => days,
        None => i32::try_from(stay_days(start, end))
            .map_err(|_| AppError::Validation("Stay is too long".to_string()))?,
    };
    if days <= 0 {
        return Err(AppError::Validation("Days stayed must be positive".to_string()));
    }

    let rate = check_amount(overrides.per_day_bill.unwrap_or(default_rate), "Per-day bill")?;

    let total = match overrides.total_bill {
        Some(total) => total,
        None => rate
            .checked_mul(Decimal::from(days))
            .ok_or_else(|| AppError::Validation("Total bill is too large".to_string()))?,
    };
    let total = check_amount(total, "Total bill")?;

    Ok(BillQuote {
        reservation_id,
        check_in_date: start,
        check_out_date: end,
        days_stayed: days,
        per_day_bill: rate,
        total_bill: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_stay_days_inclusive() {
        assert_eq!(stay_days(date(2024, 1, 1), date(2024, 1, 3)), 3);
        assert_eq!(stay_days(date(2024, 1, 1), date(2024, 1, 1)), 1);
        assert_eq!(stay_days(date(2024, 2, 28), date(2024, 3, 1)), 3);
    }

    #[test]
    fn test_default_quote() {
        let quote = compute_quote(7, date(2024, 1, 1), date(2024, 1, 3), dec!(400), &CheckoutRequest::default())
            .unwrap();
        assert_eq!(quote.days_stayed, 3);
        assert_eq!(quote.per_day_bill, dec!(400));
        assert_eq!(quote.total_bill, dec!(1200));
    }

    #[test]
    fn test_edited_rate_recomputes_total() {
        let overrides = CheckoutRequest {
            per_day_bill: Some(dec!(550.50)),
            ..Default::default()
        };
        let quote = compute_quote(7, date(2024, 1, 1), date(2024, 1, 3), dec!(400), &overrides).unwrap();
        assert_eq!(quote.total_bill, dec!(1651.50));
    }

    #[test]
    fn test_manual_total_wins_over_rate() {
        let overrides = CheckoutRequest {
            per_day_bill: Some(dec!(500)),
            days_stayed: None,
            total_bill: Some(dec!(1000)),
        };
        let quote = compute_quote(7, date(2024, 1, 1), date(2024, 1, 3), dec!(400), &overrides).unwrap();
        assert_eq!(quote.per_day_bill, dec!(500));
        assert_eq!(quote.total_bill, dec!(1000));
    }

    #[test]
    fn test_edited_days() {
        let overrides = CheckoutRequest {
            days_stayed: Some(2),
            ..Default::default()
        };
        let quote = compute_quote(7, date(2024, 1, 1), date(2024, 1, 3), dec!(400), &overrides).unwrap();
        assert_eq!(quote.days_stayed, 2);
        assert_eq!(quote.total_bill, dec!(800));
    }

    #[test]
    fn test_rejects_invalid_overrides() {
        let zero_days = CheckoutRequest {
            days_stayed: Some(0),
            ..Default::default()
        };
        assert!(compute_quote(1, date(2024, 1, 1), date(2024, 1, 3), dec!(400), &zero_days).is_err());

        let negative_rate = CheckoutRequest {
            per_day_bill: Some(dec!(-1)),
            ..Default::default()
        };
        assert!(compute_quote(1, date(2024, 1, 1), date(2024, 1, 3), dec!(400), &negative_rate).is_err());
    }

    #[test]
    fn test_amount_limit_matches_column() {
        assert_eq!(max_bill_amount(), dec!(9999999999.99));
    }

    #[test]
    fn test_huge_rate_is_rejected_not_panicking() {
        let overrides = CheckoutRequest {
            per_day_bill: Some(Decimal::MAX),
            days_stayed: Some(3),
            ..Default::default()
        };
        let result = compute_quote(1, date(2024, 1, 1), date(2024, 1, 3), dec!(400), &overrides);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_product_overflowing_column_is_rejected() {
        let overrides = CheckoutRequest {
            per_day_bill: Some(dec!(9999999999)),
            days_stayed: Some(i32::MAX),
            ..Default::default()
        };
        let result = compute_quote(1, date(2024, 1, 1), date(2024, 1, 3), dec!(400), &overrides);
        assert!(matches!(result, Err(AppError::Validation(_))));

        let rate_at_limit = CheckoutRequest {
            per_day_bill: Some(dec!(5000000000)),
            days_stayed: Some(2),
            ..Default::default()
        };
        let result = compute_quote(1, date(2024, 1, 1), date(2024, 1, 3), dec!(400), &rate_at_limit);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_oversized_manual_total_is_rejected() {
        let overrides = CheckoutRequest {
            total_bill: Some(dec!(10000000000)),
            ..Default::default()
        };
        let result = compute_quote(1, date(2024, 1, 1), date(2024, 1, 3), dec!(400), &overrides);
        assert!(matches!(result, Err(AppError::Validation(_))));

        let at_limit = CheckoutRequest {
            total_bill: Some(dec!(9999999999.99)),
            ..Default::default()
        };
        let quote = compute_quote(1, date(2024, 1, 1), date(2024, 1, 3), dec!(400), &at_limit).unwrap();
        assert_eq!(quote.total_bill, dec!(9999999999.99));
    }
}
