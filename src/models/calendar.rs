//! Calendar events built from reservations

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{
    enums::ReservationStatus,
    feeding::FeedingRecord,
    kennel::Kennel,
    reservation::ReservationDetails,
};

/// Event color by reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
    Green,
    Yellow,
    Gray,
}

impl From<ReservationStatus> for EventColor {
    fn from(status: ReservationStatus) -> Self {
        match status {
            ReservationStatus::Checkin => EventColor::Green,
            ReservationStatus::Reserved => EventColor::Yellow,
            _ => EventColor::Gray,
        }
    }
}

/// A reservation spanning its stay on the calendar
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CalendarEvent {
    pub reservation_id: i32,
    pub title: String,
    /// First day of the stay
    pub start: NaiveDate,
    /// Last day of the stay (inclusive)
    pub end: NaiveDate,
    pub status: ReservationStatus,
    pub color: EventColor,
    pub kennel_ids: Vec<i32>,
}

impl From<&ReservationDetails> for CalendarEvent {
    fn from(r: &ReservationDetails) -> Self {
        CalendarEvent {
            reservation_id: r.id,
            title: format!("{} ({})", r.pet_name, r.customer.name),
            start: r.start_date,
            end: r.end_date,
            status: r.status,
            color: r.status.into(),
            kennel_ids: r.kennel_ids.clone(),
        }
    }
}

/// Visible calendar window; both bounds optional and inclusive
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct CalendarQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl CalendarQuery {
    /// True when the stay shares at least one day with the window
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.from.map_or(true, |from| end >= from) && self.to.map_or(true, |to| start <= to)
    }
}

/// Event detail filter
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct EventDetailQuery {
    /// Restrict the feeding history to this date
    pub feeding_date: Option<NaiveDate>,
}

impl EventDetailQuery {
    /// Feeding dates to show for a stay; `None` when the requested date falls outside it
    pub fn history_window(&self, start: NaiveDate, end: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self.feeding_date {
            Some(day) if day < start || day > end => None,
            Some(day) => Some((day, day)),
            None => Some((start, end)),
        }
    }
}

/// Read-only detail shown when an event is opened
#[derive(Debug, Serialize, ToSchema)]
pub struct CalendarEventDetail {
    pub reservation: ReservationDetails,
    pub feeding_history: Vec<FeedingRecord>,
}

/// Draft query for "new reservation on this date"
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DraftQuery {
    pub start_date: NaiveDate,
}

/// Pre-filled reservation form
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDraft {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub available_kennels: Vec<Kennel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    #[test]
    fn test_colors() {
        assert_eq!(EventColor::from(ReservationStatus::Checkin), EventColor::Green);
        assert_eq!(EventColor::from(ReservationStatus::Reserved), EventColor::Yellow);
        assert_eq!(EventColor::from(ReservationStatus::Checkout), EventColor::Gray);
        assert_eq!(EventColor::from(ReservationStatus::Canceled), EventColor::Gray);
    }

    #[test]
    fn test_window_overlap() {
        let window = CalendarQuery {
            from: Some(date(10)),
            to: Some(date(20)),
        };
        assert!(window.overlaps(date(5), date(10)));
        assert!(window.overlaps(date(20), date(25)));
        assert!(window.overlaps(date(12), date(14)));
        assert!(window.overlaps(date(1), date(31)));
        assert!(!window.overlaps(date(1), date(9)));
        assert!(!window.overlaps(date(21), date(22)));

        assert!(CalendarQuery::default().overlaps(date(1), date(2)));
    }

    #[test]
    fn test_feeding_history_stays_within_the_stay() {
        let whole_stay = EventDetailQuery::default();
        assert_eq!(whole_stay.history_window(date(10), date(14)), Some((date(10), date(14))));

        let inside = EventDetailQuery {
            feeding_date: Some(date(12)),
        };
        assert_eq!(inside.history_window(date(10), date(14)), Some((date(12), date(12))));

        let last_day = EventDetailQuery {
            feeding_date: Some(date(14)),
        };
        assert_eq!(last_day.history_window(date(10), date(14)), Some((date(14), date(14))));

        let before = EventDetailQuery {
            feeding_date: Some(date(9)),
        };
        assert_eq!(before.history_window(date(10), date(14)), None);

        let after = EventDetailQuery {
            feeding_date: Some(date(15)),
        };
        assert_eq!(after.history_window(date(10), date(14)), None);
    }
}
