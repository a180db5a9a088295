//! Calendar view service

use crate::{
    error::{AppError, AppResult},
    models::{
        calendar::{
            CalendarEvent, CalendarEventDetail, CalendarQuery, EventDetailQuery, ReservationDraft,
        },
        enums::KennelStatus,
        reservation::{Reservation, RescheduleReservation},
    },
    repository::Repository,
};

use super::feeding::FeedingService;

#[derive(Clone)]
pub struct CalendarService {
    repository: Repository,
    feeding: FeedingService,
}

impl CalendarService {
    pub fn new(repository: Repository) -> Self {
        Self {
            feeding: FeedingService::new(repository.clone()),
            repository,
        }
    }

    /// Events for every reservation overlapping the window
    pub async fn events(&self, query: &CalendarQuery) -> AppResult<Vec<CalendarEvent>> {
        if let (Some(from), Some(to)) = (query.from, query.to) {
            if to < from {
                return Err(AppError::Validation("Window end is before its start".to_string()));
            }
        }

        let reservations = self.repository.reservations.list_details().await?;
        let mut events: Vec<CalendarEvent> = reservations
            .iter()
            .filter(|r| query.overlaps(r.start_date, r.end_date))
            .map(CalendarEvent::from)
            .collect();
        events.sort_by(|a, b| a.start.cmp(&b.start).then(a.reservation_id.cmp(&b.reservation_id)));
        Ok(events)
    }

    /// Reservation detail with the feeding log of its kennels
    pub async fn event_detail(
        &self,
        id: i32,
        query: &EventDetailQuery,
    ) -> AppResult<CalendarEventDetail> {
        let reservation = self.repository.reservations.get_details(id).await?;
        let feeding_history = match query.history_window(reservation.start_date, reservation.end_date) {
            Some((from, to)) => {
                self.feeding
                    .history_for_kennels(&reservation.kennel_ids, from, to)
                    .await?
            }
            None => Vec::new(),
        };
        Ok(CalendarEventDetail {
            reservation,
            feeding_history,
        })
    }

    /// Drag an event to new dates
    pub async fn move_event(&self, id: i32, dates: RescheduleReservation) -> AppResult<Reservation> {
        let reservation = self
            .repository
            .reservations
            .reschedule(id, &dates)
            .await
            .map_err(|e| {
                tracing::warn!("Calendar move of reservation {} rejected: {}", id, e);
                e
            })?;
        tracing::info!(
            "Reservation {} dragged to {} - {}",
            id,
            reservation.start_date,
            reservation.end_date
        );
        Ok(reservation)
    }

    /// Reservation form pre-filled for a clicked empty date
    pub async fn draft(&self, start_date: chrono::NaiveDate) -> AppResult<ReservationDraft> {
        let available_kennels = self
            .repository
            .kennels
            .list_by_status(KennelStatus::Available)
            .await?;
        Ok(ReservationDraft {
            start_date,
            end_date: start_date,
            available_kennels,
        })
    }
}
