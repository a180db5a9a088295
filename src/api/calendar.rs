//! Calendar endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        calendar::{
            CalendarEvent, CalendarEventDetail, CalendarQuery, DraftQuery, EventDetailQuery,
            ReservationDraft,
        },
        reservation::{Reservation, RescheduleReservation},
    },
};

use super::AuthenticatedStaff;

/// Reservations overlapping a date window
#[utoipa::path(
    get,
    path = "/calendar/events",
    tag = "calendar",
    security(("bearer_auth" = [])),
    params(CalendarQuery),
    responses(
        (status = 200, description = "Calendar events", body = Vec<CalendarEvent>)
    )
)]
pub async fn list_events(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<Vec<CalendarEvent>>> {
    let events = state.services.calendar.events(&query).await?;
    Ok(Json(events))
}

/// Event detail with pet, customer and feeding history
#[utoipa::path(
    get,
    path = "/calendar/events/{id}",
    tag = "calendar",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reservation ID"),
        EventDetailQuery
    ),
    responses(
        (status = 200, description = "Event detail", body = CalendarEventDetail),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_event(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<i32>,
    Query(query): Query<EventDetailQuery>,
) -> AppResult<Json<CalendarEventDetail>> {
    let detail = state.services.calendar.event_detail(id, &query).await?;
    Ok(Json(detail))
}

/// Move an event to new dates
#[utoipa::path(
    patch,
    path = "/calendar/events/{id}",
    tag = "calendar",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body = RescheduleReservation,
    responses(
        (status = 200, description = "Event moved", body = Reservation),
        (status = 400, description = "End date before start date"),
        (status = 422, description = "Reservation is closed")
    )
)]
pub async fn move_event(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<i32>,
    Json(dates): Json<RescheduleReservation>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.calendar.move_event(id, dates).await?;
    Ok(Json(reservation))
}

/// Reservation form pre-filled for an empty date
#[utoipa::path(
    get,
    path = "/calendar/draft",
    tag = "calendar",
    security(("bearer_auth" = [])),
    params(DraftQuery),
    responses(
        (status = 200, description = "Reservation draft", body = ReservationDraft)
    )
)]
pub async fn reservation_draft(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Query(query): Query<DraftQuery>,
) -> AppResult<Json<ReservationDraft>> {
    let draft = state.services.calendar.draft(query.start_date).await?;
    Ok(Json(draft))
}
