//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{analytics, auth, billing, calendar, customers, feeding, health, kennels, reservations};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kennel Server API",
        version = "0.3.0",
        description = "Pet boarding kennel management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        auth::create_staff,
        // Kennels
        kennels::list_kennel_sets,
        kennels::list_available_kennels,
        kennels::get_kennel,
        kennels::create_kennel_set,
        kennels::extend_kennel_set,
        kennels::update_kennel_set,
        kennels::update_kennel_status,
        // Reservations
        reservations::create_reservation,
        reservations::list_reservations,
        reservations::list_historical_reservations,
        reservations::get_reservation,
        reservations::update_reservation,
        reservations::check_in,
        reservations::cancel_reservation,
        // Feeding
        feeding::list_occupied,
        feeding::record_feeding,
        feeding::feeding_history,
        // Customers
        customers::customer_registry,
        customers::get_customer,
        customers::update_customer,
        // Calendar
        calendar::list_events,
        calendar::get_event,
        calendar::move_event,
        calendar::reservation_draft,
        // Analytics
        analytics::get_analytics,
        // Billing
        billing::bill_quote,
        billing::checkout,
        billing::list_bills,
        billing::get_bill,
        billing::reservation_bills,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::StaffInfo,
            crate::models::staff::CreateStaff,
            crate::models::enums::StaffRole,
            // Kennels
            crate::models::kennel::Kennel,
            crate::models::kennel::KennelSet,
            crate::models::kennel::KennelShort,
            crate::models::kennel::CreateKennelSet,
            crate::models::kennel::ExtendKennelSet,
            crate::models::kennel::UpdateKennelSet,
            crate::models::kennel::UpdateKennelStatus,
            crate::models::enums::KennelStatus,
            // Reservations
            crate::models::reservation::Reservation,
            crate::models::reservation::ReservationDetails,
            crate::models::reservation::CreateReservation,
            crate::models::reservation::UpdateReservation,
            crate::models::reservation::KennelReassignment,
            crate::models::reservation::RescheduleReservation,
            crate::models::reservation::HistoricalReservation,
            crate::models::reservation::PetInformation,
            crate::models::reservation::PetInformationInput,
            crate::models::reservation::DateMatch,
            crate::models::enums::ReservationStatus,
            // Customers
            crate::models::customer::Customer,
            crate::models::customer::NewCustomer,
            crate::models::customer::UpdateCustomer,
            crate::models::customer::CustomerDetails,
            // Feeding
            crate::models::feeding::RecordFeeding,
            crate::models::feeding::FeedingRecord,
            crate::models::feeding::FeedingRoundResult,
            crate::models::enums::FeedingSlot,
            // Calendar
            crate::models::calendar::CalendarEvent,
            crate::models::calendar::CalendarEventDetail,
            crate::models::calendar::EventColor,
            crate::models::calendar::ReservationDraft,
            // Analytics
            analytics::AnalyticsResponse,
            analytics::CustomerFrequency,
            analytics::StayStats,
            analytics::RevenueStats,
            analytics::ServiceUtilization,
            analytics::KennelStats,
            analytics::StatEntry,
            // Billing
            crate::models::bill::Bill,
            crate::models::bill::BillQuote,
            crate::models::bill::CheckoutRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Staff authentication"),
        (name = "kennels", description = "Kennel inventory"),
        (name = "reservations", description = "Reservation lifecycle"),
        (name = "feeding", description = "Feeding tracker"),
        (name = "customers", description = "Customer registry"),
        (name = "calendar", description = "Calendar view"),
        (name = "analytics", description = "Business analytics"),
        (name = "billing", description = "Checkout and bills")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
