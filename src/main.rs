//! Kennel Server - pet boarding management
//!
//! REST API server for kennels, reservations, feeding and billing.

use anyhow::Context;
use axum::{
    routing::{get, patch, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use kennel_server::{
    api,
    config::{AppConfig, LoggingConfig},
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(&config.logging);

    tracing::info!("Starting Kennel Server v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone(), config.billing.clone());

    services
        .auth
        .ensure_bootstrap_admin()
        .await
        .context("Failed to create bootstrap admin")?;

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state);

    let addr = SocketAddr::new(
        server_host.parse().context("Invalid host address")?,
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Console logging (pretty or json) plus an optional daily rolling file
fn init_tracing(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("kennel_server={},tower_http=debug", logging.level).into());

    let console = match logging.format.as_str() {
        "json" => tracing_subscriber::fmt::layer().json().boxed(),
        _ => tracing_subscriber::fmt::layer().boxed(),
    };

    let (file, guard) = match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "kennel-server.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    guard
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        .route("/staff", post(api::auth::create_staff))
        // Kennels
        .route("/kennels", get(api::kennels::list_kennel_sets))
        .route("/kennels/available", get(api::kennels::list_available_kennels))
        .route("/kennels/:id", get(api::kennels::get_kennel))
        .route("/kennels/:id/status", put(api::kennels::update_kennel_status))
        .route("/kennels/sets", post(api::kennels::create_kennel_set))
        .route("/kennels/sets/:name", put(api::kennels::update_kennel_set))
        .route("/kennels/sets/:name/kennels", post(api::kennels::extend_kennel_set))
        // Reservations
        .route("/reservations", post(api::reservations::create_reservation))
        .route("/reservations", get(api::reservations::list_reservations))
        .route("/reservations/history", get(api::reservations::list_historical_reservations))
        .route("/reservations/:id", get(api::reservations::get_reservation))
        .route("/reservations/:id", put(api::reservations::update_reservation))
        .route("/reservations/:id/checkin", post(api::reservations::check_in))
        .route("/reservations/:id/cancel", post(api::reservations::cancel_reservation))
        // Billing
        .route("/reservations/:id/bill-quote", get(api::billing::bill_quote))
        .route("/reservations/:id/checkout", post(api::billing::checkout))
        .route("/reservations/:id/bills", get(api::billing::reservation_bills))
        .route("/bills", get(api::billing::list_bills))
        .route("/bills/:id", get(api::billing::get_bill))
        // Feeding
        .route("/feeding", post(api::feeding::record_feeding))
        .route("/feeding/occupied", get(api::feeding::list_occupied))
        .route("/feeding/history", get(api::feeding::feeding_history))
        // Customers
        .route("/customers", get(api::customers::customer_registry))
        .route("/customers/:id", get(api::customers::get_customer))
        .route("/customers/:id", put(api::customers::update_customer))
        // Calendar
        .route("/calendar/events", get(api::calendar::list_events))
        .route("/calendar/events/:id", get(api::calendar::get_event))
        .route("/calendar/events/:id", patch(api::calendar::move_event))
        .route("/calendar/draft", get(api::calendar::reservation_draft))
        // Analytics
        .route("/analytics", get(api::analytics::get_analytics))
        .with_state(state);

    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
