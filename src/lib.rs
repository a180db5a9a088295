//! Kennel Management Server
//!
//! REST JSON API for a pet boarding facility: kennel inventory, reservation
//! lifecycle, feeding rounds, customer registry, calendar, analytics and
//! checkout billing.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
