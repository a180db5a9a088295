//! Business logic services

pub mod analytics;
pub mod auth;
pub mod billing;
pub mod calendar;
pub mod customers;
pub mod feeding;
pub mod kennels;
pub mod reservations;

use crate::{
    config::{AuthConfig, BillingConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub auth: auth::AuthService,
    pub kennels: kennels::KennelsService,
    pub reservations: reservations::ReservationsService,
    pub feeding: feeding::FeedingService,
    pub customers: customers::CustomersService,
    pub calendar: calendar::CalendarService,
    pub analytics: analytics::AnalyticsService,
    pub billing: billing::BillingService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, billing_config: BillingConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            kennels: kennels::KennelsService::new(repository.clone()),
            reservations: reservations::ReservationsService::new(repository.clone()),
            feeding: feeding::FeedingService::new(repository.clone()),
            customers: customers::CustomersService::new(repository.clone()),
            calendar: calendar::CalendarService::new(repository.clone()),
            analytics: analytics::AnalyticsService::new(repository.clone()),
            billing: billing::BillingService::new(repository.clone(), billing_config),
            repository,
        }
    }
}
