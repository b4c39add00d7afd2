//! HTTP route handlers for the helpdesk.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (ticket store ping)
//!
//! # Tickets (public)
//! GET  /novo-ticket            - Ticket form
//! POST /novo-ticket            - Submit ticket
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! POST /logout                 - Logout action
//!
//! # Dashboard (admin only)
//! GET  /dashboard              - Ticket list with filter, sort and counts
//! GET  /api/tickets            - Same data as JSON
//! GET  /unauthorized           - Shown to signed-in non-admins
//! ```

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod home;
pub mod tickets;

use axum::{
    Router,
    routing::{get, post},
};

use helpdesk_core::GatePaths;

use crate::state::AppState;

/// An `<option>` in a rendered `<select>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

impl SelectOption {
    /// Build an option, selected when `value == current`.
    #[must_use]
    pub fn new(value: &'static str, label: &'static str, current: &str) -> Self {
        Self {
            value,
            label,
            selected: value == current,
        }
    }
}

/// Create the auth routes router.
pub fn auth_routes(paths: &GatePaths) -> Router<AppState> {
    Router::new()
        .route(&paths.login, get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the dashboard routes router.
pub fn dashboard_routes(paths: &GatePaths) -> Router<AppState> {
    Router::new()
        .route(&paths.dashboard, get(dashboard::dashboard))
        .route("/api/tickets", get(dashboard::api_tickets))
        .route(&paths.unauthorized, get(dashboard::unauthorized))
}

/// Create all routes for the helpdesk.
///
/// Login, dashboard and unauthorized pages are mounted at `paths`.
pub fn routes(paths: &GatePaths) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route(
            "/novo-ticket",
            get(tickets::new_ticket).post(tickets::create_ticket),
        )
        .merge(auth_routes(paths))
        .merge(dashboard_routes(paths))
}
