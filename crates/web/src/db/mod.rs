//! Storage for users and tickets.
//!
//! # Database: `helpdesk`
//!
//! ## Tables
//!
//! - `helpdesk.user` - Staff accounts with argon2 password hashes and a role
//! - `helpdesk.ticket` - Customer support tickets
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p helpdesk-cli -- migrate
//! ```
//!
//! Handlers only see the [`UserStore`] and [`TicketStore`] traits. The
//! `PostgreSQL` implementations back the server; the in-memory ones back tests
//! and local demos.

pub mod memory;
pub mod tickets;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use helpdesk_core::{Email, Ticket, TicketDraft};

use crate::models::{NewUser, User};

pub use memory::{MemoryTicketStore, MemoryUserStore};
pub use tickets::PgTicketStore;
pub use users::PgUserStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The backing store cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Staff account storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a profile by email.
    async fn get_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Look up a profile together with its password hash.
    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// Create a user. Duplicate emails yield [`RepositoryError::Conflict`].
    async fn create_user(&self, new_user: &NewUser) -> Result<User, RepositoryError>;
}

/// Ticket storage.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// All tickets, newest first (`created_at` descending).
    async fn list_tickets(&self) -> Result<Vec<Ticket>, RepositoryError>;

    /// Persist a draft. The stored ticket always starts as `aberto`.
    async fn create_ticket(&self, draft: &TicketDraft) -> Result<Ticket, RepositoryError>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique violation to [`RepositoryError::Conflict`].
pub(crate) fn conflict_or_database(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(err)
}
