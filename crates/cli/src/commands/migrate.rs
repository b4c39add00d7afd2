//! Database migration command.
//!
//! Applies `crates/web/migrations/` (helpdesk schema and the session table).
//! The web server never migrates on startup.

use thiserror::Error;

use super::{CommandError, connect};

/// Errors from `migrate`.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending migrations.
pub async fn run() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!("Running helpdesk migrations...");
    sqlx::migrate!("../web/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
