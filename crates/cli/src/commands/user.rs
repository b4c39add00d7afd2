//! User management commands.
//!
//! ```bash
//! helpdesk-cli user create -e admin@example.com -n "Admin Name" -r admin -p 'secret-pass'
//! ```

use helpdesk_core::UserRole;
use helpdesk_web::db::PgUserStore;
use helpdesk_web::services::auth::{AuthError, AuthService};
use thiserror::Error;

use super::{CommandError, connect};

/// Errors from `user create`.
#[derive(Debug, Error)]
pub enum UserCommandError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error("User already exists with email: {0}")]
    UserExists(String),

    #[error(transparent)]
    Auth(AuthError),
}

/// Create a user with a password, returning its ID.
pub async fn create(
    email: &str,
    name: &str,
    role: &str,
    password: &str,
) -> Result<i32, UserCommandError> {
    let role = UserRole::from_stored(role);
    let pool = connect().await?;
    let store = PgUserStore::new(pool);

    tracing::info!("Creating user: {} ({})", email, role);

    let user = AuthService::new(&store)
        .register_with_password(email, name, role, password)
        .await
        .map_err(|e| match e {
            AuthError::UserAlreadyExists => UserCommandError::UserExists(email.to_owned()),
            other => UserCommandError::Auth(other),
        })?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}, Role: {}",
        user.id,
        user.email,
        user.role
    );
    if !user.is_admin() {
        tracing::warn!("Non-admin users can sign in but cannot open the dashboard.");
    }

    Ok(user.id.as_i32())
}
