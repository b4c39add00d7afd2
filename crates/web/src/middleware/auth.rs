//! Authentication extractors and session helpers.
//!
//! The access gate has already resolved the session by the time these run;
//! they read its [`Identity`] from request extensions instead of touching the
//! session again.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::middleware::gate::Identity;
use crate::models::session::keys;
use crate::models::{CurrentUser, User};
use crate::state::AppState;

/// Extractor that requires a signed-in admin.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
///     format!("Olá, {}!", admin.name)
/// }
/// ```
pub struct RequireAdmin(pub User);

/// Why an admin-only request was turned away.
///
/// Redirect targets come from the gate's [`GatePaths`](helpdesk_core::GatePaths).
/// Anonymous requests never get this far on protected paths (the gate sends
/// them to login first), but a route configured as public still can.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminRejection {
    /// Not signed in.
    RedirectToLogin(String),
    /// Signed in but not an admin (HTML request).
    RedirectToUnauthorized(String),
    /// Signed in but not an admin (API request).
    Forbidden,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(to) | Self::RedirectToUnauthorized(to) => {
                Redirect::to(&to).into_response()
            }
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let paths = state.gate().paths();
        let is_api = parts.uri.path().starts_with("/api/");
        let not_admin = || {
            if is_api {
                AdminRejection::Forbidden
            } else {
                AdminRejection::RedirectToUnauthorized(paths.unauthorized.clone())
            }
        };

        let current = parts
            .extensions
            .get::<Identity>()
            .and_then(|identity| identity.0.clone())
            .ok_or_else(|| AdminRejection::RedirectToLogin(paths.login.clone()))?;

        match state.users().get_user_by_email(&current.email).await {
            Ok(Some(user)) if user.is_admin() => Ok(Self(user)),
            Ok(Some(user)) => {
                tracing::debug!(user_id = %user.id, role = %user.role, "Non-admin denied");
                Err(not_admin())
            }
            Ok(None) => {
                tracing::warn!(user_id = %current.id, "Signed-in user has no profile");
                Err(not_admin())
            }
            Err(e) => {
                tracing::error!(user_id = %current.id, error = %e, "Profile lookup failed");
                Err(not_admin())
            }
        }
    }
}

/// Extractor that optionally gets the signed-in user.
///
/// Never rejects. Public pages use it to adapt their navigation.
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts
                .extensions
                .get::<Identity>()
                .and_then(|identity| identity.0.clone()),
        ))
    }
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CURRENT_USER, user).await
}

/// Helper to end the session entirely (logout).
///
/// # Errors
///
/// Returns an error if the session store cannot delete the record.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_redirect_rejections_use_their_target() {
        let response = AdminRejection::RedirectToUnauthorized("/sem-acesso".into()).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/sem-acesso");

        let response = AdminRejection::RedirectToLogin("/entrar".into()).into_response();
        assert_eq!(response.headers()[header::LOCATION], "/entrar");
    }

    #[test]
    fn test_api_rejection_is_forbidden() {
        assert_eq!(
            AdminRejection::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
