//! Access gate middleware.
//!
//! Runs once per request, before any handler. The routing decision itself is
//! [`helpdesk_core::AccessGate::decide`]; this module resolves the session,
//! acts on the decision, and hands the resolved identity to extractors.

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;
use tower_sessions::Session;

use helpdesk_core::{GateDecision, SessionState};

use crate::models::CurrentUser;
use crate::models::session::keys;
use crate::state::AppState;

/// Failure to determine whether a session exists.
#[derive(Debug, Error)]
pub enum SessionLookupError {
    /// The session backend returned an error.
    #[error("session store error: {0}")]
    Store(#[from] tower_sessions::session::Error),

    /// No session layer ran for this request.
    #[error("session layer missing")]
    MissingLayer,

    /// Provider-specific failure.
    #[error("session lookup failed: {0}")]
    Backend(String),
}

/// Answers "who is signed in" for a request's session.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Return the signed-in user, `None` if the session is anonymous.
    async fn get_session(
        &self,
        session: &Session,
    ) -> Result<Option<CurrentUser>, SessionLookupError>;
}

/// [`SessionProvider`] reading `CurrentUser` from tower-sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TowerSessionProvider;

#[async_trait]
impl SessionProvider for TowerSessionProvider {
    async fn get_session(
        &self,
        session: &Session,
    ) -> Result<Option<CurrentUser>, SessionLookupError> {
        Ok(session.get::<CurrentUser>(keys::CURRENT_USER).await?)
    }
}

/// Identity resolved by the gate, stored in request extensions on `Pass`.
#[derive(Debug, Clone, Default)]
pub struct Identity(pub Option<CurrentUser>);

/// Per-request access gate.
///
/// Lookup failures count as "no session": protected pages redirect to the
/// login page instead of erroring. Redirects are `303 See Other`.
pub async fn access_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    let session = request.extensions().get::<Session>().cloned();
    let lookup = match &session {
        Some(session) => state.sessions().get_session(session).await,
        None => Err(SessionLookupError::MissingLayer),
    };
    let current_user = lookup.unwrap_or_else(|e| {
        tracing::warn!(path = %path, error = %e, "Session lookup failed, treating as signed out");
        None
    });

    let decision = state
        .gate()
        .decide(&path, SessionState::from_present(current_user.is_some()));
    tracing::debug!(path = %path, ?decision, "Access gate decision");

    match decision {
        GateDecision::Pass => {
            request.extensions_mut().insert(Identity(current_user));
            next.run(request).await
        }
        GateDecision::RedirectToLogin => {
            Redirect::to(&state.gate().paths().login).into_response()
        }
        GateDecision::RedirectToDashboard => {
            Redirect::to(&state.gate().paths().dashboard).into_response()
        }
    }
}
