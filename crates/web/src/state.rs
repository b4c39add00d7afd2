//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use helpdesk_core::AccessGate;

use crate::config::HelpdeskConfig;
use crate::db::{PgTicketStore, PgUserStore, TicketStore, UserStore};
use crate::middleware::gate::{SessionProvider, TowerSessionProvider};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Stores and the session
/// provider sit behind trait objects so tests can swap in in-memory versions.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    gate: AccessGate,
    sessions: Arc<dyn SessionProvider>,
    users: Arc<dyn UserStore>,
    tickets: Arc<dyn TicketStore>,
}

impl AppState {
    /// Create application state from explicit parts.
    ///
    /// The access gate is built from `config.public_paths`.
    #[must_use]
    pub fn new(
        config: &HelpdeskConfig,
        sessions: Arc<dyn SessionProvider>,
        users: Arc<dyn UserStore>,
        tickets: Arc<dyn TicketStore>,
    ) -> Self {
        let gate = config.access_gate();
        Self {
            inner: Arc::new(AppStateInner {
                gate,
                sessions,
                users,
                tickets,
            }),
        }
    }

    /// Create application state backed by `PostgreSQL` and tower-sessions.
    #[must_use]
    pub fn with_postgres(config: &HelpdeskConfig, pool: &PgPool) -> Self {
        Self::new(
            config,
            Arc::new(TowerSessionProvider),
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgTicketStore::new(pool.clone())),
        )
    }

    /// Get the access gate policy.
    #[must_use]
    pub fn gate(&self) -> &AccessGate {
        &self.inner.gate
    }

    /// Get the session provider used by the access gate.
    #[must_use]
    pub fn sessions(&self) -> &dyn SessionProvider {
        self.inner.sessions.as_ref()
    }

    /// Get the user store.
    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    /// Get the ticket store.
    #[must_use]
    pub fn tickets(&self) -> &dyn TicketStore {
        self.inner.tickets.as_ref()
    }
}
