//! In-memory stores for tests and local demos.
//!
//! Both stores can be switched into an "unavailable" mode in which every call
//! fails with [`RepositoryError::Unavailable`], standing in for a database
//! outage.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use helpdesk_core::{Email, Ticket, TicketDraft, TicketId, UserId};

use super::{RepositoryError, TicketStore, UserStore};
use crate::models::{NewUser, User};

#[derive(Debug, Default)]
struct Outage(AtomicBool);

impl Outage {
    fn set(&self, down: bool) {
        self.0.store(down, Ordering::SeqCst);
    }

    fn check(&self, store: &str) -> Result<(), RepositoryError> {
        if self.0.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(format!("{store} store is down")));
        }
        Ok(())
    }
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

/// [`UserStore`] holding accounts in a vector.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    inner: Arc<MemoryUserStoreInner>,
}

#[derive(Debug, Default)]
struct MemoryUserStoreInner {
    users: RwLock<Vec<StoredUser>>,
    next_id: AtomicI32,
    outage: Outage,
}

impl MemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, down: bool) {
        self.inner.outage.set(down);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .get_password_hash(email)
            .await?
            .map(|(user, _)| user))
    }

    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        self.inner.outage.check("user")?;
        let users = self.inner.users.read().await;
        Ok(users
            .iter()
            .find(|stored| &stored.user.email == email)
            .map(|stored| (stored.user.clone(), stored.password_hash.clone())))
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        self.inner.outage.check("user")?;
        let mut users = self.inner.users.write().await;
        if users.iter().any(|stored| stored.user.email == new_user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let now = Utc::now();
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let user = User {
            id: UserId::new(id),
            email: new_user.email.clone(),
            name: new_user.name.clone(),
            role: new_user.role,
            created_at: now,
            updated_at: now,
        };
        users.push(StoredUser {
            user: user.clone(),
            password_hash: new_user.password_hash.clone(),
        });
        Ok(user)
    }
}

// =============================================================================
// Tickets
// =============================================================================

/// [`TicketStore`] holding tickets in a vector.
#[derive(Debug, Clone, Default)]
pub struct MemoryTicketStore {
    inner: Arc<MemoryTicketStoreInner>,
}

#[derive(Debug, Default)]
struct MemoryTicketStoreInner {
    tickets: RwLock<Vec<Ticket>>,
    next_id: AtomicI32,
    outage: Outage,
}

impl MemoryTicketStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `tickets`.
    #[must_use]
    pub fn with_tickets(tickets: Vec<Ticket>) -> Self {
        let next_id = tickets.iter().map(|t| t.id.as_i32()).max().unwrap_or(0);
        Self {
            inner: Arc::new(MemoryTicketStoreInner {
                tickets: RwLock::new(tickets),
                next_id: AtomicI32::new(next_id),
                outage: Outage::default(),
            }),
        }
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, down: bool) {
        self.inner.outage.set(down);
    }

    /// Insert a draft with an explicit creation time.
    pub async fn insert_at(&self, draft: &TicketDraft, now: DateTime<Utc>) -> Ticket {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let ticket = draft.clone().into_ticket(TicketId::new(id), now);
        self.inner.tickets.write().await.push(ticket.clone());
        ticket
    }
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn list_tickets(&self) -> Result<Vec<Ticket>, RepositoryError> {
        self.inner.outage.check("ticket")?;
        let mut tickets = self.inner.tickets.read().await.clone();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tickets)
    }

    async fn create_ticket(&self, draft: &TicketDraft) -> Result<Ticket, RepositoryError> {
        self.inner.outage.check("ticket")?;
        Ok(self.insert_at(draft, Utc::now()).await)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.inner.outage.check("ticket")
    }
}
