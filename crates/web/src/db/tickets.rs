//! Ticket repository backed by `PostgreSQL`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use helpdesk_core::{Email, Ticket, TicketDraft, TicketId, TicketPriority, TicketStatus};

use super::{RepositoryError, TicketStore};

/// Internal row type for `PostgreSQL` ticket queries.
#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    id: i32,
    title: String,
    description: String,
    status: TicketStatus,
    priority: TicketPriority,
    category: Option<String>,
    customer_name: String,
    customer_email: Option<String>,
    customer_phone: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = RepositoryError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let customer_email = row
            .customer_email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!(
                    "invalid customer email on ticket {}: {e}",
                    row.id
                ))
            })?;

        Ok(Self {
            id: TicketId::new(row.id),
            title: row.title,
            description: row.description,
            status: row.status,
            priority: row.priority,
            category: row.category,
            customer_name: row.customer_name,
            customer_email,
            customer_phone: row.customer_phone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const TICKET_COLUMNS: &str = "id, title, description, status, priority, category, \
     customer_name, customer_email, customer_phone, created_at, updated_at";

/// `PostgreSQL` implementation of [`TicketStore`].
#[derive(Debug, Clone)]
pub struct PgTicketStore {
    pool: PgPool,
}

impl PgTicketStore {
    /// Create a new ticket store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketStore for PgTicketStore {
    async fn list_tickets(&self) -> Result<Vec<Ticket>, RepositoryError> {
        let sql = format!("SELECT {TICKET_COLUMNS} FROM helpdesk.ticket ORDER BY created_at DESC");
        let rows = sqlx::query_as::<_, TicketRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn create_ticket(&self, draft: &TicketDraft) -> Result<Ticket, RepositoryError> {
        let sql = format!(
            "INSERT INTO helpdesk.ticket \
                 (title, description, status, priority, category, \
                  customer_name, customer_email, customer_phone) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {TICKET_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.initial_status())
            .bind(draft.priority)
            .bind(draft.category.as_deref())
            .bind(&draft.customer_name)
            .bind(draft.customer_email.as_ref().map(Email::as_str))
            .bind(draft.customer_phone.as_deref())
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
