//! Ticket records and the validated submission draft.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::email::{Email, EmailError};
use super::id::TicketId;
use super::status::{TicketPriority, TicketStatus};

/// A customer support ticket as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    /// Free-text category chosen on the form (e.g. `suporte`).
    pub category: Option<String>,
    pub customer_name: String,
    pub customer_email: Option<Email>,
    pub customer_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Errors produced while validating a ticket submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    /// A required field was blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The optional customer email was present but malformed.
    #[error("invalid customer email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// A validated ticket submission, ready to hand to a ticket store.
///
/// There is no status field: every new ticket is created as
/// [`TicketStatus::Aberto`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub customer_name: String,
    pub customer_email: Option<Email>,
    pub customer_phone: Option<String>,
    pub category: Option<String>,
    pub priority: TicketPriority,
}

impl TicketDraft {
    /// Build a draft from raw form values.
    ///
    /// Text fields are trimmed. Blank optional fields become `None`. A missing
    /// or unknown priority falls back to `normal`.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::MissingField`] for a blank title, description or
    /// customer name, and [`DraftError::InvalidEmail`] for a non-blank email
    /// that does not parse.
    pub fn from_raw(
        title: &str,
        description: &str,
        customer_name: &str,
        customer_email: &str,
        customer_phone: &str,
        category: &str,
        priority: &str,
    ) -> Result<Self, DraftError> {
        let title = required(title, "title")?;
        let description = required(description, "description")?;
        let customer_name = required(customer_name, "customer_name")?;
        let customer_email = Email::parse_optional(customer_email)?;

        Ok(Self {
            title,
            description,
            customer_name,
            customer_email,
            customer_phone: optional(customer_phone),
            category: optional(category),
            priority: priority.trim().parse().unwrap_or_default(),
        })
    }

    /// Status every ticket is created with.
    #[must_use]
    pub const fn initial_status(&self) -> TicketStatus {
        TicketStatus::Aberto
    }

    /// Materialize the draft as a stored ticket.
    ///
    /// Stores that assign IDs and timestamps themselves (like the in-memory
    /// store) use this so the "always `aberto`" rule lives in one place.
    #[must_use]
    pub fn into_ticket(self, id: TicketId, now: DateTime<Utc>) -> Ticket {
        Ticket {
            id,
            status: self.initial_status(),
            title: self.title,
            description: self.description,
            priority: self.priority,
            category: self.category,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            created_at: now,
            updated_at: now,
        }
    }
}

fn required(value: &str, field: &'static str) -> Result<String, DraftError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DraftError::MissingField(field));
    }
    Ok(value.to_owned())
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft(priority: &str) -> Result<TicketDraft, DraftError> {
        TicketDraft::from_raw(
            " Impressora travada ",
            "Não imprime desde ontem",
            "Ana",
            "",
            " ",
            "suporte",
            priority,
        )
    }

    #[test]
    fn test_from_raw_trims_and_drops_blank_optionals() {
        let draft = draft("alta").unwrap();
        assert_eq!(draft.title, "Impressora travada");
        assert_eq!(draft.customer_email, None);
        assert_eq!(draft.customer_phone, None);
        assert_eq!(draft.category.as_deref(), Some("suporte"));
        assert_eq!(draft.priority, TicketPriority::Alta);
    }

    #[test]
    fn test_priority_defaults_to_normal() {
        assert_eq!(draft("").unwrap().priority, TicketPriority::Normal);
        assert_eq!(draft("imediata").unwrap().priority, TicketPriority::Normal);
    }

    #[test]
    fn test_required_fields() {
        let err = TicketDraft::from_raw("", "d", "n", "", "", "", "").unwrap_err();
        assert_eq!(err, DraftError::MissingField("title"));
        let err = TicketDraft::from_raw("t", "  ", "n", "", "", "", "").unwrap_err();
        assert_eq!(err, DraftError::MissingField("description"));
        let err = TicketDraft::from_raw("t", "d", "", "", "", "", "").unwrap_err();
        assert_eq!(err, DraftError::MissingField("customer_name"));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let err = TicketDraft::from_raw("t", "d", "n", "nope", "", "", "").unwrap_err();
        assert!(matches!(err, DraftError::InvalidEmail(_)));
    }

    #[test]
    fn test_into_ticket_forces_open_status() {
        let now = Utc::now();
        let ticket = draft("urgente").unwrap().into_ticket(TicketId::new(1), now);
        assert_eq!(ticket.status, TicketStatus::Aberto);
        assert_eq!(ticket.created_at, now);
        assert_eq!(ticket.updated_at, now);
    }
}
