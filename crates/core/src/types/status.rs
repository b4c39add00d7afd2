//! Closed enumerations for tickets and users.
//!
//! The string forms (`aberto`, `urgente`, ...) are the wire and storage values
//! shared by the submission form, the dashboard query string and the database.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a ticket.
///
/// New tickets always start as [`TicketStatus::Aberto`]; later transitions
/// happen outside this application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "helpdesk.ticket_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Open, waiting for an agent.
    #[default]
    Aberto,
    /// Being worked on.
    EmAndamento,
    /// Resolved and closed.
    Fechado,
}

impl TicketStatus {
    /// All statuses in declaration order.
    pub const ALL: [Self; 3] = [Self::Aberto, Self::EmAndamento, Self::Fechado];

    /// The wire/storage value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aberto => "aberto",
            Self::EmAndamento => "em_andamento",
            Self::Fechado => "fechado",
        }
    }

    /// Human-readable label for the dashboard.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Aberto => "Aberto",
            Self::EmAndamento => "Em andamento",
            Self::Fechado => "Fechado",
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid ticket status: {s}"))
    }
}

/// Urgency of a ticket.
///
/// Ordering follows [`TicketPriority::weight`]: `baixa < normal < alta < urgente`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "helpdesk.ticket_priority", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Baixa,
    #[default]
    Normal,
    Alta,
    Urgente,
}

impl TicketPriority {
    /// All priorities from lowest to highest.
    pub const ALL: [Self; 4] = [Self::Baixa, Self::Normal, Self::Alta, Self::Urgente];

    /// Numeric weight used when sorting by priority (1 = lowest).
    #[must_use]
    pub const fn weight(self) -> u8 {
        match self {
            Self::Baixa => 1,
            Self::Normal => 2,
            Self::Alta => 3,
            Self::Urgente => 4,
        }
    }

    /// The wire/storage value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Baixa => "baixa",
            Self::Normal => "normal",
            Self::Alta => "alta",
            Self::Urgente => "urgente",
        }
    }

    /// Human-readable label for forms and the dashboard.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Baixa => "Baixa",
            Self::Normal => "Normal",
            Self::Alta => "Alta",
            Self::Urgente => "Urgente",
        }
    }
}

impl PartialOrd for TicketPriority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TicketPriority {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.weight().cmp(&other.weight())
    }
}

impl std::fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TicketPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| format!("invalid ticket priority: {s}"))
    }
}

/// Role attached to a user profile.
///
/// Only `admin` grants dashboard access. Profiles are shared with other
/// tools, so any other stored role collapses into [`UserRole::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Other,
}

impl UserRole {
    /// Map a stored role string to a role. Never fails.
    #[must_use]
    pub fn from_stored(role: &str) -> Self {
        if role.trim().eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::Other
        }
    }

    /// Whether this role may open the dashboard.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Other => write!(f, "other"),
        }
    }
}
