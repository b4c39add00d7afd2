//! Filtered and sorted views over a ticket list.
//!
//! The dashboard fetches the full ticket list once and derives what it shows
//! from three inputs: a priority filter, a sort key and a sort direction.
//! [`TicketView::compute`] borrows from the source slice and never reorders or
//! mutates it, so recomputing on every input change is cheap and repeatable.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::{Ticket, TicketPriority, TicketStatus};

/// Which tickets to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PriorityFilter {
    /// Keep everything.
    #[default]
    All,
    /// Keep tickets with exactly this priority.
    Only(TicketPriority),
}

impl PriorityFilter {
    /// Parse a query-string value. Unknown values mean "no filter".
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        value
            .trim()
            .parse::<TicketPriority>()
            .map_or(Self::All, Self::Only)
    }

    /// The query-string value (`all` or a priority).
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(priority) => priority.as_str(),
        }
    }

    fn keeps(self, ticket: &Ticket) -> bool {
        match self {
            Self::All => true,
            Self::Only(priority) => ticket.priority == priority,
        }
    }
}

/// Field the view is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    Priority,
    Status,
}

impl SortKey {
    /// Every sort key, in the order the dashboard lists them.
    pub const ALL: [Self; 4] = [Self::CreatedAt, Self::UpdatedAt, Self::Priority, Self::Status];

    /// Parse a query-string value. Unknown values fall back to `created_at`.
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        match value.trim() {
            "updated_at" => Self::UpdatedAt,
            "priority" => Self::Priority,
            "status" => Self::Status,
            _ => Self::CreatedAt,
        }
    }

    /// The query-string value.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Priority => "priority",
            Self::Status => "status",
        }
    }

    /// Label for the sort selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreatedAt => "Data de criação",
            Self::UpdatedAt => "Última atualização",
            Self::Priority => "Prioridade",
            Self::Status => "Status",
        }
    }

    /// Ascending comparison of two tickets on this key.
    fn compare(self, a: &Ticket, b: &Ticket) -> Ordering {
        match self {
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            Self::Priority => a.priority.weight().cmp(&b.priority.weight()),
            // No domain ordering for statuses: compare the stored string.
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }
}

/// Sort polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse a query-string value. Unknown values fall back to `desc`.
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    /// The query-string value.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// The three dashboard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TicketQuery {
    pub priority: PriorityFilter,
    pub sort: SortKey,
    pub direction: SortDirection,
}

impl TicketQuery {
    /// Build a query from optional raw query-string values.
    #[must_use]
    pub fn from_params(priority: Option<&str>, sort: Option<&str>, direction: Option<&str>) -> Self {
        Self {
            priority: priority.map(PriorityFilter::from_param).unwrap_or_default(),
            sort: sort.map(SortKey::from_param).unwrap_or_default(),
            direction: direction.map(SortDirection::from_param).unwrap_or_default(),
        }
    }
}

/// Summary counts shown above the ticket table.
///
/// Everything except `filtered` is counted over the unfiltered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct TicketStats {
    /// Tickets in the source list.
    pub total: usize,
    /// Tickets left after filtering.
    pub filtered: usize,
    /// Tickets with priority `urgente`.
    pub urgent: usize,
    /// Tickets with status `aberto`.
    pub open: usize,
}

/// A filtered, sorted view borrowing from a ticket list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketView<'a> {
    pub tickets: Vec<&'a Ticket>,
    pub stats: TicketStats,
}

impl<'a> TicketView<'a> {
    /// Derive the view for `query` over `source`.
    ///
    /// Ties on the sort key keep no particular order.
    #[must_use]
    pub fn compute(source: &'a [Ticket], query: &TicketQuery) -> Self {
        let mut tickets: Vec<&Ticket> = source
            .iter()
            .filter(|ticket| query.priority.keeps(ticket))
            .collect();

        tickets.sort_unstable_by(|a, b| query.direction.apply(query.sort.compare(a, b)));

        let stats = TicketStats {
            total: source.len(),
            filtered: tickets.len(),
            urgent: source
                .iter()
                .filter(|t| t.priority == TicketPriority::Urgente)
                .count(),
            open: source
                .iter()
                .filter(|t| t.status == TicketStatus::Aberto)
                .count(),
        };

        Self { tickets, stats }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;
    use crate::types::TicketId;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .unwrap_or_default()
    }

    fn ticket(id: i32, priority: TicketPriority, status: TicketStatus, minutes: i64) -> Ticket {
        let created_at = base_time() + Duration::minutes(minutes);
        Ticket {
            id: TicketId::new(id),
            title: format!("Chamado {id}"),
            description: "descrição".to_string(),
            status,
            priority,
            category: Some("suporte".to_string()),
            customer_name: "Cliente".to_string(),
            customer_email: None,
            customer_phone: None,
            created_at,
            updated_at: base_time() + Duration::minutes(1_000 - minutes),
        }
    }

    fn ids(view: &TicketView<'_>) -> Vec<i32> {
        view.tickets.iter().map(|t| t.id.as_i32()).collect()
    }

    /// 10 tickets: 3 urgente, 2 alta, 3 normal, 2 baixa; 4 aberto.
    fn ten_tickets() -> Vec<Ticket> {
        use TicketPriority::{Alta, Baixa, Normal, Urgente};
        use TicketStatus::{Aberto, EmAndamento, Fechado};
        vec![
            ticket(1, Urgente, Aberto, 1),
            ticket(2, Urgente, EmAndamento, 2),
            ticket(3, Urgente, Fechado, 3),
            ticket(4, Alta, Aberto, 4),
            ticket(5, Alta, Fechado, 5),
            ticket(6, Normal, Aberto, 6),
            ticket(7, Normal, EmAndamento, 7),
            ticket(8, Normal, Fechado, 8),
            ticket(9, Baixa, Aberto, 9),
            ticket(10, Baixa, Fechado, 10),
        ]
    }

    #[test]
    fn test_all_filter_keeps_every_ticket() {
        let source = ten_tickets();
        let view = TicketView::compute(&source, &TicketQuery::default());
        let mut got = ids(&view);
        got.sort_unstable();
        assert_eq!(got, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_priority_filter_keeps_exact_matches() {
        let source = ten_tickets();
        let query = TicketQuery {
            priority: PriorityFilter::Only(TicketPriority::Urgente),
            ..TicketQuery::default()
        };
        let view = TicketView::compute(&source, &query);
        assert_eq!(view.tickets.len(), 3);
        assert!(view.tickets.iter().all(|t| t.priority == TicketPriority::Urgente));
    }

    #[test]
    fn test_stats_ignore_the_filter() {
        let source = ten_tickets();
        let query = TicketQuery {
            priority: PriorityFilter::Only(TicketPriority::Alta),
            ..TicketQuery::default()
        };
        let stats = TicketView::compute(&source, &query).stats;
        assert_eq!(
            stats,
            TicketStats {
                total: 10,
                filtered: 2,
                urgent: 3,
                open: 4,
            }
        );
    }

    #[test]
    fn test_priority_desc_orders_by_weight() {
        let source = vec![
            ticket(1, TicketPriority::Baixa, TicketStatus::Aberto, 1),
            ticket(2, TicketPriority::Urgente, TicketStatus::Aberto, 2),
            ticket(3, TicketPriority::Normal, TicketStatus::Aberto, 3),
        ];
        let query = TicketQuery {
            sort: SortKey::Priority,
            direction: SortDirection::Desc,
            ..TicketQuery::default()
        };
        let view = TicketView::compute(&source, &query);
        let priorities: Vec<_> = view.tickets.iter().map(|t| t.priority).collect();
        assert_eq!(
            priorities,
            vec![
                TicketPriority::Urgente,
                TicketPriority::Normal,
                TicketPriority::Baixa
            ]
        );
    }

    #[test]
    fn test_created_at_asc_is_reverse_of_desc() {
        let source = ten_tickets();
        let mut asc = TicketQuery {
            sort: SortKey::CreatedAt,
            direction: SortDirection::Asc,
            ..TicketQuery::default()
        };
        let asc_ids = ids(&TicketView::compute(&source, &asc));
        asc.direction = SortDirection::Desc;
        let mut desc_ids = ids(&TicketView::compute(&source, &asc));
        desc_ids.reverse();
        assert_eq!(asc_ids, desc_ids);
        assert_eq!(asc_ids, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_updated_at_sorts_chronologically() {
        let source = ten_tickets();
        let query = TicketQuery {
            sort: SortKey::UpdatedAt,
            direction: SortDirection::Asc,
            ..TicketQuery::default()
        };
        // updated_at runs backwards relative to created_at in the fixture.
        assert_eq!(
            ids(&TicketView::compute(&source, &query)),
            (1..=10).rev().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_status_sorts_by_string_value() {
        let source = ten_tickets();
        let query = TicketQuery {
            sort: SortKey::Status,
            direction: SortDirection::Asc,
            ..TicketQuery::default()
        };
        let view = TicketView::compute(&source, &query);
        let statuses: Vec<&str> = view.tickets.iter().map(|t| t.status.as_str()).collect();
        let mut expected = statuses.clone();
        expected.sort_unstable();
        assert_eq!(statuses, expected);
        assert_eq!(statuses.first().copied(), Some("aberto"));
        assert_eq!(statuses.last().copied(), Some("fechado"));
    }

    #[test]
    fn test_source_is_not_mutated() {
        let source = ten_tickets();
        let before = source.clone();
        let query = TicketQuery {
            priority: PriorityFilter::Only(TicketPriority::Normal),
            sort: SortKey::Priority,
            direction: SortDirection::Asc,
        };
        let _ = TicketView::compute(&source, &query);
        assert_eq!(source, before);
    }

    #[test]
    fn test_unknown_params_fall_back_to_defaults() {
        let query = TicketQuery::from_params(Some("critica"), Some("title"), Some("sideways"));
        assert_eq!(query, TicketQuery::default());
        assert_eq!(PriorityFilter::from_param("all"), PriorityFilter::All);
        assert_eq!(
            PriorityFilter::from_param("alta"),
            PriorityFilter::Only(TicketPriority::Alta)
        );
        assert_eq!(SortKey::from_param("status"), SortKey::Status);
        assert_eq!(SortDirection::from_param("ASC"), SortDirection::Asc);
    }

    #[test]
    fn test_empty_source() {
        let view = TicketView::compute(&[], &TicketQuery::default());
        assert!(view.tickets.is_empty());
        assert_eq!(view.stats, TicketStats::default());
    }
}
