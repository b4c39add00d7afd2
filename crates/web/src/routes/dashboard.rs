//! Admin dashboard: the ticket list and its JSON twin.
//!
//! Both handlers fetch the full list once and hand it to
//! [`TicketView::compute`]. A failed fetch on the HTML page degrades to an
//! empty list with a banner; it never turns into an error page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use helpdesk_core::{
    PriorityFilter, SortDirection, SortKey, Ticket, TicketPriority, TicketQuery, TicketStats,
    TicketView,
};

use super::SelectOption;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{OptionalUser, RequireAdmin};
use crate::state::AppState;

const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Dashboard query string (`?priority=&sort=&dir=`).
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub priority: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

impl DashboardQuery {
    /// Resolve the raw values, falling back to defaults for unknown input.
    #[must_use]
    pub fn ticket_query(&self) -> TicketQuery {
        TicketQuery::from_params(
            self.priority.as_deref(),
            self.sort.as_deref(),
            self.dir.as_deref(),
        )
    }
}

/// One table row, pre-formatted for the template.
#[derive(Debug, Clone)]
pub struct TicketRowView {
    pub id: i32,
    pub title: String,
    pub customer_name: String,
    pub customer_contact: String,
    pub category: String,
    pub priority: &'static str,
    pub priority_label: &'static str,
    pub status: &'static str,
    pub status_label: &'static str,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Ticket> for TicketRowView {
    fn from(ticket: &Ticket) -> Self {
        let customer_contact = ticket
            .customer_email
            .as_ref()
            .map(|e| e.as_str().to_owned())
            .or_else(|| ticket.customer_phone.clone())
            .unwrap_or_default();

        Self {
            id: ticket.id.as_i32(),
            title: ticket.title.clone(),
            customer_name: ticket.customer_name.clone(),
            customer_contact,
            category: ticket.category.clone().unwrap_or_default(),
            priority: ticket.priority.as_str(),
            priority_label: ticket.priority.label(),
            status: ticket.status.as_str(),
            status_label: ticket.status.label(),
            created_at: ticket.created_at.format(DATE_FORMAT).to_string(),
            updated_at: ticket.updated_at.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_name: String,
    pub rows: Vec<TicketRowView>,
    pub stats: TicketStats,
    pub load_error: bool,
    pub priority_options: Vec<SelectOption>,
    pub sort_options: Vec<SelectOption>,
    pub direction_options: Vec<SelectOption>,
}

impl DashboardTemplate {
    fn controls(query: &TicketQuery) -> (Vec<SelectOption>, Vec<SelectOption>, Vec<SelectOption>) {
        let current_priority = query.priority.as_param();
        let priority_options = std::iter::once(SelectOption::new(
            PriorityFilter::All.as_param(),
            "Todas",
            current_priority,
        ))
        .chain(
            TicketPriority::ALL
                .iter()
                .map(|p| SelectOption::new(p.as_str(), p.label(), current_priority)),
        )
        .collect();

        let sort_options = SortKey::ALL
            .iter()
            .map(|k| SelectOption::new(k.as_param(), k.label(), query.sort.as_param()))
            .collect();

        let direction_options = [
            (SortDirection::Desc, "Decrescente"),
            (SortDirection::Asc, "Crescente"),
        ]
        .iter()
        .map(|&(d, label)| SelectOption::new(d.as_param(), label, query.direction.as_param()))
        .collect();

        (priority_options, sort_options, direction_options)
    }
}

/// Page shown to signed-in users without the admin role.
#[derive(Template, WebTemplate)]
#[template(path = "unauthorized.html")]
pub struct UnauthorizedTemplate {
    pub email: Option<String>,
}

/// JSON body for `/api/tickets`.
#[derive(Debug, Serialize)]
pub struct TicketListResponse<'a> {
    pub tickets: Vec<&'a Ticket>,
    pub stats: TicketStats,
}

/// Display the admin dashboard.
#[instrument(skip_all)]
pub async fn dashboard(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> impl IntoResponse {
    let query = params.ticket_query();

    let (tickets, load_error) = match state.tickets().list_tickets().await {
        Ok(tickets) => (tickets, false),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load tickets for dashboard");
            (Vec::new(), true)
        }
    };

    let view = TicketView::compute(&tickets, &query);
    let (priority_options, sort_options, direction_options) = DashboardTemplate::controls(&query);

    DashboardTemplate {
        admin_name: admin.name,
        rows: view.tickets.iter().copied().map(TicketRowView::from).collect(),
        stats: view.stats,
        load_error,
        priority_options,
        sort_options,
        direction_options,
    }
}

/// Ticket list as JSON, same query parameters as the dashboard.
///
/// # Errors
///
/// Returns `AppError::Database` when the ticket store fails.
#[instrument(skip_all)]
pub async fn api_tickets(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> Result<impl IntoResponse> {
    let query = params.ticket_query();
    let tickets = state
        .tickets()
        .list_tickets()
        .await
        .map_err(AppError::Database)?;

    let view = TicketView::compute(&tickets, &query);
    let body = serde_json::to_value(TicketListResponse {
        tickets: view.tickets,
        stats: view.stats,
    })
    .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(body))
}

/// Display the "not allowed" page.
#[instrument(skip_all)]
pub async fn unauthorized(OptionalUser(user): OptionalUser) -> impl IntoResponse {
    UnauthorizedTemplate {
        email: user.map(|u| u.email.as_str().to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(options: &[SelectOption]) -> Vec<&'static str> {
        options.iter().filter(|o| o.selected).map(|o| o.value).collect()
    }

    #[test]
    fn test_controls_reflect_active_query() {
        let params = DashboardQuery {
            priority: Some("alta".into()),
            sort: Some("priority".into()),
            dir: Some("asc".into()),
        };
        let (priority, sort, dir) = DashboardTemplate::controls(&params.ticket_query());
        assert_eq!(selected(&priority), ["alta"]);
        assert_eq!(selected(&sort), ["priority"]);
        assert_eq!(selected(&dir), ["asc"]);
        assert_eq!(priority.len(), 5);
    }

    #[test]
    fn test_unknown_params_select_defaults() {
        let params = DashboardQuery {
            priority: Some("critica".into()),
            sort: Some("title".into()),
            dir: Some("sideways".into()),
        };
        let (priority, sort, dir) = DashboardTemplate::controls(&params.ticket_query());
        assert_eq!(selected(&priority), ["all"]);
        assert_eq!(selected(&sort), ["created_at"]);
        assert_eq!(selected(&dir), ["desc"]);
    }
}
