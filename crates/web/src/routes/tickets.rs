//! Public ticket submission.
//!
//! Failed submissions re-render the form with everything the customer typed;
//! only a successful submission clears it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use helpdesk_core::{DraftError, TicketDraft, TicketPriority};

use super::SelectOption;
use crate::error::add_breadcrumb;
use crate::filters;
use crate::state::AppState;

/// Seconds the confirmation page stays up before returning home.
pub const SUBMISSION_REDIRECT_SECONDS: u32 = 3;

/// Ticket categories offered on the form: (value, label).
pub const CATEGORIES: [(&str, &str); 4] = [
    ("suporte", "Suporte técnico"),
    ("comercial", "Comercial"),
    ("financeiro", "Financeiro"),
    ("outros", "Outros"),
];

/// Raw ticket form values, kept verbatim for re-rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TicketForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: String,
}

impl Default for TicketForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            customer_name: String::new(),
            customer_email: String::new(),
            customer_phone: String::new(),
            category: "suporte".to_owned(),
            priority: TicketPriority::default().as_str().to_owned(),
        }
    }
}

impl TicketForm {
    fn to_draft(&self) -> Result<TicketDraft, DraftError> {
        TicketDraft::from_raw(
            &self.title,
            &self.description,
            &self.customer_name,
            &self.customer_email,
            &self.customer_phone,
            &self.category,
            &self.priority,
        )
    }
}

/// Ticket form template.
#[derive(Template, WebTemplate)]
#[template(path = "tickets/new.html")]
pub struct NewTicketTemplate {
    pub form: TicketForm,
    pub error: Option<String>,
    pub priorities: Vec<SelectOption>,
    pub categories: Vec<SelectOption>,
}

impl NewTicketTemplate {
    fn new(form: TicketForm, error: Option<String>) -> Self {
        let priorities = TicketPriority::ALL
            .iter()
            .map(|p| SelectOption::new(p.as_str(), p.label(), &form.priority))
            .collect();
        let categories = CATEGORIES
            .iter()
            .map(|&(value, label)| SelectOption::new(value, label, &form.category))
            .collect();
        Self {
            form,
            error,
            priorities,
            categories,
        }
    }
}

/// Submission confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "tickets/created.html")]
pub struct TicketCreatedTemplate {
    pub ticket_id: i32,
    pub redirect_seconds: u32,
}

/// Display an empty ticket form.
#[instrument(skip_all)]
pub async fn new_ticket() -> impl IntoResponse {
    NewTicketTemplate::new(TicketForm::default(), None)
}

/// Handle ticket form submission.
#[instrument(skip_all)]
pub async fn create_ticket(State(state): State<AppState>, Form(form): Form<TicketForm>) -> Response {
    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(e) => {
            tracing::debug!(error = %e, "Ticket submission rejected");
            let message = draft_error_message(&e);
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                NewTicketTemplate::new(form, Some(message)),
            )
                .into_response();
        }
    };

    match state.tickets().create_ticket(&draft).await {
        Ok(ticket) => {
            tracing::info!(
                ticket_id = %ticket.id,
                priority = %ticket.priority,
                "Ticket created"
            );
            add_breadcrumb(
                "ticket",
                "Ticket created",
                Some(&[("priority", ticket.priority.as_str())]),
            );
            TicketCreatedTemplate {
                ticket_id: ticket.id.as_i32(),
                redirect_seconds: SUBMISSION_REDIRECT_SECONDS,
            }
            .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create ticket");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                NewTicketTemplate::new(
                    form,
                    Some(
                        "Não foi possível enviar o ticket agora. Tente novamente em instantes."
                            .to_owned(),
                    ),
                ),
            )
                .into_response()
        }
    }
}

/// User-facing text for a validation failure.
fn draft_error_message(error: &DraftError) -> String {
    match error {
        DraftError::MissingField(field) => {
            let label = match *field {
                "title" => "Título",
                "description" => "Descrição",
                "customer_name" => "Nome",
                other => other,
            };
            format!("O campo {label} é obrigatório.")
        }
        DraftError::InvalidEmail(_) => "Informe um e-mail válido.".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_form_preselects_normal_and_suporte() {
        let page = NewTicketTemplate::new(TicketForm::default(), None);
        let selected: Vec<_> = page
            .priorities
            .iter()
            .chain(&page.categories)
            .filter(|o| o.selected)
            .map(|o| o.value)
            .collect();
        assert_eq!(selected, ["normal", "suporte"]);
    }

    #[test]
    fn test_missing_field_message_names_the_field() {
        assert_eq!(
            draft_error_message(&DraftError::MissingField("customer_name")),
            "O campo Nome é obrigatório."
        );
    }
}
