//! Router-level tests: the full middleware stack with in-memory stores.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use chrono::{Duration, TimeZone, Utc};
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session};

use helpdesk_core::{
    Email, GatePaths, Ticket, TicketDraft, TicketId, TicketStatus, UserId, UserRole,
};

use crate::config::tests::test_config;
use crate::db::{MemoryTicketStore, MemoryUserStore, TicketStore, UserStore};
use crate::middleware::{SessionLookupError, SessionProvider, TowerSessionProvider};
use crate::models::{CurrentUser, NewUser};
use crate::services::auth::{AuthService, hash_password};
use crate::state::AppState;

const ADMIN_EMAIL: &str = "admin@example.com";
const AGENT_EMAIL: &str = "agente@example.com";

// =============================================================================
// Fakes
// =============================================================================

/// Session provider that reports a fixed identity for every request.
struct FixedSession(Option<CurrentUser>);

#[async_trait]
impl SessionProvider for FixedSession {
    async fn get_session(
        &self,
        _session: &Session,
    ) -> Result<Option<CurrentUser>, SessionLookupError> {
        Ok(self.0.clone())
    }
}

/// Session provider whose backend is down.
struct BrokenSession;

#[async_trait]
impl SessionProvider for BrokenSession {
    async fn get_session(
        &self,
        _session: &Session,
    ) -> Result<Option<CurrentUser>, SessionLookupError> {
        Err(SessionLookupError::Backend("connection refused".to_owned()))
    }
}

// =============================================================================
// Harness
// =============================================================================

struct Harness {
    app: Router,
    users: MemoryUserStore,
    tickets: MemoryTicketStore,
}

impl Harness {
    async fn new(sessions: Arc<dyn SessionProvider>) -> Self {
        let users = MemoryUserStore::new();
        for (email, name, role) in [
            (ADMIN_EMAIL, "Ana Admin", UserRole::Admin),
            (AGENT_EMAIL, "Beto Agente", UserRole::Other),
        ] {
            users
                .create_user(&NewUser {
                    email: Email::parse(email).unwrap(),
                    name: name.to_owned(),
                    role,
                    password_hash: "unused".to_owned(),
                })
                .await
                .unwrap();
        }

        let tickets = MemoryTicketStore::with_tickets(sample_tickets());
        let config = test_config();
        let session_layer = crate::middleware::create_session_layer(MemoryStore::default(), &config);
        let state = AppState::new(
            &config,
            sessions,
            Arc::new(users.clone()),
            Arc::new(tickets.clone()),
        );

        Self {
            app: crate::app(state, session_layer),
            users,
            tickets,
        }
    }

    async fn anonymous() -> Self {
        Self::new(Arc::new(FixedSession(None))).await
    }

    async fn signed_in_as(email: &str) -> Self {
        let user = CurrentUser {
            id: UserId::new(99),
            email: Email::parse(email).unwrap(),
        };
        Self::new(Arc::new(FixedSession(Some(user)))).await
    }

    async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> Response<Body> {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(encode_form(fields)))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }
}

fn encode_form(fields: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

fn assert_redirect(response: &Response<Body>, to: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response), to);
}

/// Ten tickets: three urgente, two alta, three normal, two baixa.
fn sample_tickets() -> Vec<Ticket> {
    let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    let priorities = [
        "urgente", "alta", "normal", "baixa", "urgente", "normal", "alta", "normal", "baixa",
        "urgente",
    ];
    priorities
        .iter()
        .zip(1..)
        .map(|(priority, n)| {
            let draft = TicketDraft::from_raw(
                &format!("Chamado {n}"),
                "Descrição do problema",
                "Cliente",
                "",
                "",
                "suporte",
                priority,
            )
            .unwrap();
            let mut ticket = draft.into_ticket(TicketId::new(n), base + Duration::hours(n.into()));
            if n % 3 == 0 {
                ticket.status = TicketStatus::Fechado;
            }
            ticket
        })
        .collect()
}

// =============================================================================
// Access gate
// =============================================================================

#[tokio::test]
async fn test_public_pages_pass_without_session() {
    let h = Harness::anonymous().await;

    let response = h.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("/login"));

    assert_eq!(h.get("/novo-ticket").await.status(), StatusCode::OK);
    assert_eq!(h.get("/health").await.status(), StatusCode::OK);
    assert_eq!(h.get("/static/app.css").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_protected_pages_redirect_to_login_without_session() {
    let h = Harness::anonymous().await;
    for uri in ["/dashboard", "/unauthorized", "/api/tickets", "/not-a-page"] {
        assert_redirect(&h.get(uri).await, "/login");
    }
    assert_redirect(&h.post_form("/logout", &[]).await, "/login");
}

#[tokio::test]
async fn test_login_page_does_not_redirect_to_itself() {
    let h = Harness::anonymous().await;
    let response = h.get("/login").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(r#"name="password""#));
}

#[tokio::test]
async fn test_signed_in_user_on_login_goes_to_dashboard() {
    let h = Harness::signed_in_as(ADMIN_EMAIL).await;
    assert_redirect(&h.get("/login").await, "/dashboard");
}

#[tokio::test]
async fn test_session_lookup_failure_fails_closed() {
    let h = Harness::new(Arc::new(BrokenSession)).await;

    assert_redirect(&h.get("/dashboard").await, "/login");
    assert_eq!(h.get("/").await.status(), StatusCode::OK);
    assert_eq!(h.get("/login").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_home_links_to_dashboard_when_signed_in() {
    let h = Harness::signed_in_as(ADMIN_EMAIL).await;
    let body = body_text(h.get("/").await).await;
    assert!(body.contains(r#"href="/dashboard""#));
}

// =============================================================================
// Admin guard
// =============================================================================

#[tokio::test]
async fn test_non_admin_is_sent_to_unauthorized() {
    let h = Harness::signed_in_as(AGENT_EMAIL).await;

    assert_redirect(&h.get("/dashboard").await, "/unauthorized");
    assert_eq!(h.get("/api/tickets").await.status(), StatusCode::FORBIDDEN);

    let response = h.get("/unauthorized").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(AGENT_EMAIL));
}

#[tokio::test]
async fn test_missing_profile_is_unauthorized() {
    let h = Harness::signed_in_as("ghost@example.com").await;
    assert_redirect(&h.get("/dashboard").await, "/unauthorized");
}

#[tokio::test]
async fn test_profile_lookup_failure_is_unauthorized() {
    let h = Harness::signed_in_as(ADMIN_EMAIL).await;
    h.users.set_unavailable(true);
    assert_redirect(&h.get("/dashboard").await, "/unauthorized");
}

// =============================================================================
// Dashboard
// =============================================================================

#[tokio::test]
async fn test_admin_sees_all_tickets_and_counts() {
    let h = Harness::signed_in_as(ADMIN_EMAIL).await;
    let response = h.get("/dashboard").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains(r#"id="stat-total">10<"#));
    assert!(body.contains(r#"id="stat-filtered">10<"#));
    assert!(body.contains(r#"id="stat-urgent">3<"#));
    assert!(body.contains(r#"id="stat-open">7<"#));
    assert_eq!(body.matches("data-ticket-id=").count(), 10);
}

#[tokio::test]
async fn test_dashboard_filter_keeps_global_counts() {
    let h = Harness::signed_in_as(ADMIN_EMAIL).await;
    let body = body_text(h.get("/dashboard?priority=alta").await).await;

    assert!(body.contains(r#"id="stat-total">10<"#));
    assert!(body.contains(r#"id="stat-filtered">2<"#));
    assert!(body.contains(r#"id="stat-urgent">3<"#));
    assert_eq!(body.matches("data-ticket-id=").count(), 2);
    assert!(body.contains(r#"<option value="alta" selected>"#));
}

#[tokio::test]
async fn test_dashboard_survives_ticket_store_failure() {
    let h = Harness::signed_in_as(ADMIN_EMAIL).await;
    h.tickets.set_unavailable(true);

    let response = h.get("/dashboard").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Não foi possível carregar os tickets"));
    assert!(body.contains(r#"id="stat-total">0<"#));
    assert_eq!(body.matches("data-ticket-id=").count(), 0);
}

#[tokio::test]
async fn test_api_sorts_by_priority_weight() {
    let h = Harness::signed_in_as(ADMIN_EMAIL).await;
    let response = h.get("/api/tickets?sort=priority&dir=desc").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    let priorities: Vec<&str> = json["tickets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["priority"].as_str().unwrap())
        .collect();
    assert_eq!(
        priorities,
        [
            "urgente", "urgente", "urgente", "alta", "alta", "normal", "normal", "normal",
            "baixa", "baixa"
        ]
    );
    assert_eq!(json["stats"]["total"], 10);
    assert_eq!(json["stats"]["urgent"], 3);
}

#[tokio::test]
async fn test_api_unknown_params_fall_back_to_newest_first() {
    let h = Harness::signed_in_as(ADMIN_EMAIL).await;
    let response = h.get("/api/tickets?priority=critica&sort=title&dir=up").await;
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();

    let ids: Vec<i64> = json["tickets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, [10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);
    assert_eq!(json["stats"]["filtered"], 10);
}

#[tokio::test]
async fn test_api_store_failure_is_opaque_server_error() {
    let h = Harness::signed_in_as(ADMIN_EMAIL).await;
    h.tickets.set_unavailable(true);

    let response = h.get("/api/tickets").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Internal server error");
}

#[tokio::test]
async fn test_anonymous_api_request_is_sent_to_login() {
    let h = Harness::anonymous().await;
    assert_redirect(&h.get("/api/tickets?sort=priority").await, "/login");
}

#[tokio::test]
async fn test_non_admin_redirect_matches_mounted_page() {
    let h = Harness::signed_in_as(AGENT_EMAIL).await;
    let target = GatePaths::default().unauthorized;

    assert_redirect(&h.get("/dashboard").await, &target);
    assert_eq!(h.get(&target).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_pages_mount_at_configured_paths() {
    let paths = GatePaths {
        login: "/entrar".to_owned(),
        dashboard: "/painel".to_owned(),
        unauthorized: "/sem-acesso".to_owned(),
    };
    let state = AppState::new(
        &test_config(),
        Arc::new(FixedSession(None)),
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemoryTicketStore::new()),
    );
    let router = crate::routes::routes(&paths).with_state(state);

    let response = router
        .clone()
        .oneshot(Request::get("/entrar").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(Request::get("/login").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Ticket submission
// =============================================================================

const VALID_TICKET: [(&str, &str); 7] = [
    ("title", "Não consigo acessar"),
    ("description", "Erro 500 ao abrir o sistema"),
    ("customer_name", "Carla"),
    ("customer_email", "carla@example.com"),
    ("customer_phone", ""),
    ("category", "suporte"),
    ("priority", "urgente"),
];

#[tokio::test]
async fn test_submission_creates_open_ticket_and_schedules_redirect() {
    let h = Harness::anonymous().await;
    let response = h.post_form("/novo-ticket", &VALID_TICKET).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains(r#"<meta http-equiv="refresh" content="3;url=/">"#));

    let stored = h.tickets.list_tickets().await.unwrap();
    assert_eq!(stored.len(), 11);
    let newest = stored.iter().find(|t| t.title == "Não consigo acessar").unwrap();
    assert_eq!(newest.status, TicketStatus::Aberto);
    assert_eq!(newest.customer_email.as_ref().unwrap().as_str(), "carla@example.com");
}

#[tokio::test]
async fn test_submission_status_field_is_ignored() {
    let h = Harness::anonymous().await;
    let mut fields = VALID_TICKET.to_vec();
    fields.push(("status", "fechado"));

    h.post_form("/novo-ticket", &fields).await;
    let stored = h.tickets.list_tickets().await.unwrap();
    assert!(
        stored
            .iter()
            .filter(|t| t.title == "Não consigo acessar")
            .all(|t| t.status == TicketStatus::Aberto)
    );
}

#[tokio::test]
async fn test_invalid_submission_keeps_form_values() {
    let h = Harness::anonymous().await;
    let mut fields = VALID_TICKET.to_vec();
    fields[0] = ("title", "   ");

    let response = h.post_form("/novo-ticket", &fields).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_text(response).await;
    assert!(body.contains("O campo Título é obrigatório."));
    assert!(body.contains("Erro 500 ao abrir o sistema"));
    assert!(body.contains(r#"value="carla@example.com""#));
    assert!(body.contains(r#"<option value="urgente" selected>"#));
    assert_eq!(h.tickets.list_tickets().await.unwrap().len(), 10);
}

#[tokio::test]
async fn test_store_failure_on_submit_is_retryable() {
    let h = Harness::anonymous().await;
    h.tickets.set_unavailable(true);

    let response = h.post_form("/novo-ticket", &VALID_TICKET).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_text(response).await;
    assert!(body.contains("Tente novamente"));
    assert!(body.contains("Erro 500 ao abrir o sistema"));
}

// =============================================================================
// Health, headers
// =============================================================================

#[tokio::test]
async fn test_readiness_follows_ticket_store() {
    let h = Harness::anonymous().await;
    assert_eq!(h.get("/health/ready").await.status(), StatusCode::OK);

    h.tickets.set_unavailable(true);
    assert_eq!(
        h.get("/health/ready").await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_responses_carry_security_headers_and_request_id() {
    let h = Harness::anonymous().await;
    let response = h
        .send(
            Request::get("/")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    let headers = response.headers();
    assert_eq!(headers["x-request-id"], "req-42");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
    assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));

    // Redirects pass through the same stack
    let redirect = h.get("/dashboard").await;
    assert!(redirect.headers().contains_key("x-request-id"));
}

// =============================================================================
// Real sessions
// =============================================================================

async fn real_session_harness() -> Harness {
    let h = Harness::new(Arc::new(TowerSessionProvider)).await;
    AuthService::new(&h.users)
        .register_with_password("chefe@example.com", "Chefe", UserRole::Admin, "s3nha-forte")
        .await
        .unwrap();
    h
}

fn session_cookie(response: &Response<Body>) -> String {
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_owned()
}

#[tokio::test]
async fn test_login_session_and_logout_round() {
    let h = real_session_harness().await;

    let response = h
        .post_form(
            "/login",
            &[("email", "chefe@example.com"), ("password", "s3nha-forte")],
        )
        .await;
    assert_redirect(&response, "/dashboard");
    let cookie = session_cookie(&response);

    let with_cookie = |method: &str, uri: &str| {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap()
    };

    assert_eq!(h.send(with_cookie("GET", "/dashboard")).await.status(), StatusCode::OK);
    assert_redirect(&h.send(with_cookie("GET", "/login")).await, "/dashboard");

    assert_redirect(&h.send(with_cookie("POST", "/logout")).await, "/login");
    assert_redirect(&h.send(with_cookie("GET", "/dashboard")).await, "/login");
}

#[tokio::test]
async fn test_wrong_password_redirects_with_error() {
    let h = real_session_harness().await;
    let response = h
        .post_form(
            "/login",
            &[("email", "chefe@example.com"), ("password", "errada-123")],
        )
        .await;
    assert_redirect(&response, "/login?error=credentials");

    let page = body_text(h.get("/login?error=credentials").await).await;
    assert!(page.contains("E-mail ou senha inválidos."));
}

#[test]
fn test_password_hash_fixture_is_argon2() {
    assert!(hash_password("s3nha-forte").unwrap().starts_with("$argon2id$"));
}
