//! HTTP middleware stack for the helpdesk.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transactions)
//! 2. `TraceLayer` (request spans)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame and referrer policy)
//! 5. Session layer (tower-sessions with `PostgreSQL` store)
//! 6. Access gate (route classification, login/dashboard redirects)

pub mod auth;
pub mod gate;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{AdminRejection, OptionalUser, RequireAdmin, clear_current_user, set_current_user};
pub use gate::{Identity, SessionLookupError, SessionProvider, TowerSessionProvider, access_gate};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, postgres_session_store};
