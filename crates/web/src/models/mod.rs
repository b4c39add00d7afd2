//! Domain models for the helpdesk web server.
//!
//! Ticket types live in `helpdesk_core`; this module holds the web-only
//! pieces: user accounts and what the session carries.

pub mod session;
pub mod user;

pub use session::CurrentUser;
pub use user::{NewUser, User};
