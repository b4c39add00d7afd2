//! Business logic services for the helpdesk.
//!
//! # Services
//!
//! - `auth` - Staff password authentication and argon2 hashing

pub mod auth;
