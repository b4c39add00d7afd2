//! Core types for the helpdesk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod status;
pub mod ticket;

pub use email::{Email, EmailError};
pub use id::*;
pub use status::*;
pub use ticket::{DraftError, Ticket, TicketDraft};
