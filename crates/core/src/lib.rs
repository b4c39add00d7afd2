//! Helpdesk Core - Shared domain types and policy.
//!
//! This crate provides the pieces of the helpdesk that do not touch the outside world:
//! - `web` - the HTTP server (public ticket form, admin dashboard)
//! - `cli` - operator tooling for migrations, users and demo data
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database access,
//! no HTTP. Request handling code feeds it already-fetched data and acts on its answers.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, ticket and user enumerations, ticket records
//! - [`access`] - Route classification and the per-request access decision
//! - [`ticket_view`] - Filtering, sorting and summary counts for the dashboard list

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod ticket_view;
pub mod types;

pub use access::{
    AccessGate, GateDecision, GatePaths, RouteClass, RoutePattern, RouteTable, SessionState,
};
pub use ticket_view::{
    PriorityFilter, SortDirection, SortKey, TicketQuery, TicketStats, TicketView,
};
pub use types::*;
