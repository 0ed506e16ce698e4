//! Travel Booker: hotel browsing, search and booking site
//!
//! The binary in `main.rs` wires configuration, storage and the router; the
//! library exposes the pieces so they can be tested in isolation.

pub mod config;
pub mod error;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod session;
pub mod state;
pub mod uploads;
pub mod validation;
