//! fleetdash: administrative dashboard for fleet vehicles, drivers and trips
//!
//! The library holds the REST client, the generic CRUD screen logic, the
//! entity definitions and the terminal UI; `main.rs` wires them to the CLI.

pub mod api;
pub mod config;
pub mod crud;
pub mod dashboard;
pub mod entities;
pub mod form;
pub mod listing;
pub mod models;
pub mod session;
