//! FireWatch API — library crate for the firewall log REST server.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `fw-e2e-tests`) can reach `AppState`, `ApiConfig` and
//! `build_router`.

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;
