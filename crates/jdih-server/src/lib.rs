//! JDIH bot server: library crate for the admin API and chat transports.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `jdih-e2e-tests`) can access `AppState`, `build_router`, and the
//! Telegram client.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telegram;
