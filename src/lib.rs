//! The Undercut — live Formula 1 dashboard data engine.
//!
//! DESIGN
//! ======
//! - `gateway`: best-effort JSON fetching; every failure becomes a fallback
//!   value plus one warning.
//! - `openf1` / `jolpica`: typed clients for the live-session and historical
//!   APIs.
//! - `views`: pure derivation from raw records to display rows.
//! - `store` / `poller`: the in-memory snapshot and the task that fills it.
//! - `render`: terminal output for the CLI.

pub mod config;
pub mod gateway;
pub mod jolpica;
pub mod openf1;
pub mod poller;
pub mod rate_limit;
pub mod render;
pub mod store;
pub mod theme;
pub mod views;
