//! HTTP API server for the Firewatch fire risk monitor.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **REST endpoints** for querying zones, the current snapshot, and
//!   per-level summaries
//! - **Prediction and evacuation endpoints** for one-off risk predictions
//!   and nearest-route lookups
//! - **Operator endpoints** to enable or disable scheduled refresh, run a
//!   manual refresh, and read scheduler status
//! - **`WebSocket` endpoint** (`/ws/escalations`) streaming escalation
//!   events via [`tokio::sync::broadcast`]
//!
//! # Architecture
//!
//! Handlers read the zone store's current snapshot, an immutable
//! [`ZoneSnapshot`] behind an [`Arc`](std::sync::Arc), so a request never
//! blocks a refresh cycle and always sees zones from a single cycle.
//!
//! [`ZoneSnapshot`]: firewatch_types::ZoneSnapshot

pub mod error;
pub mod handlers;
pub mod operator;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerError, spawn_server, start_server};
pub use state::AppState;
