//! REST API exposing network state after a scenario run.
//!
//! Provides three GET endpoints:
//! - `/networks`: the network report
//! - `/networks/{id}`: members of one network
//! - `/cells/{x}/{y}`: whether the conductor on a cell is powered, and by whom

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::report::{MembershipRow, NetworkReport};

pub use types::{CellResponse, ErrorResponse, NetworkMembersResponse};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the scenario run completes and wrapped in
/// `Arc`; all data is read-only.
pub struct AppState {
    /// Aggregate network report.
    pub report: NetworkReport,
    /// Per-conductor membership rows.
    pub members: Vec<MembershipRow>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/networks", get(handlers::get_networks))
        .route("/networks/{id}", get(handlers::get_network))
        .route("/cells/{x}/{y}", get(handlers::get_cell))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
