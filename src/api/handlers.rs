//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{CellResponse, ErrorResponse, NetworkMembersResponse};
use crate::power::ConductorKind;
use crate::report::MembershipRow;

fn not_found(error: String) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse { error }))
}

/// `GET /networks` → 200 + `NetworkReport` JSON
pub async fn get_networks(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.report.clone())
}

/// `GET /networks/{id}` → 200 + members, or 404 for an unknown id
pub async fn get_network(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Some(network) = state.report.networks.iter().find(|n| n.id == id) else {
        return Err(not_found(format!("no network `{id}`")));
    };
    let members: Vec<MembershipRow> = state
        .members
        .iter()
        .filter(|m| m.network.as_deref() == Some(id.as_str()))
        .cloned()
        .collect();

    Ok(Json(NetworkMembersResponse {
        network: network.clone(),
        members,
    }))
}

/// `GET /cells/{x}/{y}` → 200 + `CellResponse`, or 404 for an empty cell
///
/// When a wire and nodes share the cell, the wire is reported.
pub async fn get_cell(
    State(state): State<Arc<AppState>>,
    Path((x, y)): Path<(i32, i32)>,
) -> impl IntoResponse {
    let mut here = state.members.iter().filter(|m| m.x == x && m.y == y);
    let first = here.clone().find(|m| m.kind == ConductorKind::Wire);
    let Some(row) = first.or_else(|| here.next()) else {
        return Err(not_found(format!("no conductor at ({x}, {y})")));
    };

    let clean_network = row.network.as_ref().filter(|_| !row.network_dirty);
    let members = clean_network.map_or_else(Vec::new, |network| {
        state
            .members
            .iter()
            .filter(|m| m.network.as_ref() == Some(network))
            .map(|m| m.entity.clone())
            .collect()
    });

    Ok(Json(CellResponse {
        entity: row.entity.clone(),
        kind: row.kind,
        tier: row.tier,
        powered: clean_network.is_some(),
        network: clean_network.cloned(),
        members,
    }))
}
