//! API response types.

use serde::Serialize;

use crate::power::{ConductorKind, Tier};
use crate::report::{MembershipRow, NetworkRow};

/// One network with its member conductors.
#[derive(Debug, Serialize)]
pub struct NetworkMembersResponse {
    pub network: NetworkRow,
    pub members: Vec<MembershipRow>,
}

/// The conductor on a cell and the network it draws from.
///
/// `network` and `members` are only filled in while the network is clean;
/// a dirty network is not trusted by consumers.
#[derive(Debug, Serialize)]
pub struct CellResponse {
    pub entity: String,
    pub kind: ConductorKind,
    pub tier: Tier,
    pub powered: bool,
    pub network: Option<String>,
    pub members: Vec<String>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
