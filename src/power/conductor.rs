use std::fmt;

use serde::Serialize;
use slotmap::new_key_type;

use crate::grid::Cell;

use super::network::NetworkId;
use super::tier::Tier;

new_key_type! {
    /// Stable handle for a placed wire or node, backed by a generational slot map.
    pub struct EntityId;
}

/// What a conductor does with connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConductorKind {
    /// Wire segment: joins, creates and spreads networks.
    Wire,
    /// Node endpoint: taps a network supplied by a nearby wire, never spreads.
    Node,
}

impl ConductorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConductorKind::Wire => "wire",
            ConductorKind::Node => "node",
        }
    }
}

impl fmt::Display for ConductorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-entity connectivity state.
#[derive(Debug, Clone)]
pub struct Conductor {
    pub kind: ConductorKind,
    /// Fixed at spawn.
    pub tier: Tier,
    /// Grid placement; fixed at spawn.
    pub cell: Cell,
    /// Network this conductor is a member of, if any.
    pub network: Option<NetworkId>,
    /// Set only while a regeneration pass rebuilds this conductor's membership.
    pub regenerating: bool,
}

impl Conductor {
    pub fn wire(cell: Cell, tier: Tier) -> Self {
        Self::new(ConductorKind::Wire, cell, tier)
    }

    pub fn node(cell: Cell, tier: Tier) -> Self {
        Self::new(ConductorKind::Node, cell, tier)
    }

    fn new(kind: ConductorKind, cell: Cell, tier: Tier) -> Self {
        Self {
            kind,
            tier,
            cell,
            network: None,
            regenerating: false,
        }
    }

    pub fn is_wire(&self) -> bool {
        self.kind == ConductorKind::Wire
    }

    pub fn is_node(&self) -> bool {
        self.kind == ConductorKind::Node
    }
}
