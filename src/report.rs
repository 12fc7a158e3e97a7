//! Post-hoc network and membership summaries of a world.

use std::fmt;

use serde::Serialize;
use slotmap::Key;

use crate::power::{ConductorKind, Tier};
use crate::world::World;

/// Short stable label for an arena key, e.g. `"3v1"` (slot 3, generation 1).
pub fn label<K: Key>(key: K) -> String {
    format!("{:?}", key.data())
}

/// One network in the report.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkRow {
    pub id: String,
    pub tier: Tier,
    pub wires: usize,
    pub nodes: usize,
    pub dirty: bool,
}

impl NetworkRow {
    pub fn size(&self) -> usize {
        self.wires + self.nodes
    }
}

/// One conductor and the network it currently belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipRow {
    pub entity: String,
    pub kind: ConductorKind,
    pub tier: Tier,
    pub x: i32,
    pub y: i32,
    pub network: Option<String>,
    pub network_dirty: bool,
}

/// Aggregate view of every network in a world.
///
/// Rows are ordered largest network first, ties broken by id, so identical
/// runs render identically.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkReport {
    pub scenario: String,
    pub conductors: usize,
    pub unattached: usize,
    pub clean_networks: usize,
    pub dirty_networks: usize,
    pub largest_network: usize,
    pub networks: Vec<NetworkRow>,
}

impl NetworkReport {
    pub fn from_world(scenario: &str, world: &World) -> Self {
        let engine = world.engine();
        let mut networks: Vec<NetworkRow> = engine
            .networks()
            .map(|(id, network)| {
                let wires = network
                    .members()
                    .iter()
                    .filter(|&&m| engine.conductor(m).is_some_and(|c| c.is_wire()))
                    .count();
                NetworkRow {
                    id: label(id),
                    tier: network.tier(),
                    wires,
                    nodes: network.len() - wires,
                    dirty: network.is_dirty(),
                }
            })
            .collect();
        networks.sort_by(|a, b| b.size().cmp(&a.size()).then_with(|| a.id.cmp(&b.id)));

        let dirty_networks = networks.iter().filter(|n| n.dirty).count();
        Self {
            scenario: scenario.to_string(),
            conductors: engine.conductors().count(),
            unattached: engine
                .conductors()
                .filter(|(_, c)| c.network.is_none())
                .count(),
            clean_networks: networks.len() - dirty_networks,
            dirty_networks,
            largest_network: networks.first().map_or(0, NetworkRow::size),
            networks,
        }
    }
}

impl fmt::Display for NetworkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Network Report: {} ===", self.scenario)?;
        writeln!(f, "Conductors:          {}", self.conductors)?;
        writeln!(f, "Unattached:          {}", self.unattached)?;
        writeln!(f, "Clean networks:      {}", self.clean_networks)?;
        writeln!(f, "Dirty networks:      {}", self.dirty_networks)?;
        write!(f, "Largest network:     {}", self.largest_network)?;
        for row in &self.networks {
            write!(
                f,
                "\n  {:<8} {:<6} wires={:<4} nodes={:<4} {}",
                row.id,
                row.tier,
                row.wires,
                row.nodes,
                if row.dirty { "dirty" } else { "clean" }
            )?;
        }
        Ok(())
    }
}

/// Per-conductor membership, ordered by cell (row-major) then kind.
pub fn membership_rows(world: &World) -> Vec<MembershipRow> {
    let engine = world.engine();
    let mut rows: Vec<MembershipRow> = engine
        .conductors()
        .map(|(id, c)| MembershipRow {
            entity: label(id),
            kind: c.kind,
            tier: c.tier,
            x: c.cell.x,
            y: c.cell.y,
            network: c.network.map(label),
            network_dirty: c
                .network
                .and_then(|n| engine.network(n))
                .is_some_and(|n| n.is_dirty()),
        })
        .collect();
    rows.sort_by(|a, b| {
        (a.y, a.x, a.kind.as_str(), &a.entity).cmp(&(b.y, b.x, b.kind.as_str(), &b.entity))
    });
    rows
}
