//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::collections::{BTreeSet, VecDeque};

use powernet::grid::{Cell, SpatialIndex};
use powernet::power::{EntityId, Tier};
use powernet::world::World;

/// Lays one wire of `tier` on each `(x, y)` cell, in order.
pub fn lay_wires(world: &mut World, tier: Tier, cells: &[(i32, i32)]) -> Vec<EntityId> {
    cells
        .iter()
        .map(|&(x, y)| {
            world
                .place_wire(Cell::new(x, y), tier)
                .expect("fresh wire should place")
        })
        .collect()
}

/// A horizontal run of wires on row `y` covering `xs`.
pub fn wire_row(world: &mut World, tier: Tier, y: i32, xs: std::ops::Range<i32>) -> Vec<EntityId> {
    let cells: Vec<(i32, i32)> = xs.map(|x| (x, y)).collect();
    lay_wires(world, tier, &cells)
}

/// Reference connectivity: breadth-first search over same-tier wires
/// through cardinal adjacency, independent of the engine's bookkeeping.
pub fn wire_component(world: &World, start: EntityId) -> BTreeSet<EntityId> {
    let engine = world.engine();
    let Some(origin) = engine.conductor(start) else {
        return BTreeSet::new();
    };
    let tier = origin.tier;

    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(id) = queue.pop_front() {
        let Some(cell) = engine.conductor(id).map(|c| c.cell) else {
            continue;
        };
        for other in world.grid().neighbors(cell) {
            let same_tier_wire = engine
                .conductor(other)
                .is_some_and(|c| c.is_wire() && c.tier == tier);
            if same_tier_wire && seen.insert(other) {
                queue.push_back(other);
            }
        }
    }
    seen
}

/// Checks single membership, tier isolation and, for every clean network,
/// that its wires are exactly one connected component and its nodes sit
/// next to one of those wires.
pub fn assert_consistent(world: &World) {
    let engine = world.engine();

    for (id, conductor) in engine.conductors() {
        let holders: Vec<_> = engine
            .networks()
            .filter(|(_, n)| n.contains(id))
            .map(|(nid, _)| nid)
            .collect();
        match conductor.network {
            Some(network) => assert_eq!(holders, vec![network], "membership of {id:?}"),
            None => assert!(holders.is_empty(), "{id:?} is listed without a reference"),
        }
    }

    for (network_id, network) in engine.networks() {
        assert!(!network.is_empty(), "empty network {network_id:?} kept alive");
        for &member in network.members() {
            let tier = engine.conductor(member).map(|c| c.tier);
            assert_eq!(tier, Some(network.tier()), "tier mixed into {network_id:?}");
        }
        if network.is_dirty() {
            continue;
        }

        let wires: BTreeSet<EntityId> = network
            .members()
            .iter()
            .copied()
            .filter(|&m| engine.conductor(m).is_some_and(|c| c.is_wire()))
            .collect();
        if let Some(&first) = wires.iter().next() {
            assert_eq!(
                wire_component(world, first),
                wires,
                "network {network_id:?} is not one whole component"
            );
        }

        for &member in network.members() {
            let Some(node) = engine.conductor(member).filter(|c| c.is_node()) else {
                continue;
            };
            let fed = wires.iter().any(|&w| {
                engine
                    .conductor(w)
                    .is_some_and(|c| c.cell == node.cell || c.cell.is_adjacent(node.cell))
            });
            assert!(fed, "node {member:?} has no supplying wire in {network_id:?}");
        }
    }
}
