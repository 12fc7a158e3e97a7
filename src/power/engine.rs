//! Connectivity engine: forms, merges, invalidates and regenerates power networks.

use std::collections::BTreeSet;

use slotmap::SlotMap;
use tracing::{debug, warn};

use crate::grid::{Cell, SpatialIndex};

use super::conductor::{Conductor, EntityId};
use super::error::EngineError;
use super::network::{NetworkId, PowerNetwork};
use super::tier::Tier;

/// Snapshot of a trustworthy network, as seen by downstream consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkView {
    pub id: NetworkId,
    pub tier: Tier,
    pub members: BTreeSet<EntityId>,
}

/// Owns every conductor and network and runs the connectivity protocol.
///
/// The engine never owns the spatial index. Every operation that needs
/// adjacency receives the index explicitly, so the same engine can be driven
/// from any grid implementation.
///
/// All operations are synchronous and run to completion. Propagation is a
/// work-list traversal: a conductor is pushed only at the moment it joins the
/// propagating network, so each conductor is expanded at most once per pass.
#[derive(Debug, Default)]
pub struct Engine {
    conductors: SlotMap<EntityId, Conductor>,
    networks: SlotMap<NetworkId, PowerNetwork>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a conductor. It starts unattached; the caller places it on
    /// the grid and then runs [`Engine::propagate`].
    pub fn spawn(&mut self, conductor: Conductor) -> EntityId {
        self.conductors.insert(conductor)
    }

    /// Disconnects and forgets a conductor.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotPlaced`] if `id` is unknown.
    pub fn despawn(&mut self, id: EntityId) -> Result<Conductor, EngineError> {
        self.disconnect(id)?;
        self.conductors.remove(id).ok_or(EngineError::NotPlaced(id))
    }

    pub fn conductor(&self, id: EntityId) -> Option<&Conductor> {
        self.conductors.get(id)
    }

    pub fn conductors(&self) -> impl Iterator<Item = (EntityId, &Conductor)> {
        self.conductors.iter()
    }

    pub fn network(&self, id: NetworkId) -> Option<&PowerNetwork> {
        self.networks.get(id)
    }

    pub fn networks(&self) -> impl Iterator<Item = (NetworkId, &PowerNetwork)> {
        self.networks.iter()
    }

    /// Number of live network objects, dirty ones included.
    pub fn network_count(&self) -> usize {
        self.networks.len()
    }

    /// Raw membership, regardless of staleness.
    pub fn membership(&self, id: EntityId) -> Option<NetworkId> {
        self.conductors.get(id).and_then(|c| c.network)
    }

    /// The network of `id` if it has one and it is not dirty.
    pub fn network_of(&self, id: EntityId) -> Option<NetworkView> {
        let network_id = self.membership(id)?;
        let network = self.networks.get(network_id)?;
        if network.is_dirty() {
            return None;
        }
        Some(NetworkView {
            id: network_id,
            tier: network.tier(),
            members: network.members().clone(),
        })
    }

    /// Whether a same-tier peer may join the network `id` belongs to.
    ///
    /// True only for a conductor with a clean network that is not itself
    /// being rebuilt.
    pub fn can_connect_to(&self, id: EntityId) -> bool {
        let Some(conductor) = self.conductors.get(id) else {
            return false;
        };
        if conductor.regenerating {
            return false;
        }
        conductor
            .network
            .and_then(|n| self.networks.get(n))
            .is_some_and(|n| !n.is_dirty())
    }

    /// Makes `id` a member of `network` and clears its regenerating flag.
    ///
    /// A conductor already attached elsewhere is disconnected from its old
    /// network first, so membership stays unique.
    ///
    /// # Errors
    ///
    /// Rejects unknown ids and tier mismatches; nothing is mutated then.
    pub fn join(&mut self, id: EntityId, network: NetworkId) -> Result<(), EngineError> {
        let conductor = self.conductors.get(id).ok_or(EngineError::NotPlaced(id))?;
        let target = self.networks.get(network).ok_or(EngineError::UnknownNetwork)?;
        if conductor.tier != target.tier() {
            warn!(
                entity = ?id,
                entity_tier = %conductor.tier,
                network_tier = %target.tier(),
                "rejected cross-tier join"
            );
            return Err(EngineError::TierMismatch {
                entity: conductor.tier,
                network: target.tier(),
            });
        }
        if conductor.network.is_some_and(|current| current != network) {
            self.disconnect(id)?;
        }

        if let Some(target) = self.networks.get_mut(network) {
            target.insert(id);
        }
        if let Some(conductor) = self.conductors.get_mut(id) {
            conductor.network = Some(network);
            conductor.regenerating = false;
        }
        Ok(())
    }

    /// Moves every member of `from` into `into` and discards `from`.
    ///
    /// This is a set union, not a recomputation. The merged network is dirty
    /// if either input was.
    ///
    /// # Errors
    ///
    /// Rejects unknown networks and tier mismatches.
    pub fn merge(&mut self, into: NetworkId, from: NetworkId) -> Result<(), EngineError> {
        if into == from {
            return Ok(());
        }
        let target = self.networks.get(into).ok_or(EngineError::UnknownNetwork)?;
        let source = self.networks.get(from).ok_or(EngineError::UnknownNetwork)?;
        if target.tier() != source.tier() {
            warn!(into = ?into, from = ?from, "rejected cross-tier merge");
            return Err(EngineError::TierMismatch {
                entity: source.tier(),
                network: target.tier(),
            });
        }

        let Some(mut source) = self.networks.remove(from) else {
            return Err(EngineError::UnknownNetwork);
        };
        let moved = source.drain();
        debug!(into = ?into, from = ?from, moved = moved.len(), "merging networks");
        for &member in &moved {
            if let Some(conductor) = self.conductors.get_mut(member) {
                conductor.network = Some(into);
            }
        }
        if let Some(target) = self.networks.get_mut(into) {
            for member in moved {
                target.insert(member);
            }
            if source.is_dirty() {
                target.mark_dirty();
            }
        }
        Ok(())
    }

    /// Leaves the current network, marking it dirty.
    ///
    /// The split is not computed here. A network left empty is discarded.
    /// Disconnecting an unattached conductor is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotPlaced`] if `id` is unknown.
    pub fn disconnect(&mut self, id: EntityId) -> Result<(), EngineError> {
        let conductor = self.conductors.get_mut(id).ok_or(EngineError::NotPlaced(id))?;
        let Some(network_id) = conductor.network else {
            return Ok(());
        };

        let now_empty = match self.networks.get_mut(network_id) {
            Some(network) => {
                network.remove(id);
                network.mark_dirty();
                network.is_empty()
            }
            None => false,
        };
        conductor.network = None;

        if now_empty {
            self.networks.remove(network_id);
            debug!(network = ?network_id, "discarded empty network");
        }
        Ok(())
    }

    /// On-placement hook: spreads connectivity outward from `id`.
    ///
    /// A node only attaches to a nearby wire. A wire whose own network is
    /// dirty is regenerated instead.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotPlaced`] if `id` is unknown and
    /// [`EngineError::NotOnGrid`] if `grid` does not hold it on its cell.
    pub fn propagate<G>(&mut self, grid: &G, id: EntityId) -> Result<(), EngineError>
    where
        G: SpatialIndex + ?Sized,
    {
        let conductor = self.placed(grid, id)?;
        if conductor.is_node() {
            return self.attach_node(grid, id);
        }
        let own_dirty = conductor
            .network
            .and_then(|n| self.networks.get(n))
            .is_some_and(PowerNetwork::is_dirty);
        if own_dirty && !conductor.regenerating {
            return self.regenerate(grid, id);
        }
        self.spread_from(grid, id)
    }

    /// Rebuilds the membership of `id` from scratch.
    ///
    /// A wire leaves its network and spreads again as if freshly placed,
    /// even when that network was clean, so its whole component moves to a
    /// new network. Members of the old network outside the newly traced
    /// component keep their stale membership until they are touched
    /// themselves.
    ///
    /// A node does not propagate, so it is only re-attached through
    /// [`Engine::attach_node`]: a node on a clean network keeps it, and only
    /// a node that is unattached or on a dirty network looks for a new wire.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotPlaced`] if `id` is unknown and
    /// [`EngineError::NotOnGrid`] if `grid` does not hold it on its cell.
    pub fn regenerate<G>(&mut self, grid: &G, id: EntityId) -> Result<(), EngineError>
    where
        G: SpatialIndex + ?Sized,
    {
        let conductor = self.placed(grid, id)?;
        if conductor.is_node() {
            return self.attach_node(grid, id);
        }
        debug!(entity = ?id, cell = %conductor.cell, "regenerating");
        self.disconnect(id)?;
        if let Some(conductor) = self.conductors.get_mut(id) {
            conductor.regenerating = true;
        }
        self.spread_from(grid, id)
    }

    /// Attaches a node to the first eligible same-tier wire around it.
    ///
    /// A node already on a clean network is left alone. A node on a dirty
    /// network leaves it first. With no eligible wire the node stays
    /// unattached; nodes never create networks.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotPlaced`] if `id` is unknown and
    /// [`EngineError::NotOnGrid`] if `grid` does not hold it on its cell.
    pub fn attach_node<G>(&mut self, grid: &G, id: EntityId) -> Result<(), EngineError>
    where
        G: SpatialIndex + ?Sized,
    {
        let conductor = self.placed(grid, id)?;
        let (cell, tier) = (conductor.cell, conductor.tier);
        if self.can_connect_to(id) {
            return Ok(());
        }

        self.disconnect(id)?;
        if let Some(conductor) = self.conductors.get_mut(id) {
            conductor.regenerating = true;
        }

        let supplier = self
            .nearby(grid, cell, tier, |c| c.is_wire())
            .into_iter()
            .filter(|&wire| self.can_connect_to(wire))
            .find_map(|wire| self.membership(wire));

        match supplier {
            Some(network) => self.join(id, network),
            None => {
                if let Some(conductor) = self.conductors.get_mut(id) {
                    conductor.regenerating = false;
                }
                Ok(())
            }
        }
    }

    /// The conductor `id`, provided `grid` lists it on its own cell.
    fn placed<G>(&self, grid: &G, id: EntityId) -> Result<&Conductor, EngineError>
    where
        G: SpatialIndex + ?Sized,
    {
        let conductor = self.conductors.get(id).ok_or(EngineError::NotPlaced(id))?;
        if !grid.occupants(conductor.cell).contains(&id) {
            warn!(entity = ?id, cell = %conductor.cell, "conductor missing from spatial index");
            return Err(EngineError::NotOnGrid(id));
        }
        Ok(conductor)
    }

    fn spread_from<G>(&mut self, grid: &G, start: EntityId) -> Result<(), EngineError>
    where
        G: SpatialIndex + ?Sized,
    {
        let mut pending = vec![start];
        let mut expanded = 0usize;
        while let Some(current) = pending.pop() {
            self.spread_one(grid, current, &mut pending)?;
            expanded += 1;
        }
        debug!(start = ?start, expanded, "propagation finished");
        Ok(())
    }

    /// One expansion step. Every conductor pushed onto `pending` has just
    /// joined this step's network.
    fn spread_one<G>(
        &mut self,
        grid: &G,
        current: EntityId,
        pending: &mut Vec<EntityId>,
    ) -> Result<(), EngineError>
    where
        G: SpatialIndex + ?Sized,
    {
        let conductor = self
            .conductors
            .get(current)
            .ok_or(EngineError::NotPlaced(current))?;
        let (cell, tier) = (conductor.cell, conductor.tier);
        let (membership, regenerating) = (conductor.network, conductor.regenerating);
        let wires = self.adjacent_wires(grid, current, cell, tier);

        let network = match membership {
            Some(network) if !regenerating => network,
            _ => {
                let network = match wires
                    .iter()
                    .copied()
                    .filter(|&wire| self.can_connect_to(wire))
                    .find_map(|wire| self.membership(wire))
                {
                    Some(existing) => existing,
                    None => self.create_network(tier),
                };
                self.join(current, network)?;
                network
            }
        };

        for node in self.nearby(grid, cell, tier, |c| c.is_node()) {
            match self.membership(node) {
                None => self.join(node, network)?,
                Some(existing) if self.is_dirty(existing) => {
                    debug!(node = ?node, "regenerating node from neighbor");
                    self.join(node, network)?;
                }
                Some(_) => {}
            }
        }

        for wire in wires {
            let Some(neighbor) = self.conductors.get(wire) else {
                continue;
            };
            let (membership, regenerating) = (neighbor.network, neighbor.regenerating);
            match membership {
                None => {
                    self.join(wire, network)?;
                    pending.push(wire);
                }
                Some(_) if regenerating => {
                    self.join(wire, network)?;
                    pending.push(wire);
                }
                Some(existing) if existing == network => {}
                Some(existing) if self.is_dirty(existing) => {
                    debug!(wire = ?wire, "regenerating stale neighbor");
                    self.join(wire, network)?;
                    pending.push(wire);
                }
                Some(existing) => self.merge(network, existing)?,
            }
        }
        Ok(())
    }

    fn create_network(&mut self, tier: Tier) -> NetworkId {
        let id = self.networks.insert(PowerNetwork::new(tier));
        debug!(network = ?id, %tier, "created network");
        id
    }

    fn is_dirty(&self, network: NetworkId) -> bool {
        self.networks.get(network).is_some_and(PowerNetwork::is_dirty)
    }

    /// Same-tier wires in the four cardinal cells, excluding `id`.
    fn adjacent_wires<G>(&self, grid: &G, id: EntityId, cell: Cell, tier: Tier) -> Vec<EntityId>
    where
        G: SpatialIndex + ?Sized,
    {
        let mut found: Vec<EntityId> = grid
            .neighbors(cell)
            .into_iter()
            .filter(|&other| other != id)
            .filter(|&other| {
                self.conductors
                    .get(other)
                    .is_some_and(|c| c.is_wire() && c.tier == tier)
            })
            .collect();
        found.sort();
        found.dedup();
        found
    }

    /// Same-tier conductors in `cell` and its four cardinal cells matching `kind`.
    fn nearby<G>(
        &self,
        grid: &G,
        cell: Cell,
        tier: Tier,
        kind: impl Fn(&Conductor) -> bool,
    ) -> Vec<EntityId>
    where
        G: SpatialIndex + ?Sized,
    {
        let mut found: Vec<EntityId> = grid
            .occupants(cell)
            .into_iter()
            .chain(grid.neighbors(cell))
            .filter(|&other| {
                self.conductors
                    .get(other)
                    .is_some_and(|c| c.tier == tier && kind(c))
            })
            .collect();
        found.sort();
        found.dedup();
        found
    }
}
