//! Grid plus engine, wired together through placement and removal hooks.

use tracing::debug;

use crate::grid::{Cell, SnapGrid, SpatialIndex};
use crate::items::CableStack;
use crate::power::{Conductor, Engine, EngineError, EntityId, NetworkView, Tier};

/// A placed world of conductors.
///
/// Owns the snap grid and the connectivity engine and invokes the engine from
/// the entity lifecycle: placement spreads connectivity, removal disconnects
/// before the entity is torn down.
#[derive(Debug, Default)]
pub struct World {
    grid: SnapGrid,
    engine: Engine,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid(&self) -> &SnapGrid {
        &self.grid
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Spawns a wire segment on `cell` and spreads connectivity from it.
    ///
    /// # Errors
    ///
    /// Propagates engine precondition failures; none occur for a fresh wire.
    pub fn place_wire(&mut self, cell: Cell, tier: Tier) -> Result<EntityId, EngineError> {
        self.place(Conductor::wire(cell, tier))
    }

    /// Spawns a node endpoint on `cell` and attaches it to a nearby wire.
    ///
    /// # Errors
    ///
    /// Propagates engine precondition failures; none occur for a fresh node.
    pub fn place_node(&mut self, cell: Cell, tier: Tier) -> Result<EntityId, EngineError> {
        self.place(Conductor::node(cell, tier))
    }

    fn place(&mut self, conductor: Conductor) -> Result<EntityId, EngineError> {
        let cell = conductor.cell;
        let kind = conductor.kind;
        let id = self.engine.spawn(conductor);
        self.grid.insert(cell, id);
        debug!(entity = ?id, %kind, %cell, "placed");
        self.engine.propagate(&self.grid, id)?;
        Ok(id)
    }

    /// Removal hook: disconnects, then takes the entity off the grid.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotPlaced`] if `id` is unknown.
    pub fn remove(&mut self, id: EntityId) -> Result<Conductor, EngineError> {
        let cell = self
            .engine
            .conductor(id)
            .map(|c| c.cell)
            .ok_or(EngineError::NotPlaced(id))?;
        self.engine.disconnect(id)?;
        self.grid.remove(cell, id);
        let conductor = self.engine.despawn(id)?;
        debug!(entity = ?id, %cell, "removed");
        Ok(conductor)
    }

    /// Cuts a wire: disconnects and removes it and returns the dropped
    /// one-item cable stack of the wire's tier.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids and for anything that is not a wire.
    pub fn cut(&mut self, id: EntityId) -> Result<CableStack, EngineError> {
        let conductor = self.engine.conductor(id).ok_or(EngineError::NotPlaced(id))?;
        if !conductor.is_wire() {
            return Err(EngineError::NotAWire(id));
        }
        let removed = self.remove(id)?;
        Ok(CableStack::single(removed.tier))
    }

    /// Rebuilds the membership of `id` outward from its current cell.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotPlaced`] if `id` is unknown.
    pub fn regenerate(&mut self, id: EntityId) -> Result<(), EngineError> {
        self.engine.regenerate(&self.grid, id)
    }

    /// Re-runs propagation on `id`; a no-op for stable conductors.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotPlaced`] if `id` is unknown.
    pub fn propagate(&mut self, id: EntityId) -> Result<(), EngineError> {
        self.engine.propagate(&self.grid, id)
    }

    /// The clean network `id` belongs to, if any.
    pub fn query(&self, id: EntityId) -> Option<NetworkView> {
        self.engine.network_of(id)
    }

    /// The wire on `cell`, if one is placed there.
    pub fn wire_at(&self, cell: Cell) -> Option<EntityId> {
        self.grid
            .occupants(cell)
            .into_iter()
            .find(|&id| self.engine.conductor(id).is_some_and(Conductor::is_wire))
    }

    /// The first conductor on `cell`, wires before nodes.
    pub fn entity_at(&self, cell: Cell) -> Option<EntityId> {
        self.wire_at(cell)
            .or_else(|| self.grid.occupants(cell).into_iter().next())
    }
}
