use thiserror::Error;

use crate::grid::Cell;
use crate::power::{EngineError, EntityId, Tier};
use crate::world::World;

use super::stack::CableStack;

/// Why a wire could not be laid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("cell {0} already holds a wire")]
    CellOccupied(Cell),
    #[error("no {0} cable left in the stack")]
    EmptyStack(Tier),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Lays wires from a cable stack, one item per wire.
#[derive(Debug, Default, Clone, Copy)]
pub struct WirePlacer;

impl WirePlacer {
    /// Places a wire of the stack's tier on `cell`.
    ///
    /// A cell holds at most one wire regardless of tier. The stack is only
    /// spent once the cell is known to be free.
    ///
    /// # Errors
    ///
    /// [`PlacementError::CellOccupied`] or [`PlacementError::EmptyStack`];
    /// the world and the stack are untouched then.
    pub fn place(
        &self,
        world: &mut World,
        stack: &mut CableStack,
        cell: Cell,
    ) -> Result<EntityId, PlacementError> {
        if world.wire_at(cell).is_some() {
            return Err(PlacementError::CellOccupied(cell));
        }
        if !stack.use_items(1) {
            return Err(PlacementError::EmptyStack(stack.tier));
        }
        Ok(world.place_wire(cell, stack.tier)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placing_spends_one_item() {
        let mut world = World::new();
        let mut stack = CableStack::new(Tier::Medium, 2, 30);
        let placer = WirePlacer;

        let id = placer
            .place(&mut world, &mut stack, Cell::new(0, 0))
            .expect("free cell");
        assert_eq!(stack.count(), 1);
        assert_eq!(world.wire_at(Cell::new(0, 0)), Some(id));
    }

    #[test]
    fn occupied_cell_keeps_stack_intact() {
        let mut world = World::new();
        let mut high = CableStack::new(Tier::High, 30, 30);
        let mut low = CableStack::new(Tier::Low, 30, 30);
        let placer = WirePlacer;

        placer
            .place(&mut world, &mut high, Cell::new(1, 1))
            .expect("free cell");
        let err = placer
            .place(&mut world, &mut low, Cell::new(1, 1))
            .expect_err("cell holds a wire of another tier");
        assert_eq!(err, PlacementError::CellOccupied(Cell::new(1, 1)));
        assert_eq!(low.count(), low.max_count());
    }

    #[test]
    fn empty_stack_is_rejected() {
        let mut world = World::new();
        let mut stack = CableStack::new(Tier::Low, 0, 30);
        let err = WirePlacer
            .place(&mut world, &mut stack, Cell::new(0, 0))
            .expect_err("nothing to place");
        assert_eq!(err, PlacementError::EmptyStack(Tier::Low));
        assert!(world.grid().is_empty());
    }
}
