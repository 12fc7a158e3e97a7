//! Snap-grid spatial index used to discover adjacent conductors.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::power::EntityId;

/// Integer cell coordinate on the snap grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The four edge-sharing cells in N, E, S, W order.
    pub fn cardinal_neighbors(self) -> [Cell; 4] {
        [
            Cell::new(self.x, self.y + 1),
            Cell::new(self.x + 1, self.y),
            Cell::new(self.x, self.y - 1),
            Cell::new(self.x - 1, self.y),
        ]
    }

    /// Returns `true` when `other` shares an edge with this cell.
    pub fn is_adjacent(self, other: Cell) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Read-only adjacency queries over placed entities.
///
/// Returned lists carry no ordering guarantee. Callers treat adjacency as
/// commutative.
pub trait SpatialIndex {
    /// Entities placed exactly at `cell`.
    fn occupants(&self, cell: Cell) -> Vec<EntityId>;

    /// Entities in the four cardinal cells around `cell`, de-duplicated.
    fn neighbors(&self, cell: Cell) -> Vec<EntityId> {
        let mut found: Vec<EntityId> = Vec::new();
        for adjacent in cell.cardinal_neighbors() {
            for id in self.occupants(adjacent) {
                if !found.contains(&id) {
                    found.push(id);
                }
            }
        }
        found
    }
}

/// Hash-bucketed grid mapping each occupied cell to the entities on it.
#[derive(Debug, Clone, Default)]
pub struct SnapGrid {
    cells: HashMap<Cell, Vec<EntityId>>,
}

impl SnapGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `id` on `cell`. Placing the same id twice on one cell is a no-op.
    pub fn insert(&mut self, cell: Cell, id: EntityId) {
        let bucket = self.cells.entry(cell).or_default();
        if !bucket.contains(&id) {
            bucket.push(id);
        }
    }

    /// Removes `id` from `cell`, returning whether it was present.
    pub fn remove(&mut self, cell: Cell, id: EntityId) -> bool {
        let Some(bucket) = self.cells.get_mut(&cell) else {
            return false;
        };
        let before = bucket.len();
        bucket.retain(|&other| other != id);
        let removed = bucket.len() != before;
        if bucket.is_empty() {
            self.cells.remove(&cell);
        }
        removed
    }

    /// Number of placed entities across all cells.
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl SpatialIndex for SnapGrid {
    fn occupants(&self, cell: Cell) -> Vec<EntityId> {
        self.cells.get(&cell).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    fn ids(n: usize) -> Vec<EntityId> {
        let mut arena: SlotMap<EntityId, ()> = SlotMap::with_key();
        (0..n).map(|_| arena.insert(())).collect()
    }

    #[test]
    fn cardinal_neighbors_are_adjacent() {
        let origin = Cell::new(3, -2);
        for cell in origin.cardinal_neighbors() {
            assert!(origin.is_adjacent(cell), "{cell} should touch {origin}");
        }
        assert!(!origin.is_adjacent(Cell::new(4, -1)));
        assert!(!origin.is_adjacent(origin));
    }

    #[test]
    fn occupants_and_neighbors() {
        let e = ids(3);
        let mut grid = SnapGrid::new();
        grid.insert(Cell::new(0, 0), e[0]);
        grid.insert(Cell::new(1, 0), e[1]);
        grid.insert(Cell::new(1, 1), e[2]);

        assert_eq!(grid.occupants(Cell::new(0, 0)), vec![e[0]]);
        assert_eq!(grid.neighbors(Cell::new(0, 0)), vec![e[1]]);

        let mut around = grid.neighbors(Cell::new(1, 0));
        around.sort();
        let mut expected = vec![e[0], e[2]];
        expected.sort();
        assert_eq!(around, expected);
    }

    #[test]
    fn insert_is_idempotent_and_remove_reports_presence() {
        let e = ids(1);
        let mut grid = SnapGrid::new();
        grid.insert(Cell::new(0, 0), e[0]);
        grid.insert(Cell::new(0, 0), e[0]);
        assert_eq!(grid.len(), 1);

        assert!(grid.remove(Cell::new(0, 0), e[0]));
        assert!(!grid.remove(Cell::new(0, 0), e[0]));
        assert!(grid.is_empty());
    }
}
