//! Cable items: stacks spent to lay wire and dropped when wire is cut.

pub mod placer;
/// Tiered cable stacks.
pub mod stack;

pub use placer::{PlacementError, WirePlacer};
pub use stack::CableStack;
