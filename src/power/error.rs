use thiserror::Error;

use super::conductor::EntityId;
use super::tier::Tier;

/// Caller misuse rejected by the connectivity engine.
///
/// None of these are runtime faults of the protocol itself; they signal a
/// broken precondition at the call site.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The id was never spawned or has already been despawned.
    #[error("entity {0:?} does not exist")]
    NotPlaced(EntityId),
    /// The conductor exists but the spatial index does not list it on its cell.
    #[error("entity {0:?} is not placed on the grid")]
    NotOnGrid(EntityId),
    /// The id refers to a network that no longer exists.
    #[error("network no longer exists")]
    UnknownNetwork,
    /// Join or merge across tiers.
    #[error("tier mismatch: {entity} conductor cannot join a {network} network")]
    TierMismatch { entity: Tier, network: Tier },
    /// Operation defined only for wire segments.
    #[error("entity {0:?} is not a wire segment")]
    NotAWire(EntityId),
}
