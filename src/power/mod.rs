//! Power-network connectivity: conductors, networks and the engine that links them.

/// Wire segments and node endpoints.
pub mod conductor;
pub mod engine;
pub mod error;
/// Shared connectivity groups.
pub mod network;
pub mod tier;

pub use conductor::{Conductor, ConductorKind, EntityId};
pub use engine::{Engine, NetworkView};
pub use error::EngineError;
pub use network::{NetworkId, PowerNetwork};
pub use tier::Tier;
