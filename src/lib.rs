//! Grid power-network connectivity engine.
//!
//! Wires and nodes placed on a snap grid discover each other, form shared
//! power networks, merge on contact, and lazily invalidate and regenerate
//! networks as conductors are removed.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
/// Snap-grid spatial index.
pub mod grid;
pub mod io;
pub mod items;
pub mod power;
pub mod report;
pub mod runner;
pub mod world;
