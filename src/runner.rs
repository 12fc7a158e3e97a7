//! Drives a scenario's layout and events against a fresh world.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::config::{EventConfig, ScatterConfig, ScenarioConfig};
use crate::grid::Cell;
use crate::items::{CableStack, PlacementError, WirePlacer};
use crate::power::{EngineError, EntityId, Tier};
use crate::world::World;

/// Seed offset for node placement so node cells do not mirror wire draws.
const NODE_SEED_OFFSET: u64 = 57;

/// What applying one event did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Placed(EntityId),
    Cut(CableStack),
    Removed,
    Regenerated,
    /// The event could not apply (empty cell, occupied cell, wrong kind).
    Skipped(String),
}

/// One applied event, in scenario order.
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub index: usize,
    pub action: &'static str,
    pub cell: Cell,
    pub outcome: Outcome,
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:<3} {:<10} {:<10} ", self.index, self.action, self.cell)?;
        match &self.outcome {
            Outcome::Placed(id) => write!(f, "placed {id:?}"),
            Outcome::Cut(stack) => write!(f, "cut, dropped {} x{}", stack.tier, stack.count()),
            Outcome::Removed => write!(f, "removed"),
            Outcome::Regenerated => write!(f, "regenerated"),
            Outcome::Skipped(reason) => write!(f, "skipped: {reason}"),
        }
    }
}

/// Final world and event log of one scenario run.
#[derive(Debug)]
pub struct RunOutcome {
    pub name: String,
    pub world: World,
    /// Wires and nodes placed by the scatter layout.
    pub scattered: usize,
    pub events: Vec<EventRecord>,
}

/// Runs the scatter layout (if any) and then every scripted event in order.
///
/// Events that cannot apply are recorded as skipped; they never abort the run.
pub fn run_scenario(config: &ScenarioConfig) -> RunOutcome {
    let mut world = World::new();
    let scattered = config
        .scatter
        .as_ref()
        .map_or(0, |sc| scatter_layout(&mut world, sc, config.simulation.seed));

    let events: Vec<EventRecord> = config
        .events
        .iter()
        .enumerate()
        .map(|(index, event)| apply_event(&mut world, index, event))
        .collect();

    info!(
        scenario = %config.simulation.name,
        scattered,
        events = events.len(),
        networks = world.engine().network_count(),
        "scenario finished"
    );

    RunOutcome {
        name: config.simulation.name.clone(),
        world,
        scattered,
        events,
    }
}

/// Places a seeded random layout of medium and high wires plus node
/// endpoints, returning how many conductors were placed.
///
/// Identical `(config, seed)` pairs always produce identical layouts.
pub fn scatter_layout(world: &mut World, config: &ScatterConfig, seed: u64) -> usize {
    let mut rng = StdRng::seed_from_u64(seed);
    let placer = WirePlacer;
    let mut placed = 0;

    let width = i32::try_from(config.width).unwrap_or(i32::MAX);
    let height = i32::try_from(config.height).unwrap_or(i32::MAX);

    for y in 0..height {
        for x in 0..width {
            if rng.random::<f64>() >= config.density {
                continue;
            }
            let tier = pick_tier(&mut rng, config.high_fraction);
            let mut stack = CableStack::single(tier);
            match placer.place(world, &mut stack, Cell::new(x, y)) {
                Ok(_) => placed += 1,
                Err(e) => warn!(x, y, error = %e, "scatter wire not placed"),
            }
        }
    }

    let mut node_rng = StdRng::seed_from_u64(seed.wrapping_add(NODE_SEED_OFFSET));
    for _ in 0..config.nodes {
        let x = node_rng.random_range(0..width.max(1));
        let y = node_rng.random_range(0..height.max(1));
        let tier = pick_tier(&mut node_rng, config.high_fraction);
        match world.place_node(Cell::new(x, y), tier) {
            Ok(_) => placed += 1,
            Err(e) => warn!(x, y, error = %e, "scatter node not placed"),
        }
    }
    placed
}

fn pick_tier(rng: &mut StdRng, high_fraction: f64) -> Tier {
    if rng.random::<f64>() < high_fraction {
        Tier::High
    } else {
        Tier::Medium
    }
}

fn apply_event(world: &mut World, index: usize, event: &EventConfig) -> EventRecord {
    let (x, y) = event.position();
    let cell = Cell::new(x, y);
    let outcome = match *event {
        EventConfig::Wire { tier, .. } => {
            let mut stack = CableStack::single(tier);
            match WirePlacer.place(world, &mut stack, cell) {
                Ok(id) => Outcome::Placed(id),
                Err(PlacementError::CellOccupied(_)) => {
                    Outcome::Skipped("cell already holds a wire".to_string())
                }
                Err(e) => Outcome::Skipped(e.to_string()),
            }
        }
        EventConfig::Node { tier, .. } => settle(world.place_node(cell, tier).map(Outcome::Placed)),
        EventConfig::Cut { .. } => match world.wire_at(cell) {
            Some(id) => settle(world.cut(id).map(Outcome::Cut)),
            None => Outcome::Skipped("no wire on cell".to_string()),
        },
        EventConfig::Remove { .. } => match world.entity_at(cell) {
            Some(id) => settle(world.remove(id).map(|_| Outcome::Removed)),
            None => Outcome::Skipped("cell is empty".to_string()),
        },
        EventConfig::Regenerate { .. } => match world.entity_at(cell) {
            Some(id) => settle(world.regenerate(id).map(|()| Outcome::Regenerated)),
            None => Outcome::Skipped("cell is empty".to_string()),
        },
    };

    if let Outcome::Skipped(reason) = &outcome {
        warn!(index, action = event.action(), %cell, %reason, "event skipped");
    }

    EventRecord {
        index,
        action: event.action(),
        cell,
        outcome,
    }
}

fn settle(result: Result<Outcome, EngineError>) -> Outcome {
    result.unwrap_or_else(|e| Outcome::Skipped(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NetworkReport;

    #[test]
    fn same_scenario_and_seed_is_deterministic() {
        let config = ScenarioConfig::scatter();

        let run_a = run_scenario(&config);
        let run_b = run_scenario(&config);

        let report_a = NetworkReport::from_world(&run_a.name, &run_a.world);
        let report_b = NetworkReport::from_world(&run_b.name, &run_b.world);
        assert_eq!(run_a.scattered, run_b.scattered);
        assert_eq!(report_a.to_string(), report_b.to_string());
    }

    #[test]
    fn scatter_stays_inside_its_rectangle() {
        let mut world = World::new();
        let config = ScatterConfig {
            width: 7,
            height: 3,
            density: 0.8,
            high_fraction: 0.5,
            nodes: 10,
        };
        let placed = scatter_layout(&mut world, &config, 5);

        assert_eq!(world.engine().conductors().count(), placed);
        for (_, c) in world.engine().conductors() {
            assert!((0..7).contains(&c.cell.x), "x out of range: {}", c.cell);
            assert!((0..3).contains(&c.cell.y), "y out of range: {}", c.cell);
        }
    }

    #[test]
    fn events_on_empty_cells_are_skipped() {
        let mut config = ScenarioConfig::line();
        config.events.push(EventConfig::Cut { x: 40, y: 40 });
        config.events.push(EventConfig::Wire {
            x: 0,
            y: 0,
            tier: Tier::High,
        });

        let run = run_scenario(&config);
        assert_eq!(run.events.len(), 5);
        assert!(matches!(run.events[3].outcome, Outcome::Skipped(_)));
        assert!(matches!(run.events[4].outcome, Outcome::Skipped(_)));
        assert_eq!(run.world.engine().network_count(), 1);
    }

    #[test]
    fn cut_event_drops_single_stack() {
        let run = run_scenario(&ScenarioConfig::split());
        assert_eq!(
            run.events[3].outcome,
            Outcome::Cut(CableStack::single(Tier::Medium))
        );
    }

    #[test]
    fn scatter_is_bounded_by_rectangle() {
        let mut world = World::new();
        let sc = ScatterConfig {
            width: 5,
            height: 4,
            density: 1.0,
            high_fraction: 0.0,
            nodes: 3,
        };
        let placed = scatter_layout(&mut world, &sc, 9);
        assert_eq!(placed, 5 * 4 + 3);
        for (_, c) in world.engine().conductors() {
            assert!((0..5).contains(&c.cell.x) && (0..4).contains(&c.cell.y));
        }
        assert_eq!(world.engine().network_count(), 1);
    }
}
