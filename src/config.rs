//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::power::Tier;

/// Top-level scenario configuration parsed from TOML.
///
/// All sections have defaults. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or pick a built-in layout with
/// [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Naming and the master random seed.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Optional randomized layout placed before the scripted events.
    #[serde(default)]
    pub scatter: Option<ScatterConfig>,
    /// Ordered placement and removal events.
    #[serde(default, rename = "event")]
    pub events: Vec<EventConfig>,
}

/// Scenario naming and seeding.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Human-readable scenario name used in reports.
    pub name: String,
    /// Master random seed for scatter layouts.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            name: "custom".to_string(),
            seed: 42,
        }
    }
}

/// Largest accepted scatter width or height, in cells.
pub const MAX_SCATTER_EXTENT: u32 = 4096;

/// Randomized wire layout over a `width` x `height` rectangle at the origin.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScatterConfig {
    /// Rectangle width in cells (1 to [`MAX_SCATTER_EXTENT`]).
    pub width: u32,
    /// Rectangle height in cells (1 to [`MAX_SCATTER_EXTENT`]).
    pub height: u32,
    /// Probability that a cell receives a wire (0.0–1.0).
    pub density: f64,
    /// Fraction of placed wires that are high tier, the rest medium (0.0–1.0).
    pub high_fraction: f64,
    /// Number of node endpoints dropped on random cells.
    pub nodes: u32,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 16,
            density: 0.55,
            high_fraction: 0.3,
            nodes: 8,
        }
    }
}

/// One scripted event, addressed by cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EventConfig {
    /// Lay a wire of `tier` on the cell.
    Wire { x: i32, y: i32, tier: Tier },
    /// Place a node endpoint of `tier` on the cell.
    Node { x: i32, y: i32, tier: Tier },
    /// Cut the wire on the cell.
    Cut { x: i32, y: i32 },
    /// Remove whatever conductor is on the cell.
    Remove { x: i32, y: i32 },
    /// Regenerate the conductor on the cell.
    Regenerate { x: i32, y: i32 },
}

impl EventConfig {
    /// Config spelling of the event's action.
    pub fn action(&self) -> &'static str {
        match self {
            EventConfig::Wire { .. } => "wire",
            EventConfig::Node { .. } => "node",
            EventConfig::Cut { .. } => "cut",
            EventConfig::Remove { .. } => "remove",
            EventConfig::Regenerate { .. } => "regenerate",
        }
    }

    /// Target cell as `(x, y)`.
    pub fn position(&self) -> (i32, i32) {
        match *self {
            EventConfig::Wire { x, y, .. }
            | EventConfig::Node { x, y, .. }
            | EventConfig::Cut { x, y }
            | EventConfig::Remove { x, y }
            | EventConfig::Regenerate { x, y } => (x, y),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"scatter.density"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

fn wire(x: i32, y: i32, tier: Tier) -> EventConfig {
    EventConfig::Wire { x, y, tier }
}

fn named(name: &str) -> SimulationConfig {
    SimulationConfig {
        name: name.to_string(),
        ..SimulationConfig::default()
    }
}

impl ScenarioConfig {
    /// Three medium wires in a straight line.
    pub fn line() -> Self {
        Self {
            simulation: named("line"),
            scatter: None,
            events: (0..3).map(|x| wire(x, 0, Tier::Medium)).collect(),
        }
    }

    /// The line with its middle wire cut, then both ends regenerated.
    pub fn split() -> Self {
        let mut events = Self::line().events;
        events.push(EventConfig::Cut { x: 1, y: 0 });
        events.push(EventConfig::Regenerate { x: 0, y: 0 });
        events.push(EventConfig::Regenerate { x: 2, y: 0 });
        Self {
            simulation: named("split"),
            scatter: None,
            events,
        }
    }

    /// A medium and a high wire side by side, each with a node.
    pub fn tiers() -> Self {
        Self {
            simulation: named("tiers"),
            scatter: None,
            events: vec![
                wire(0, 0, Tier::Medium),
                wire(1, 0, Tier::High),
                EventConfig::Node {
                    x: 0,
                    y: 1,
                    tier: Tier::Medium,
                },
                EventConfig::Node {
                    x: 1,
                    y: 1,
                    tier: Tier::High,
                },
            ],
        }
    }

    /// Two separate two-wire networks joined by a bridging wire.
    pub fn bridge() -> Self {
        Self {
            simulation: named("bridge"),
            scatter: None,
            events: vec![
                wire(0, 0, Tier::High),
                wire(1, 0, Tier::High),
                wire(3, 0, Tier::High),
                wire(4, 0, Tier::High),
                wire(2, 0, Tier::High),
            ],
        }
    }

    /// A seeded random layout with a few cuts afterwards.
    pub fn scatter() -> Self {
        Self {
            simulation: named("scatter"),
            scatter: Some(ScatterConfig::default()),
            events: vec![
                EventConfig::Cut { x: 8, y: 8 },
                EventConfig::Cut { x: 3, y: 12 },
                EventConfig::Regenerate { x: 8, y: 9 },
            ],
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["line", "split", "tiers", "bridge", "scatter"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "line" => Ok(Self::line()),
            "split" => Ok(Self::split()),
            "tiers" => Ok(Self::tiers()),
            "bridge" => Ok(Self::bridge()),
            "scatter" => Ok(Self::scatter()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.simulation.name.trim().is_empty() {
            errors.push(ConfigError {
                field: "simulation.name".into(),
                message: "must not be empty".into(),
            });
        }

        if let Some(sc) = &self.scatter {
            for (field, value) in [("scatter.width", sc.width), ("scatter.height", sc.height)] {
                if value == 0 || value > MAX_SCATTER_EXTENT {
                    errors.push(ConfigError {
                        field: field.into(),
                        message: format!("must be in [1, {MAX_SCATTER_EXTENT}]"),
                    });
                }
            }
            if !(0.0..=1.0).contains(&sc.density) {
                errors.push(ConfigError {
                    field: "scatter.density".into(),
                    message: "must be in [0.0, 1.0]".into(),
                });
            }
            if !(0.0..=1.0).contains(&sc.high_fraction) {
                errors.push(ConfigError {
                    field: "scatter.high_fraction".into(),
                    message: "must be in [0.0, 1.0]".into(),
                });
            }
        }

        if self.scatter.is_none() && self.events.is_empty() {
            errors.push(ConfigError {
                field: "event".into(),
                message: "scenario places nothing: add [[event]] entries or a [scatter] section"
                    .into(),
            });
        }

        errors
    }
}
