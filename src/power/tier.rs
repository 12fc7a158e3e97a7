use std::fmt;

use serde::{Deserialize, Serialize};

/// Electrical compatibility class of a conductor.
///
/// Only conductors of the same tier may share a power network. The tier is
/// fixed when the conductor is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Low-voltage cabling feeding individual machines.
    Low,
    /// Medium-voltage distribution cabling.
    Medium,
    /// High-voltage transmission cabling.
    High,
}

impl Tier {
    /// All tiers, lowest capacity first.
    pub const ALL: [Tier; 3] = [Tier::Low, Tier::Medium, Tier::High];

    /// Stable lowercase name, matching the config and CSV spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Low => "low",
            Tier::Medium => "medium",
            Tier::High => "high",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
