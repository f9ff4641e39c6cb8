//! Position evaluation for coalitions.

pub mod fitness;

use crate::board::Power;

pub use fitness::{
    fitness, region_threat, Fitness, Priority, PriorityAction, WinKind, CENTER_WEIGHT,
    PRIORITY_WEIGHT, WIN_SCORE,
};

/// An ordered, non-empty set of powers whose combined fitness is optimized,
/// with a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coalition {
    pub name: String,
    pub powers: Vec<Power>,
}

impl Coalition {
    pub fn new(name: impl Into<String>, powers: Vec<Power>) -> Self {
        Self { name: name.into(), powers }
    }

    /// Single-power coalition named after the power.
    pub fn solo(power: Power) -> Self {
        Self { name: power.name().to_string(), powers: vec![power] }
    }

    pub fn contains(&self, power: Power) -> bool {
        self.powers.contains(&power)
    }
}
