//! Ranked-recommendation output types.
//!
//! The shapes handed to the front end: ranked candidates with expected
//! value, immediate fitness, confidence annotations, and the predicted-turn
//! trail, plus the global search totals. All serializable for machine
//! consumption.

use serde::Serialize;

use crate::board::GameState;
use crate::eval::Fitness;
use crate::protocol::notation::describe_unit;

/// Confidence tier derived from visit count and value spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

/// Confidence annotation for one ranked candidate.
#[derive(Debug, Clone, Serialize)]
pub struct Confidence {
    pub level: ConfidenceLevel,
    pub visits: u64,
    pub stdev: f64,
}

impl Confidence {
    /// High needs both a deep visit count and a tight value spread; medium
    /// needs either; everything else is low.
    pub fn label(visits: u64, stdev: f64) -> Self {
        let level = if visits > 1000 && stdev < 0.15 {
            ConfidenceLevel::High
        } else if visits > 500 || stdev < 0.25 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        };
        Confidence { level, visits, stdev }
    }
}

/// A compact, human-readable snapshot of a state.
#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    pub year: u16,
    pub season: &'static str,
    pub phase: &'static str,
    pub units: Vec<String>,
}

impl StateSnapshot {
    pub fn of(state: &GameState) -> Self {
        let units = state
            .all_units()
            .map(|u| describe_unit(u.power, u.kind, u.region, u.coast))
            .collect();
        StateSnapshot {
            year: state.turn.year,
            season: state.turn.season.name(),
            phase: state.turn.phase.name(),
            units,
        }
    }
}

/// One step of the most-visited line following a ranked candidate.
#[derive(Debug, Clone, Serialize)]
pub struct PredictedTurn {
    pub year: u16,
    pub season: &'static str,
    pub phase: &'static str,
    pub snapshot: StateSnapshot,
    pub coalition_orders: Vec<String>,
    pub opponent_orders: Vec<String>,
}

/// One ranked candidate order set.
#[derive(Debug, Clone, Serialize)]
pub struct RankedMove {
    pub rank: usize,
    pub coalition_orders: Vec<String>,
    pub opponent_orders: Vec<String>,
    pub predicted_turns: Vec<PredictedTurn>,
    pub fitness: Fitness,
    pub raw_score: i64,
    pub expected_value: f64,
    pub confidence: Confidence,
    /// Canonical order fingerprint, used to merge candidates across
    /// workers.
    #[serde(skip)]
    pub fingerprint: String,
}

/// The complete analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub coalition: String,
    pub ranked: Vec<RankedMove>,
    pub total_simulations: u64,
    pub elapsed_ms: u64,
}
