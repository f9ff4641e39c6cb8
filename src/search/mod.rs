//! Search: joint-action sampling, MCTS, transposition table, and the
//! parallel coordinator.

pub mod coordinator;
pub mod report;
pub mod sampler;
pub mod tree;
pub mod ttable;

pub use coordinator::{analyze, AnalysisOptions, ProgressFn, WORKER_SEED_STRIDE};
pub use report::{AnalysisReport, Confidence, ConfidenceLevel, PredictedTurn, RankedMove};
pub use sampler::{sample_orders, with_owners};
pub use tree::{Candidate, Mcts, SearchOutcome, SAMPLES_PER_NODE};
pub use ttable::{TranspositionTable, TtEntry, DEFAULT_CAPACITY};
