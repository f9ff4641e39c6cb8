//! Parallel search coordination.
//!
//! Fans the search out across independent workers, each with its own tree,
//! PRNG, and transposition table, then merges their statistics. Workers
//! share nothing mutable: each receives value copies of the state and
//! configuration and reports back over a channel. The merge is associative
//! and commutative, so the final ranking does not depend on worker
//! completion order.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::AtomicBool;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::board::GameState;
use crate::eval::{Coalition, Fitness, Priority};
use crate::protocol::notation::{fingerprint, format_orders};

use super::report::{AnalysisReport, Confidence, PredictedTurn, RankedMove, StateSnapshot};
use super::tree::{Candidate, Mcts, SearchOutcome};
use super::ttable::TranspositionTable;

/// Seed offset between workers; keeps their order streams disjoint.
pub const WORKER_SEED_STRIDE: u64 = 7919;

/// Progress callback: receives the cumulative simulation count as worker
/// results arrive.
pub type ProgressFn = Arc<dyn Fn(u64) + Send + Sync>;

/// Configuration for one analysis run.
#[derive(Clone)]
pub struct AnalysisOptions {
    pub max_depth: u32,
    pub threads: usize,
    pub seed: u64,
    pub search_time: Duration,
    pub cancel: Arc<AtomicBool>,
    pub progress: Option<ProgressFn>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            max_depth: 4,
            threads: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            seed: 0,
            search_time: Duration::from_secs(60),
            cancel: Arc::new(AtomicBool::new(false)),
            progress: None,
        }
    }
}

/// Runs the full analysis: fan out, search, merge, rank.
pub fn analyze(
    state: &GameState,
    coalition: &Coalition,
    priorities: &[Priority],
    options: &AnalysisOptions,
) -> AnalysisReport {
    let start = Instant::now();
    let deadline = start + options.search_time;

    let outcomes = if options.threads <= 1 {
        let mut mcts = Mcts::new(
            state.clone(),
            coalition.clone(),
            priorities.to_vec(),
            options.max_depth,
            options.seed,
        );
        mcts.run(deadline, &options.cancel);
        report_progress(options, mcts.simulations());
        vec![mcts.outcome()]
    } else {
        run_workers(state, coalition, priorities, options, deadline)
    };

    let mut report = merge_outcomes(coalition, outcomes);
    report.elapsed_ms = start.elapsed().as_millis() as u64;
    report
}

fn report_progress(options: &AnalysisOptions, simulations: u64) {
    if let Some(progress) = &options.progress {
        progress(simulations);
    }
}

fn run_workers(
    state: &GameState,
    coalition: &Coalition,
    priorities: &[Priority],
    options: &AnalysisOptions,
    deadline: Instant,
) -> Vec<SearchOutcome> {
    let pool = match rayon::ThreadPoolBuilder::new().num_threads(options.threads).build() {
        Ok(pool) => pool,
        Err(e) => {
            warn!("failed to build worker pool ({e}); searching single-threaded");
            let mut mcts = Mcts::new(
                state.clone(),
                coalition.clone(),
                priorities.to_vec(),
                options.max_depth,
                options.seed,
            );
            mcts.run(deadline, &options.cancel);
            return vec![mcts.outcome()];
        }
    };

    let (tx, rx) = mpsc::channel::<(usize, std::thread::Result<SearchOutcome>)>();

    for worker in 0..options.threads {
        let tx = tx.clone();
        let state = state.clone();
        let coalition = coalition.clone();
        let priorities = priorities.to_vec();
        let cancel = Arc::clone(&options.cancel);
        let max_depth = options.max_depth;
        let seed = options.seed + worker as u64 * WORKER_SEED_STRIDE;

        pool.spawn(move || {
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                let mut mcts = Mcts::new(state, coalition, priorities, max_depth, seed);
                mcts.run(deadline, &cancel);
                mcts.outcome()
            }));
            // The receiver may be gone if the coordinator already bailed.
            let _ = tx.send((worker, outcome));
        });
    }
    drop(tx);

    let mut outcomes = Vec::with_capacity(options.threads);
    let mut cumulative = 0u64;
    for (worker, result) in rx {
        match result {
            Ok(outcome) => {
                cumulative += outcome.simulations;
                report_progress(options, cumulative);
                outcomes.push(outcome);
            }
            Err(_) => {
                warn!("search worker {worker} failed; discarding its results");
            }
        }
    }
    outcomes
}

struct MergedCandidate {
    first: Candidate,
    visits: u64,
    weighted_value: f64,
    stdev_sum: f64,
    sources: u32,
    best_immediate: Fitness,
}

fn merge_outcomes(coalition: &Coalition, outcomes: Vec<SearchOutcome>) -> AnalysisReport {
    let mut table = TranspositionTable::new();
    let mut total_simulations = 0u64;
    let mut grouped: HashMap<String, MergedCandidate> = HashMap::new();

    for outcome in outcomes {
        total_simulations += outcome.simulations;
        table.merge_entries(outcome.table.into_entries());

        for candidate in outcome.candidates {
            let key = fingerprint(&candidate.coalition_orders);
            match grouped.get_mut(&key) {
                Some(merged) => {
                    merged.visits += candidate.visits;
                    merged.weighted_value +=
                        candidate.expected_value * candidate.visits as f64;
                    merged.stdev_sum += candidate.stdev;
                    merged.sources += 1;
                    if candidate.immediate.score > merged.best_immediate.score {
                        merged.best_immediate = candidate.immediate;
                    }
                }
                None => {
                    grouped.insert(
                        key,
                        MergedCandidate {
                            visits: candidate.visits,
                            weighted_value: candidate.expected_value
                                * candidate.visits as f64,
                            stdev_sum: candidate.stdev,
                            sources: 1,
                            best_immediate: candidate.immediate,
                            first: candidate,
                        },
                    );
                }
            }
        }
    }

    debug!(entries = table.len(), "merged worker transposition tables");

    let mut merged: Vec<(String, MergedCandidate)> = grouped.into_iter().collect();
    merged.sort_by(|(fa, a), (fb, b)| {
        let ea = a.weighted_value / a.visits.max(1) as f64;
        let eb = b.weighted_value / b.visits.max(1) as f64;
        eb.partial_cmp(&ea)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| fa.cmp(fb))
    });
    merged.truncate(3);

    let ranked = merged
        .into_iter()
        .enumerate()
        .map(|(i, (key, m))| {
            let expected_value = m.weighted_value / m.visits.max(1) as f64;
            let stdev = m.stdev_sum / m.sources.max(1) as f64;
            RankedMove {
                rank: i + 1,
                coalition_orders: format_orders(&m.first.coalition_orders),
                opponent_orders: format_orders(&m.first.opponent_orders),
                predicted_turns: m
                    .first
                    .predicted
                    .iter()
                    .map(|step| PredictedTurn {
                        year: step.turn.year,
                        season: step.turn.season.name(),
                        phase: step.turn.phase.name(),
                        snapshot: StateSnapshot::of(&step.state),
                        coalition_orders: format_orders(&step.coalition_orders),
                        opponent_orders: format_orders(&step.opponent_orders),
                    })
                    .collect(),
                fitness: m.best_immediate,
                raw_score: m.best_immediate.score,
                expected_value,
                confidence: Confidence::label(m.visits, stdev),
                fingerprint: key,
            }
        })
        .collect();

    AnalysisReport {
        coalition: coalition.name.clone(),
        ranked,
        total_simulations,
        elapsed_ms: 0,
    }
}
