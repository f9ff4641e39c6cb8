//! Monte-Carlo tree search with UCT selection.
//!
//! Nodes live in an arena indexed by `NodeId`; parents are back-references
//! used only for backpropagation walks, so no ownership cycles exist. The
//! tree branches only in movement phases: each movement node carries a
//! queue of pre-sampled coalition joint actions, while retreat and build
//! nodes pass through a single auto-sampled child. Rollouts play random
//! coherent orders for every power to a bounded depth and return the
//! normalized coalition fitness.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::{GameState, Order, Phase, Power, Turn, ALL_POWERS};
use crate::eval::{fitness, Coalition, Fitness, Priority};
use crate::resolve::adjudicate;

use super::sampler::{sample_orders, with_owners};
use super::ttable::{TranspositionTable, TtEntry};

/// UCT exploration constant.
const UCT_C: f64 = std::f64::consts::SQRT_2;

/// Joint actions pre-sampled per movement node.
pub const SAMPLES_PER_NODE: usize = 30;

/// Denominator normalizing composite scores into [0, 1]: every supply
/// center and every unit on the board.
const SCORE_CEILING: f64 = (34 * 1000 + 34) as f64;

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    const NONE: NodeId = NodeId(u32::MAX);

    fn index(self) -> usize {
        self.0 as usize
    }
}

struct Node {
    state: GameState,
    hash: u64,
    parent: NodeId,
    children: Vec<NodeId>,
    /// Orders that produced this state from its parent.
    coalition_orders: Vec<Order>,
    opponent_orders: Vec<Order>,
    visits: u64,
    value: f64,
    value_sq: f64,
    /// Un-expanded sampled joint actions (movement nodes only).
    untried: VecDeque<Vec<Order>>,
    terminal: bool,
    depth: u32,
}

/// One candidate produced by a finished (or cancelled) search, still in
/// order form; the report layer stringifies it.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub coalition_orders: Vec<Order>,
    pub opponent_orders: Vec<Order>,
    pub expected_value: f64,
    pub stdev: f64,
    pub visits: u64,
    pub immediate: Fitness,
    pub predicted: Vec<PredictedStep>,
}

/// One movement turn along a candidate's most-visited line.
#[derive(Debug, Clone)]
pub struct PredictedStep {
    pub turn: Turn,
    pub state: GameState,
    pub coalition_orders: Vec<Order>,
    pub opponent_orders: Vec<Order>,
}

/// A worker's finished search: ranked candidates plus its table.
#[derive(Debug)]
pub struct SearchOutcome {
    pub candidates: Vec<Candidate>,
    pub table: TranspositionTable,
    pub simulations: u64,
}

pub struct Mcts {
    arena: Vec<Node>,
    coalition: Coalition,
    priorities: Vec<Priority>,
    opponents: Vec<Power>,
    rng: SmallRng,
    table: TranspositionTable,
    max_depth: u32,
    simulations: u64,
}

impl Mcts {
    pub fn new(
        state: GameState,
        coalition: Coalition,
        priorities: Vec<Priority>,
        max_depth: u32,
        seed: u64,
    ) -> Self {
        let opponents: Vec<Power> = ALL_POWERS
            .iter()
            .copied()
            .filter(|p| !coalition.contains(*p))
            .collect();

        let mut mcts = Mcts {
            arena: Vec::with_capacity(1024),
            coalition,
            priorities,
            opponents,
            rng: SmallRng::seed_from_u64(seed),
            table: TranspositionTable::new(),
            max_depth,
            simulations: 0,
        };

        let root = mcts.make_node(state, NodeId::NONE, Vec::new(), Vec::new(), 0);
        debug_assert_eq!(root, NodeId(0));
        mcts
    }

    /// Runs iterations until the deadline passes or the cancellation flag
    /// fires, both checked at iteration boundaries.
    pub fn run(&mut self, deadline: Instant, cancel: &Arc<AtomicBool>) {
        loop {
            if Instant::now() >= deadline || cancel.load(Ordering::Relaxed) {
                break;
            }
            self.iterate();
        }
    }

    /// Runs exactly `n` iterations; used by tests and benches.
    pub fn run_iterations(&mut self, n: u64) {
        for _ in 0..n {
            self.iterate();
        }
    }

    fn make_node(
        &mut self,
        state: GameState,
        parent: NodeId,
        coalition_orders: Vec<Order>,
        opponent_orders: Vec<Order>,
        depth: u32,
    ) -> NodeId {
        let hash = state.zobrist();
        let f = fitness(&state, &self.coalition, &self.priorities);
        let terminal = f.win || f.lost;

        let untried = if !terminal && state.turn.phase == Phase::Movement {
            (0..SAMPLES_PER_NODE)
                .map(|_| sample_orders(&state, &self.coalition.powers, &mut self.rng))
                .collect()
        } else {
            VecDeque::new()
        };

        let id = NodeId(self.arena.len() as u32);
        self.arena.push(Node {
            state,
            hash,
            parent,
            children: Vec::new(),
            coalition_orders,
            opponent_orders,
            visits: 0,
            value: 0.0,
            value_sq: 0.0,
            untried,
            terminal,
            depth,
        });
        id
    }

    fn iterate(&mut self) {
        let leaf = self.select();
        let node = &self.arena[leaf.index()];

        let evaluated = if node.terminal {
            leaf
        } else {
            self.expand(leaf)
        };

        let value = if self.arena[evaluated.index()].terminal {
            self.terminal_value(evaluated)
        } else {
            self.rollout(evaluated)
        };
        self.backpropagate(evaluated, value);
        self.simulations += 1;
    }

    /// Descends from the root by UCT until reaching a terminal node, a
    /// movement node with un-expanded samples, or a pass-through node whose
    /// single child has not been created yet.
    fn select(&self) -> NodeId {
        let mut id = NodeId(0);
        loop {
            let node = &self.arena[id.index()];
            if node.terminal {
                return id;
            }
            match node.state.turn.phase {
                Phase::Movement => {
                    if !node.untried.is_empty() || node.children.is_empty() {
                        return id;
                    }
                    id = self.best_uct_child(id);
                }
                Phase::Retreat | Phase::Build => {
                    match node.children.first() {
                        Some(child) => id = *child,
                        None => return id,
                    }
                }
            }
        }
    }

    fn best_uct_child(&self, id: NodeId) -> NodeId {
        let node = &self.arena[id.index()];
        let parent_visits = node.visits.max(1) as f64;
        let ln_parent = parent_visits.ln();

        let mut best = node.children[0];
        let mut best_score = f64::NEG_INFINITY;
        for &child_id in &node.children {
            let child = &self.arena[child_id.index()];
            if child.visits == 0 {
                return child_id;
            }
            let visits = child.visits as f64;
            let exploit = child.value / visits;
            let explore = UCT_C * (ln_parent / visits).sqrt();
            let score = exploit + explore;
            if score > best_score {
                best_score = score;
                best = child_id;
            }
        }
        best
    }

    /// Creates one child below the given node.
    ///
    /// Movement nodes consume a pre-sampled coalition joint action and
    /// compose it with freshly sampled opponent actions; retreat and build
    /// nodes auto-sample every power and cache a single child.
    fn expand(&mut self, id: NodeId) -> NodeId {
        let phase = self.arena[id.index()].state.turn.phase;
        let depth = self.arena[id.index()].depth;

        let (coalition_orders, opponent_orders) = match phase {
            Phase::Movement => {
                let Some(coalition_orders) = self.arena[id.index()].untried.pop_front() else {
                    return id;
                };
                let state = self.arena[id.index()].state.clone();
                let mut opponent_orders = Vec::new();
                for p in self.opponents.clone() {
                    opponent_orders.extend(sample_orders(&state, &[p], &mut self.rng));
                }
                (coalition_orders, opponent_orders)
            }
            Phase::Retreat | Phase::Build => {
                if let Some(child) = self.arena[id.index()].children.first() {
                    return *child;
                }
                let state = self.arena[id.index()].state.clone();
                let coalition_orders =
                    sample_orders(&state, &self.coalition.powers, &mut self.rng);
                let mut opponent_orders = Vec::new();
                for p in self.opponents.clone() {
                    opponent_orders.extend(sample_orders(&state, &[p], &mut self.rng));
                }
                (coalition_orders, opponent_orders)
            }
        };

        let state = &self.arena[id.index()].state;
        let mut owned = with_owners(state, &coalition_orders);
        owned.extend(with_owners(state, &opponent_orders));
        let next = adjudicate(state, &owned).next;

        let child = self.make_node(next, id, coalition_orders, opponent_orders, depth + 1);
        self.arena[id.index()].children.push(child);
        child
    }

    /// Plays random coherent orders for every power from the node's state,
    /// up to `max_depth` movement steps, and returns the normalized
    /// coalition fitness of the final state.
    fn rollout(&mut self, id: NodeId) -> f64 {
        let mut state = self.arena[id.index()].state.clone();
        let mut steps = 0u32;

        loop {
            let f = fitness(&state, &self.coalition, &self.priorities);
            if f.win {
                return 1.0;
            }
            if f.lost {
                return 0.0;
            }
            if steps >= self.max_depth {
                return (f.score as f64 / SCORE_CEILING).clamp(0.0, 1.0);
            }

            let counts_as_step = state.turn.phase == Phase::Movement;
            let mut orders = sample_orders(&state, &self.coalition.powers, &mut self.rng);
            for p in self.opponents.clone() {
                orders.extend(sample_orders(&state, &[p], &mut self.rng));
            }
            let owned = with_owners(&state, &orders);
            state = adjudicate(&state, &owned).next;
            if counts_as_step {
                steps += 1;
            }
        }
    }

    fn terminal_value(&self, id: NodeId) -> f64 {
        let node = &self.arena[id.index()];
        let f = fitness(&node.state, &self.coalition, &self.priorities);
        if f.win {
            1.0
        } else {
            0.0
        }
    }

    fn backpropagate(&mut self, from: NodeId, value: f64) {
        let mut id = from;
        while id != NodeId::NONE {
            let node = &mut self.arena[id.index()];
            node.visits += 1;
            node.value += value;
            node.value_sq += value * value;
            self.table.put(
                node.hash,
                TtEntry { depth: node.depth, visits: node.visits, value: node.value },
            );
            id = node.parent;
        }
    }

    pub fn simulations(&self) -> u64 {
        self.simulations
    }

    /// Extracts the ranked result: visited root children ordered by mean
    /// value, top three, each with its most-visited predicted line.
    pub fn outcome(self) -> SearchOutcome {
        let root = &self.arena[0];
        let mut ranked: Vec<NodeId> = root
            .children
            .iter()
            .copied()
            .filter(|c| self.arena[c.index()].visits > 0)
            .collect();
        ranked.sort_by(|a, b| {
            let ma = self.mean(*a);
            let mb = self.mean(*b);
            mb.partial_cmp(&ma).unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(3);

        let candidates = ranked.iter().map(|id| self.candidate(*id)).collect();

        SearchOutcome {
            candidates,
            table: self.table,
            simulations: self.simulations,
        }
    }

    fn mean(&self, id: NodeId) -> f64 {
        let node = &self.arena[id.index()];
        if node.visits == 0 {
            0.0
        } else {
            node.value / node.visits as f64
        }
    }

    fn candidate(&self, id: NodeId) -> Candidate {
        let node = &self.arena[id.index()];
        let visits = node.visits;
        let mean = self.mean(id);
        let variance = (node.value_sq / visits.max(1) as f64 - mean * mean).max(0.0);

        Candidate {
            coalition_orders: node.coalition_orders.clone(),
            opponent_orders: node.opponent_orders.clone(),
            expected_value: mean,
            stdev: variance.sqrt(),
            visits,
            immediate: fitness(&node.state, &self.coalition, &self.priorities),
            predicted: self.predicted_line(id),
        }
    }

    /// Follows the most-visited child chain from a root child, emitting one
    /// entry per movement transition along the path.
    fn predicted_line(&self, from: NodeId) -> Vec<PredictedStep> {
        let mut steps = Vec::new();
        let mut id = from;

        loop {
            let node = &self.arena[id.index()];
            let parent = node.parent;
            if parent != NodeId::NONE {
                let parent_node = &self.arena[parent.index()];
                if parent_node.state.turn.phase == Phase::Movement {
                    steps.push(PredictedStep {
                        turn: parent_node.state.turn,
                        state: node.state.clone(),
                        coalition_orders: node.coalition_orders.clone(),
                        opponent_orders: node.opponent_orders.clone(),
                    });
                }
            }

            let next = node
                .children
                .iter()
                .copied()
                .max_by_key(|c| self.arena[c.index()].visits);
            match next {
                Some(child) if self.arena[child.index()].visits > 0 => id = child,
                _ => break,
            }
        }

        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Coast, Region, Season, UnitKind};

    fn small_state() -> GameState {
        let mut state = GameState::empty(1901, Season::Spring, Phase::Movement);
        state.place_unit(Region::Vie, Power::Austria, UnitKind::Army, Coast::None);
        state.place_unit(Region::Bud, Power::Austria, UnitKind::Army, Coast::None);
        state.place_unit(Region::War, Power::Russia, UnitKind::Army, Coast::None);
        state.set_sc_owner(Region::Vie, Some(Power::Austria));
        state.set_sc_owner(Region::Bud, Some(Power::Austria));
        state.set_sc_owner(Region::War, Some(Power::Russia));
        state
    }

    fn search(seed: u64, iterations: u64) -> SearchOutcome {
        let mut mcts = Mcts::new(small_state(), Coalition::solo(Power::Austria), Vec::new(), 2, seed);
        mcts.run_iterations(iterations);
        mcts.outcome()
    }

    #[test]
    fn search_produces_ranked_candidates() {
        let outcome = search(7, 60);
        assert_eq!(outcome.simulations, 60);
        assert!(!outcome.candidates.is_empty());
        assert!(outcome.candidates.len() <= 3);
        for c in &outcome.candidates {
            assert_eq!(c.coalition_orders.len(), 2);
            assert!(c.expected_value >= 0.0 && c.expected_value <= 1.0);
            assert!(c.visits > 0);
        }
        // Ranked descending by expected value.
        for pair in outcome.candidates.windows(2) {
            assert!(pair[0].expected_value >= pair[1].expected_value);
        }
    }

    #[test]
    fn search_is_deterministic_for_a_seed() {
        let a = search(1234, 40);
        let b = search(1234, 40);
        assert_eq!(a.candidates.len(), b.candidates.len());
        for (x, y) in a.candidates.iter().zip(&b.candidates) {
            assert_eq!(x.coalition_orders, y.coalition_orders);
            assert_eq!(x.visits, y.visits);
            assert!((x.expected_value - y.expected_value).abs() < 1e-12);
        }
    }

    #[test]
    fn table_collects_statistics() {
        let mut mcts =
            Mcts::new(small_state(), Coalition::solo(Power::Austria), Vec::new(), 2, 5);
        mcts.run_iterations(30);
        let outcome = mcts.outcome();
        assert!(!outcome.table.is_empty());
    }

    #[test]
    fn terminal_root_yields_no_expansion_panic() {
        // Austria has won outright: every node is terminal.
        let mut state = small_state();
        let centers: Vec<Region> = crate::board::ALL_REGIONS
            .iter()
            .copied()
            .filter(|r| r.is_supply_center())
            .take(18)
            .collect();
        for sc in centers {
            state.set_sc_owner(sc, Some(Power::Austria));
        }

        let mut mcts = Mcts::new(state, Coalition::solo(Power::Austria), Vec::new(), 2, 5);
        mcts.run_iterations(10);
        let outcome = mcts.outcome();
        // Terminal root: nothing to rank, but the search must not wedge.
        assert!(outcome.candidates.is_empty());
        assert_eq!(outcome.simulations, 10);
    }

    #[test]
    fn deadline_stops_the_loop() {
        let mut mcts =
            Mcts::new(small_state(), Coalition::solo(Power::Austria), Vec::new(), 2, 5);
        let cancel = Arc::new(AtomicBool::new(false));
        mcts.run(Instant::now(), &cancel);
        assert_eq!(mcts.simulations(), 0);
    }

    #[test]
    fn cancellation_stops_the_loop() {
        let mut mcts =
            Mcts::new(small_state(), Coalition::solo(Power::Austria), Vec::new(), 2, 5);
        let cancel = Arc::new(AtomicBool::new(true));
        mcts.run(Instant::now() + std::time::Duration::from_secs(60), &cancel);
        assert_eq!(mcts.simulations(), 0);
    }

    #[test]
    fn predicted_line_reports_movement_turns() {
        let outcome = search(42, 200);
        let top = &outcome.candidates[0];
        assert!(!top.predicted.is_empty());
        assert_eq!(top.predicted[0].turn.season, Season::Spring);
        assert_eq!(top.predicted[0].coalition_orders, top.coalition_orders);
    }
}
