//! Order adjudication.
//!
//! Resolves all orders issued in the current state's phase and produces the
//! next state. The adjudicator is total: every input state plus every order
//! multiset produces a well-formed next state, and individual order failures
//! become resolution records rather than errors.

pub mod build;
pub mod movement;
pub mod phase;
pub mod retreat;

use crate::board::{GameState, Order, Phase, Power};

pub use phase::{game_winner, next_turn, update_sc_ownership};

/// The outcome of a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Succeeds,
    Fails,
    Void,
    Cut,
    Dislodged,
    Bounced,
}

/// A resolved order: the order as issued, its owner, the outcome, and an
/// optional explanatory reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub order: Order,
    pub power: Power,
    pub status: OrderStatus,
    pub reason: Option<&'static str>,
}

impl Resolution {
    fn new(order: Order, power: Power, status: OrderStatus, reason: Option<&'static str>) -> Self {
        Self { order, power, status, reason }
    }
}

/// The result of adjudicating one phase: the successor state and one
/// resolution per input order (no fabricated entries).
#[derive(Debug, Clone)]
pub struct Adjudication {
    pub next: GameState,
    pub resolutions: Vec<Resolution>,
}

/// Adjudicates the orders for the current state's phase.
pub fn adjudicate(state: &GameState, orders: &[(Order, Power)]) -> Adjudication {
    match state.turn.phase {
        Phase::Movement => movement::resolve_movement(state, orders),
        Phase::Retreat => retreat::resolve_retreat(state, orders),
        Phase::Build => build::resolve_build(state, orders),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Coast, GameState, Phase, Region, Season, UnitKind};

    #[test]
    fn adjudicate_dispatches_on_phase() {
        let mut state = GameState::empty(1901, Season::Spring, Phase::Movement);
        state.place_unit(Region::Vie, Power::Austria, UnitKind::Army, Coast::None);

        let adj = adjudicate(&state, &[]);
        assert_eq!(adj.next.turn.season, Season::Fall);
        assert_eq!(adj.next.turn.phase, Phase::Movement);
        assert!(adj.resolutions.is_empty());
    }
}
