//! Legal-order generation.
//!
//! Produces the per-unit option lists for a power in the current phase. The
//! order sampler picks one order from each list (and the right multiplicity
//! for adjustment orders).

pub mod build;
pub mod movement;
pub mod retreat;

use crate::board::{GameState, Order, Phase, Power};

/// Generates the option lists for a power in the current phase.
///
/// - Movement: one list per unit, covering holds, moves, supports, convoys.
/// - Retreat: one list per dislodged unit (retreats plus disband).
/// - Build: a single list of builds plus waive, or of disband choices;
///   empty when the power needs no adjustment.
pub fn order_options(power: Power, state: &GameState) -> Vec<Vec<Order>> {
    match state.turn.phase {
        Phase::Movement => state
            .unit_regions(power)
            .map(|region| movement::legal_orders(region, state))
            .filter(|opts| !opts.is_empty())
            .collect(),
        Phase::Retreat => state
            .dislodged
            .iter()
            .filter(|d| d.power == power)
            .map(retreat::retreat_options)
            .collect(),
        Phase::Build => {
            let opts = build::legal_adjustments(power, state);
            if opts.is_empty() {
                Vec::new()
            } else {
                vec![opts]
            }
        }
    }
}
