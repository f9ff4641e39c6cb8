//! Retreat-phase order generation.
//!
//! The legal retreat set for each dislodged unit was computed by the
//! movement adjudicator (it excludes the attacker's origin, this turn's
//! bounce sites, and occupied regions); generation here is one retreat
//! order per stored destination plus a disband.

use crate::board::{DislodgedUnit, GameState, Location, Order, OrderUnit, Region};

/// Generates all legal retreat-phase orders for the dislodged unit at the
/// given region. Returns an empty vec if no dislodged unit exists there.
pub fn legal_retreats(region: Region, state: &GameState) -> Vec<Order> {
    match state.dislodged_at(region) {
        Some(d) => retreat_options(d),
        None => Vec::new(),
    }
}

/// Generates the option list for one dislodged unit: a retreat per legal
/// destination, then a disband (always legal).
pub fn retreat_options(dislodged: &DislodgedUnit) -> Vec<Order> {
    let unit = OrderUnit::new(
        dislodged.kind,
        Location::with_coast(dislodged.region, dislodged.coast),
    );

    let mut orders: Vec<Order> = dislodged
        .retreats
        .iter()
        .map(|dest| Order::Retreat { unit, dest: *dest })
        .collect();

    orders.push(Order::Disband { unit });
    orders
}
