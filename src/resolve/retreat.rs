//! Retreat-phase resolution.
//!
//! Retreat orders are validated against the dislodged unit's stored retreat
//! set. Multiple retreats into the same region annihilate all contestants;
//! disbands and missing orders remove the unit. Supply-center ownership
//! updates after Fall retreats.

use crate::board::{Coast, GameState, Order, Power, Region, Season, UnitKind, REGION_COUNT};

use super::{next_turn, update_sc_ownership, Adjudication, OrderStatus, Resolution};

struct RetreatAttempt {
    input: usize,
    dest_region: Region,
    dest_coast: Coast,
    power: Power,
    kind: UnitKind,
}

pub fn resolve_retreat(state: &GameState, orders: &[(Order, Power)]) -> Adjudication {
    let mut statuses: Vec<(OrderStatus, Option<&'static str>)> =
        vec![(OrderStatus::Void, None); orders.len()];
    let mut ordered = [false; REGION_COUNT];
    let mut attempts: Vec<RetreatAttempt> = Vec::new();

    for (i, (order, power)) in orders.iter().enumerate() {
        match order {
            Order::Retreat { unit, dest } => {
                let region = unit.location.region;
                let dislodged = match state.dislodged_at(region) {
                    Some(d) => d,
                    None => {
                        statuses[i] = (OrderStatus::Void, Some("no dislodged unit at region"));
                        continue;
                    }
                };
                if dislodged.power != *power {
                    statuses[i] = (OrderStatus::Void, Some("unit belongs to another power"));
                    continue;
                }
                if ordered[region as usize] {
                    statuses[i] = (OrderStatus::Void, Some("duplicate order for unit"));
                    continue;
                }
                ordered[region as usize] = true;

                if dislodged.kind == UnitKind::Fleet
                    && dest.region.is_bicoastal()
                    && dest.coast == Coast::None
                {
                    statuses[i] = (OrderStatus::Void, Some("coast required"));
                    continue;
                }
                if !dislodged.retreats.iter().any(|r| r.matches(dest)) {
                    statuses[i] = (OrderStatus::Fails, Some("invalid retreat destination"));
                    continue;
                }

                attempts.push(RetreatAttempt {
                    input: i,
                    dest_region: dest.region,
                    dest_coast: dest.coast,
                    power: *power,
                    kind: dislodged.kind,
                });
            }
            Order::Disband { unit } => {
                let region = unit.location.region;
                match state.dislodged_at(region) {
                    Some(d) if d.power == *power => {
                        if ordered[region as usize] {
                            statuses[i] = (OrderStatus::Void, Some("duplicate order for unit"));
                        } else {
                            ordered[region as usize] = true;
                            statuses[i] = (OrderStatus::Succeeds, None);
                        }
                    }
                    Some(_) => {
                        statuses[i] = (OrderStatus::Void, Some("unit belongs to another power"));
                    }
                    None => {
                        statuses[i] = (OrderStatus::Void, Some("no dislodged unit at region"));
                    }
                }
            }
            _ => {
                statuses[i] = (OrderStatus::Void, Some("wrong phase for order"));
            }
        }
    }

    // Standoff detection: two retreats into one region annihilate everyone.
    let mut target_count = [0u8; REGION_COUNT];
    for a in &attempts {
        target_count[a.dest_region as usize] += 1;
    }

    let mut next = state.clone();
    for a in &attempts {
        if target_count[a.dest_region as usize] > 1 {
            statuses[a.input] = (OrderStatus::Bounced, Some("retreat standoff"));
            continue;
        }
        statuses[a.input] = (OrderStatus::Succeeds, None);
        next.units[a.dest_region as usize] = Some((a.power, a.kind));
        if a.dest_coast != Coast::None {
            next.fleet_coast[a.dest_region as usize] = Some(a.dest_coast);
        }
    }

    // Every dislodged unit is now on the board, annihilated, or disbanded.
    next.dislodged.clear();

    if state.turn.season == Season::Fall {
        update_sc_ownership(&mut next);
    }
    next.turn = next_turn(state.turn, false);

    let resolutions = orders
        .iter()
        .zip(statuses)
        .map(|((order, power), (status, reason))| Resolution { order: *order, power: *power, status, reason })
        .collect();

    Adjudication { next, resolutions }
}
