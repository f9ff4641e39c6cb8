//! Coherent joint-action sampling.
//!
//! The exact joint order space across seven powers is astronomically large,
//! so search expands over sampled joint actions instead. A sample is built
//! in two passes: a soft-max draw over scored Move/Hold options per unit,
//! then a coordination pass that upgrades units to supports and convoys
//! referencing the decisions actually taken in the first pass. The result
//! is one order per unit in which every support and convoy points at a real
//! teammate action.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::board::{
    GameState, Order, Phase, Power, Region, UnitKind, ALL_REGIONS,
};
use crate::eval::region_threat;
use crate::movegen::{build, movement, retreat};

/// Strong penalty that deterministically filters same-group collisions.
const COLLISION_PENALTY: f32 = -15.0;
/// Smaller penalty for stepping onto a partner's supply center.
const PARTNER_CENTER_PENALTY: f32 = -4.0;

/// Samples one coherent joint action for the given powers in the current
/// phase. Orders come out one per unit, in region order.
pub fn sample_orders(state: &GameState, powers: &[Power], rng: &mut SmallRng) -> Vec<Order> {
    match state.turn.phase {
        Phase::Movement => sample_movement(state, powers, rng),
        Phase::Retreat => sample_retreats(state, powers, rng),
        Phase::Build => sample_adjustments(state, powers, rng),
    }
}

/// Pairs each sampled order with its issuing power.
pub fn with_owners(state: &GameState, orders: &[Order]) -> Vec<(Order, Power)> {
    orders
        .iter()
        .filter_map(|order| match order {
            Order::Build { power, .. } | Order::Waive { power } => Some((*order, *power)),
            _ => {
                let region = order.unit_region()?;
                let power = state
                    .unit_at(region)
                    .map(|(p, _)| p)
                    .or_else(|| state.dislodged_at(region).map(|d| d.power))?;
                Some((*order, power))
            }
        })
        .collect()
}

/// One unit's sampling record across the two passes.
struct Pick {
    region: Region,
    order: Order,
    score: f32,
    /// Another unit's support or convoy references this unit's move.
    move_locked: bool,
    /// This unit upgraded to a support/convoy; later units must not
    /// support-hold it.
    unsupportable: bool,
}

fn sample_movement(state: &GameState, powers: &[Power], rng: &mut SmallRng) -> Vec<Order> {
    // Units of the sampled group, in region order.
    let unit_regions: Vec<Region> = ALL_REGIONS
        .iter()
        .copied()
        .filter(|r| matches!(state.unit_at(*r), Some((p, _)) if powers.contains(&p)))
        .collect();

    // Pass 1: primary Move/Hold decisions.
    let mut picks: Vec<Pick> = Vec::with_capacity(unit_regions.len());
    let mut claimed: Vec<Region> = Vec::with_capacity(unit_regions.len());

    for &region in &unit_regions {
        let legal = movement::legal_orders(region, state);
        let primary: Vec<&Order> = legal
            .iter()
            .filter(|o| matches!(o, Order::Hold { .. } | Order::Move { .. }))
            .collect();

        let scores: Vec<f32> = primary
            .iter()
            .map(|o| score_primary(o, powers, state, &claimed))
            .collect();
        let chosen = softmax_pick(&scores, rng);

        let order = *primary[chosen];
        match order {
            Order::Move { dest, .. } => claimed.push(dest.region),
            _ => claimed.push(region),
        }
        picks.push(Pick {
            region,
            order,
            score: scores[chosen],
            move_locked: false,
            unsupportable: false,
        });
    }

    // Pass 1b: demote one leg of any A->B / B->A swap, which would
    // necessarily bounce unless a leg is convoyed.
    for i in 0..picks.len() {
        for j in (i + 1)..picks.len() {
            let (a_dest, a_convoy) = match picks[i].order {
                Order::Move { dest, via_convoy, .. } => (dest.region, via_convoy),
                _ => continue,
            };
            let (b_dest, b_convoy) = match picks[j].order {
                Order::Move { dest, via_convoy, .. } => (dest.region, via_convoy),
                _ => continue,
            };
            if a_dest != picks[j].region || b_dest != picks[i].region || a_convoy || b_convoy {
                continue;
            }
            let loser = if picks[i].score <= picks[j].score { i } else { j };
            let unit = picks[loser].order.unit().expect("move order has a unit");
            picks[loser].order = Order::Hold { unit };
        }
    }

    // Pass 2: coordination upgrades.
    for i in 0..picks.len() {
        if picks[i].move_locked {
            continue;
        }
        let legal = movement::legal_orders(picks[i].region, state);

        // Candidate supports/convoys that reference a real teammate
        // decision from pass 1, with the index of the referenced unit.
        let mut candidates: Vec<(Order, f32, Option<usize>)> = Vec::new();
        for o in &legal {
            match o {
                Order::SupportHold { supported, .. } => {
                    let target = supported.location.region;
                    let Some(t) = picks.iter().position(|p| p.region == target) else {
                        continue;
                    };
                    if picks[t].unsupportable || !picks[t].order.is_stationary() {
                        continue;
                    }
                    let score = score_support_hold(target, powers, state);
                    candidates.push((*o, score, None));
                }
                Order::SupportMove { supported, dest, .. } => {
                    let src = supported.location.region;
                    let Some(t) = picks.iter().position(|p| p.region == src) else {
                        continue;
                    };
                    let matches_move = matches!(
                        picks[t].order,
                        Order::Move { dest: d, .. } if d.region == dest.region
                    );
                    if !matches_move {
                        continue;
                    }
                    let score = score_support_move(dest.region, powers, state);
                    candidates.push((*o, score, Some(t)));
                }
                Order::Convoy { army, dest, .. } => {
                    let Some(t) = picks.iter().position(|p| p.region == army.region) else {
                        continue;
                    };
                    let matches_move = matches!(
                        picks[t].order,
                        Order::Move { dest: d, via_convoy: true, .. } if d.region == dest.region
                    );
                    if !matches_move {
                        continue;
                    }
                    candidates.push((*o, 2.0, Some(t)));
                }
                _ => {}
            }
        }

        if candidates.is_empty() {
            continue;
        }

        let mut scores = vec![picks[i].score];
        scores.extend(candidates.iter().map(|(_, s, _)| *s));
        let chosen = softmax_pick(&scores, rng);
        if chosen == 0 {
            continue;
        }

        let (order, _, referenced) = candidates[chosen - 1];
        picks[i].order = order;
        picks[i].unsupportable = true;
        if let Some(t) = referenced {
            picks[t].move_locked = true;
        }
    }

    picks.into_iter().map(|p| p.order).collect()
}

/// Scores a primary Move/Hold option.
///
/// Capturing an enemy supply center beats entering an unowned one, which
/// beats plain movement, which beats sitting on a held center; collisions
/// with an earlier teammate choice are pushed far down.
fn score_primary(order: &Order, powers: &[Power], state: &GameState, claimed: &[Region]) -> f32 {
    match order {
        Order::Move { dest, .. } => {
            let dest = dest.region;
            let mut score = if dest.is_supply_center() {
                match state.sc_owner[dest as usize] {
                    Some(owner) if !powers.contains(&owner) => 5.0,
                    None => 4.0,
                    Some(owner) => {
                        let own_region = order.unit_region().and_then(|r| state.unit_at(r));
                        let self_power = own_region.map(|(p, _)| p);
                        if self_power == Some(owner) {
                            1.0
                        } else {
                            1.0 + PARTNER_CENTER_PENALTY
                        }
                    }
                }
            } else {
                1.0
            };
            if claimed.contains(&dest) {
                score += COLLISION_PENALTY;
            }
            score
        }
        Order::Hold { unit } => {
            let region = unit.location.region;
            let held_center = region.is_supply_center()
                && matches!(state.sc_owner[region as usize], Some(p) if powers.contains(&p));
            if held_center {
                0.5
            } else {
                -1.0
            }
        }
        _ => f32::NEG_INFINITY,
    }
}

/// Support-hold value: high when the supported region is a threatened
/// coalition center, moderate when merely threatened, negligible otherwise.
fn score_support_hold(target: Region, powers: &[Power], state: &GameState) -> f32 {
    let threatened = region_threat(target, powers, state) > 0;
    let own_center = target.is_supply_center()
        && matches!(state.sc_owner[target as usize], Some(p) if powers.contains(&p));
    if threatened && own_center {
        5.0
    } else if threatened {
        2.0
    } else {
        -8.0
    }
}

/// Support-move value: breaking into an enemy center is the best use of a
/// turn; backing an attack on any enemy unit comes next.
fn score_support_move(dest: Region, powers: &[Power], state: &GameState) -> f32 {
    let enemy_center = dest.is_supply_center()
        && matches!(state.sc_owner[dest as usize], Some(p) if !powers.contains(&p));
    if enemy_center {
        return 6.0;
    }
    if matches!(state.unit_at(dest), Some((p, _)) if !powers.contains(&p)) {
        return 4.0;
    }
    if dest.is_supply_center() && state.sc_owner[dest as usize].is_none() {
        return 3.0;
    }
    1.5
}

fn sample_retreats(state: &GameState, powers: &[Power], rng: &mut SmallRng) -> Vec<Order> {
    let mut orders = Vec::new();
    for d in &state.dislodged {
        if !powers.contains(&d.power) {
            continue;
        }
        let options = retreat::retreat_options(d);
        if !options.is_empty() {
            orders.push(options[rng.gen_range(0..options.len())]);
        }
    }
    orders
}

fn sample_adjustments(state: &GameState, powers: &[Power], rng: &mut SmallRng) -> Vec<Order> {
    let mut orders = Vec::new();

    for &power in powers {
        let sc_count = state.supply_center_count(power);
        let unit_count = state.unit_count(power);
        let options = build::legal_adjustments(power, state);

        if sc_count > unit_count {
            let wanted = sc_count - unit_count;
            let mut chosen_regions: Vec<Region> = Vec::new();

            // Armies first, then fleets, distinct locations throughout.
            for kind in [UnitKind::Army, UnitKind::Fleet] {
                while chosen_regions.len() < wanted {
                    let available: Vec<&Order> = options
                        .iter()
                        .filter(|o| {
                            matches!(o, Order::Build { kind: k, location, .. }
                                if *k == kind && !chosen_regions.contains(&location.region))
                        })
                        .collect();
                    if available.is_empty() {
                        break;
                    }
                    let pick = *available[rng.gen_range(0..available.len())];
                    if let Order::Build { location, .. } = pick {
                        chosen_regions.push(location.region);
                    }
                    orders.push(pick);
                }
            }
            for _ in chosen_regions.len()..wanted {
                orders.push(Order::Waive { power });
            }
        } else if unit_count > sc_count {
            let needed = unit_count - sc_count;
            let mut disbands: Vec<Order> = options
                .iter()
                .filter(|o| matches!(o, Order::Disband { .. }))
                .copied()
                .collect();
            // Partial Fisher-Yates: a uniform sample of `needed` disbands.
            for i in 0..needed.min(disbands.len()) {
                let j = rng.gen_range(i..disbands.len());
                disbands.swap(i, j);
            }
            disbands.truncate(needed);
            orders.extend(disbands);
        }
    }

    orders
}

/// Numerically stable soft-max draw over scores: subtract the maximum
/// before exponentiating, then sample proportionally.
fn softmax_pick(scores: &[f32], rng: &mut SmallRng) -> usize {
    debug_assert!(!scores.is_empty());
    let max = scores.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let weights: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f32 = weights.iter().sum();

    let mut remaining = rng.gen::<f32>() * total;
    for (i, w) in weights.iter().enumerate() {
        remaining -= w;
        if remaining <= 0.0 {
            return i;
        }
    }
    scores.len() - 1
}
