//! Build/disband-phase resolution.
//!
//! For each power, delta = owned supply centers - units. Positive delta
//! accepts up to delta builds in vacant owned home centers (excess builds
//! are void, unused builds waive automatically). Negative delta requires
//! exactly -delta disbands; shortfalls are filled by the civil-disorder
//! rule: fleets before armies, then units farther from home first, then
//! alphabetical region tag.

use crate::board::{
    adjacent_regions, Coast, GameState, Order, Power, Region, UnitKind, ALL_POWERS, ALL_REGIONS,
    REGION_COUNT,
};

use super::{next_turn, Adjudication, OrderStatus, Resolution};

pub fn resolve_build(state: &GameState, orders: &[(Order, Power)]) -> Adjudication {
    let mut statuses: Vec<(OrderStatus, Option<&'static str>)> =
        vec![(OrderStatus::Void, Some("wrong phase for order")); orders.len()];
    let mut next = state.clone();

    for &power in &ALL_POWERS {
        let sc_count = state.supply_center_count(power);
        let unit_count = state.unit_count(power);

        if sc_count > unit_count {
            accept_builds(state, &mut next, orders, &mut statuses, power, sc_count - unit_count);
        } else if unit_count > sc_count {
            accept_disbands(state, &mut next, orders, &mut statuses, power, unit_count - sc_count);
        } else {
            for (i, (order, p)) in orders.iter().enumerate() {
                if *p != power {
                    continue;
                }
                if matches!(order, Order::Build { .. } | Order::Waive { .. } | Order::Disband { .. })
                    && order_belongs_to(order, power)
                {
                    statuses[i] = (OrderStatus::Void, Some("no adjustment required"));
                }
            }
        }
    }

    next.dislodged.clear();
    next.turn = next_turn(state.turn, false);

    let resolutions = orders
        .iter()
        .zip(statuses)
        .map(|((order, power), (status, reason))| Resolution { order: *order, power: *power, status, reason })
        .collect();

    Adjudication { next, resolutions }
}

fn order_belongs_to(order: &Order, power: Power) -> bool {
    match order {
        Order::Build { power: p, .. } | Order::Waive { power: p } => *p == power,
        _ => true,
    }
}

fn accept_builds(
    state: &GameState,
    next: &mut GameState,
    orders: &[(Order, Power)],
    statuses: &mut [(OrderStatus, Option<&'static str>)],
    power: Power,
    allowed: usize,
) {
    let mut used = 0usize;
    let mut built_at = [false; REGION_COUNT];

    for (i, (order, p)) in orders.iter().enumerate() {
        if *p != power {
            continue;
        }
        match *order {
            Order::Build { power: build_power, kind, location } => {
                if build_power != power {
                    statuses[i] = (OrderStatus::Void, Some("order issued for another power"));
                    continue;
                }
                if used >= allowed {
                    statuses[i] = (OrderStatus::Void, Some("exceeds build allowance"));
                    continue;
                }
                match validate_build(state, power, kind, location.region, location.coast, &built_at)
                {
                    Ok(()) => {
                        statuses[i] = (OrderStatus::Succeeds, None);
                        built_at[location.region as usize] = true;
                        next.units[location.region as usize] = Some((power, kind));
                        if location.coast != Coast::None {
                            next.fleet_coast[location.region as usize] = Some(location.coast);
                        }
                        used += 1;
                    }
                    Err(reason) => {
                        statuses[i] = (OrderStatus::Void, Some(reason));
                    }
                }
            }
            Order::Waive { power: waive_power } => {
                if waive_power != power {
                    statuses[i] = (OrderStatus::Void, Some("order issued for another power"));
                } else if used >= allowed {
                    statuses[i] = (OrderStatus::Void, Some("exceeds build allowance"));
                } else {
                    statuses[i] = (OrderStatus::Succeeds, None);
                    used += 1;
                }
            }
            _ => {
                statuses[i] = (OrderStatus::Void, Some("wrong phase for order"));
            }
        }
    }
    // Unused build slots waive automatically.
}

fn validate_build(
    state: &GameState,
    power: Power,
    kind: UnitKind,
    region: Region,
    coast: Coast,
    built_at: &[bool; REGION_COUNT],
) -> Result<(), &'static str> {
    if region.home_power() != Some(power) || !region.is_supply_center() {
        return Err("not a home supply center");
    }
    if state.sc_owner[region as usize] != Some(power) {
        return Err("home center not owned");
    }
    if state.units[region as usize].is_some() || built_at[region as usize] {
        return Err("home center occupied");
    }
    if !kind.can_occupy(region.kind()) {
        return Err("unit kind illegal for region");
    }
    match kind {
        UnitKind::Fleet if region.is_bicoastal() => {
            if !region.valid_coasts().contains(&coast) {
                return Err("coast required");
            }
        }
        UnitKind::Fleet if coast != Coast::None => return Err("coast invalid for region"),
        _ => {}
    }
    Ok(())
}

fn accept_disbands(
    state: &GameState,
    next: &mut GameState,
    orders: &[(Order, Power)],
    statuses: &mut [(OrderStatus, Option<&'static str>)],
    power: Power,
    needed: usize,
) {
    let mut used = 0usize;
    let mut disbanded = [false; REGION_COUNT];

    for (i, (order, p)) in orders.iter().enumerate() {
        if *p != power {
            continue;
        }
        match order {
            Order::Disband { unit } => {
                let region = unit.location.region;
                if used >= needed {
                    statuses[i] = (OrderStatus::Void, Some("exceeds disband requirement"));
                    continue;
                }
                match state.unit_at(region) {
                    Some((owner, _)) if owner == power && !disbanded[region as usize] => {
                        statuses[i] = (OrderStatus::Succeeds, None);
                        disbanded[region as usize] = true;
                        next.remove_unit(region);
                        used += 1;
                    }
                    Some((owner, _)) if owner != power => {
                        statuses[i] = (OrderStatus::Void, Some("unit belongs to another power"));
                    }
                    Some(_) => {
                        statuses[i] = (OrderStatus::Void, Some("duplicate order for unit"));
                    }
                    None => {
                        statuses[i] = (OrderStatus::Void, Some("no unit at region"));
                    }
                }
            }
            _ => {
                statuses[i] = (OrderStatus::Void, Some("wrong phase for order"));
            }
        }
    }

    // Civil disorder: the adjudicator selects any remaining disbands.
    if used < needed {
        for region in civil_disorder_order(state, power, &disbanded) {
            if used >= needed {
                break;
            }
            next.remove_unit(region);
            disbanded[region as usize] = true;
            used += 1;
        }
    }
}

/// Canonical civil-disorder ordering: fleets before armies, then greater
/// distance to the nearest home supply center first, then region tag.
fn civil_disorder_order(state: &GameState, power: Power, skip: &[bool; REGION_COUNT]) -> Vec<Region> {
    let mut units: Vec<(Region, UnitKind, i32)> = Vec::new();
    for i in 0..REGION_COUNT {
        if skip[i] {
            continue;
        }
        if let Some((p, kind)) = state.units[i] {
            if p == power {
                let region = ALL_REGIONS[i];
                units.push((region, kind, home_distance(region, power)));
            }
        }
    }

    units.sort_by(|a, b| {
        let fleet_first = (a.1 == UnitKind::Army).cmp(&(b.1 == UnitKind::Army));
        fleet_first
            .then(b.2.cmp(&a.2))
            .then(a.0.tag().cmp(b.0.tag()))
    });

    units.into_iter().map(|(r, _, _)| r).collect()
}

/// Minimum BFS distance from a region to any home supply center of the
/// power, over all borders regardless of unit kind.
fn home_distance(from: Region, power: Power) -> i32 {
    let mut is_home = [false; REGION_COUNT];
    for region in &ALL_REGIONS {
        if region.is_supply_center() && region.home_power() == Some(power) {
            is_home[*region as usize] = true;
        }
    }

    if is_home[from as usize] {
        return 0;
    }

    let mut visited = [false; REGION_COUNT];
    visited[from as usize] = true;
    let mut frontier: Vec<Region> = vec![from];
    let mut dist = 0;

    while !frontier.is_empty() {
        dist += 1;
        let mut next_frontier = Vec::new();
        for region in &frontier {
            for kind in [UnitKind::Army, UnitKind::Fleet] {
                for to in adjacent_regions(*region, kind, Coast::None) {
                    if visited[to as usize] {
                        continue;
                    }
                    if is_home[to as usize] {
                        return dist;
                    }
                    visited[to as usize] = true;
                    next_frontier.push(to);
                }
            }
        }
        frontier = next_frontier;
    }

    999
}
