//! Build/disband-phase order generation.
//!
//! Enumerates legal build, disband, and waive orders for the adjustment
//! phase at the end of a game year.

use crate::board::{
    Coast, GameState, Location, Order, OrderUnit, Power, RegionKind, UnitKind, ALL_REGIONS,
    REGION_COUNT,
};

/// Generates the single option list of legal adjustment orders for a power.
///
/// Compares supply-center count to unit count:
/// - More centers than units: builds in vacant owned home centers
///   (enumerating both unit kinds where legal and each coast for bicoastal
///   regions), plus a waive.
/// - Fewer centers than units: one disband option per owned unit.
/// - Equal: empty (no orders needed).
///
/// The sampler is responsible for selecting the right multiplicity.
pub fn legal_adjustments(power: Power, state: &GameState) -> Vec<Order> {
    let sc_count = state.supply_center_count(power);
    let unit_count = state.unit_count(power);

    if sc_count > unit_count {
        build_options(power, state)
    } else if unit_count > sc_count {
        disband_options(power, state)
    } else {
        Vec::new()
    }
}

/// Build orders for every vacant home supply center still owned by the
/// power, preceded by the always-available waive.
fn build_options(power: Power, state: &GameState) -> Vec<Order> {
    let mut orders = vec![Order::Waive { power }];

    for region in ALL_REGIONS.iter() {
        if region.home_power() != Some(power) || !region.is_supply_center() {
            continue;
        }
        let idx = *region as usize;
        if state.sc_owner[idx] != Some(power) {
            continue;
        }
        if state.units[idx].is_some() {
            continue;
        }

        let kind = region.kind();

        if UnitKind::Army.can_occupy(kind) {
            orders.push(Order::Build {
                power,
                kind: UnitKind::Army,
                location: Location::new(*region),
            });
        }

        if UnitKind::Fleet.can_occupy(kind) && kind != RegionKind::Inland {
            if region.is_bicoastal() {
                for coast in region.valid_coasts() {
                    orders.push(Order::Build {
                        power,
                        kind: UnitKind::Fleet,
                        location: Location::with_coast(*region, *coast),
                    });
                }
            } else {
                orders.push(Order::Build {
                    power,
                    kind: UnitKind::Fleet,
                    location: Location::new(*region),
                });
            }
        }
    }

    orders
}

/// Disband orders for each of the power's units.
fn disband_options(power: Power, state: &GameState) -> Vec<Order> {
    let mut orders = Vec::new();

    for i in 0..REGION_COUNT {
        if let Some((p, kind)) = state.units[i] {
            if p != power {
                continue;
            }
            let region = ALL_REGIONS[i];
            let coast = state.coast_at(region);
            orders.push(Order::Disband {
                unit: OrderUnit::new(kind, Location::with_coast(region, coast)),
            });
        }
    }

    orders
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{GameState, Phase, Region, Season};

    fn setup_austria_sc(state: &mut GameState) {
        state.set_sc_owner(Region::Vie, Some(Power::Austria));
        state.set_sc_owner(Region::Bud, Some(Power::Austria));
        state.set_sc_owner(Region::Tri, Some(Power::Austria));
    }

    #[test]
    fn equal_counts_returns_empty() {
        let mut state = GameState::empty(1901, Season::Fall, Phase::Build);
        setup_austria_sc(&mut state);
        state.place_unit(Region::Vie, Power::Austria, UnitKind::Army, Coast::None);
        state.place_unit(Region::Bud, Power::Austria, UnitKind::Army, Coast::None);
        state.place_unit(Region::Tri, Power::Austria, UnitKind::Army, Coast::None);

        assert!(legal_adjustments(Power::Austria, &state).is_empty());
    }

    #[test]
    fn surplus_generates_builds() {
        let mut state = GameState::empty(1901, Season::Fall, Phase::Build);
        setup_austria_sc(&mut state);
        state.place_unit(Region::Vie, Power::Austria, UnitKind::Army, Coast::None);
        // 3 centers, 1 unit.

        let orders = legal_adjustments(Power::Austria, &state);
        assert!(matches!(orders[0], Order::Waive { power: Power::Austria }));

        let builds: Vec<&Order> = orders
            .iter()
            .filter(|o| matches!(o, Order::Build { .. }))
            .collect();
        // Bud is inland (army only); Tri is coastal (army + fleet); Vie occupied.
        assert_eq!(builds.len(), 3);
    }

    #[test]
    fn no_build_in_occupied_home_center() {
        let mut state = GameState::empty(1901, Season::Fall, Phase::Build);
        setup_austria_sc(&mut state);
        state.place_unit(Region::Vie, Power::Austria, UnitKind::Army, Coast::None);
        state.place_unit(Region::Bud, Power::Austria, UnitKind::Army, Coast::None);
        state.set_sc_owner(Region::Ser, Some(Power::Austria)); // 4 centers, 2 units

        let orders = legal_adjustments(Power::Austria, &state);
        let builds = orders.iter().filter(|o| matches!(o, Order::Build { .. })).count();
        // Tri is the only vacant home center: army + fleet.
        assert_eq!(builds, 2);
    }

    #[test]
    fn deficit_generates_disbands() {
        let mut state = GameState::empty(1901, Season::Fall, Phase::Build);
        state.set_sc_owner(Region::Vie, Some(Power::Austria));
        state.place_unit(Region::Vie, Power::Austria, UnitKind::Army, Coast::None);
        state.place_unit(Region::Bud, Power::Austria, UnitKind::Army, Coast::None);

        let orders = legal_adjustments(Power::Austria, &state);
        assert_eq!(orders.len(), 2);
        assert!(orders.iter().all(|o| matches!(o, Order::Disband { .. })));
    }

    #[test]
    fn russia_stp_fleet_builds_both_coasts() {
        let mut state = GameState::empty(1901, Season::Fall, Phase::Build);
        state.set_sc_owner(Region::Stp, Some(Power::Russia));
        state.set_sc_owner(Region::Mos, Some(Power::Russia));
        state.place_unit(Region::Mos, Power::Russia, UnitKind::Army, Coast::None);

        let orders = legal_adjustments(Power::Russia, &state);
        let stp_builds: Vec<&Order> = orders
            .iter()
            .filter(|o| matches!(o, Order::Build { location, .. } if location.region == Region::Stp))
            .collect();
        // Army, Fleet north coast, Fleet south coast.
        assert_eq!(stp_builds.len(), 3);
    }

    #[test]
    fn no_fleet_build_in_inland_center() {
        let mut state = GameState::empty(1901, Season::Fall, Phase::Build);
        state.set_sc_owner(Region::Vie, Some(Power::Austria));
        state.set_sc_owner(Region::Bud, Some(Power::Austria));

        let orders = legal_adjustments(Power::Austria, &state);
        let fleet_builds = orders
            .iter()
            .filter(|o| matches!(o, Order::Build { kind: UnitKind::Fleet, .. }))
            .count();
        assert_eq!(fleet_builds, 0);
    }

    #[test]
    fn no_build_in_captured_foreign_center() {
        let mut state = GameState::empty(1901, Season::Fall, Phase::Build);
        state.set_sc_owner(Region::Ser, Some(Power::Austria));
        state.set_sc_owner(Region::Vie, Some(Power::Austria));

        let orders = legal_adjustments(Power::Austria, &state);
        let ser_builds = orders
            .iter()
            .filter(|o| matches!(o, Order::Build { location, .. } if location.region == Region::Ser))
            .count();
        assert_eq!(ser_builds, 0);
    }
}
