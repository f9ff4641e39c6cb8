//! Movement-phase order generation.
//!
//! Enumerates legal hold, move, support, and convoy orders for each unit
//! during a movement phase.

use crate::board::{
    adjacent_regions, fleet_landings, Coast, GameState, Location, Order, OrderUnit, Region,
    RegionKind, UnitKind, ALL_REGIONS, REGION_COUNT,
};

/// Generates all legal movement-phase orders for the unit at the given
/// region.
///
/// Returns an empty vec if no unit exists there. The caller is responsible
/// for ensuring this is called during a movement phase.
pub fn legal_orders(region: Region, state: &GameState) -> Vec<Order> {
    let (_power, kind) = match state.unit_at(region) {
        Some(pu) => pu,
        None => return Vec::new(),
    };

    let coast = state.coast_at(region);
    let unit = OrderUnit::new(kind, Location::with_coast(region, coast));

    let mut orders = Vec::new();

    // Hold is always legal.
    orders.push(Order::Hold { unit });

    // Moves to adjacent regions.
    let move_targets = move_destinations(region, coast, kind);
    for dest in &move_targets {
        orders.push(Order::Move { unit, dest: *dest, via_convoy: false });
    }

    // Supports for every other unit on the board.
    push_supports(region, unit, state, &move_targets, &mut orders);

    // Convoys: only fleets in sea regions may convoy.
    if kind == UnitKind::Fleet && region.is_sea() {
        push_convoys(unit, state, &mut orders);
    }

    orders
}

/// Generates the destination locations for all legal one-step moves,
/// coast-qualified for fleet moves into bicoastal regions.
fn move_destinations(region: Region, coast: Coast, kind: UnitKind) -> Vec<Location> {
    let mut targets = Vec::new();

    for dest in adjacent_regions(region, kind, coast) {
        if !kind.can_occupy(dest.kind()) {
            continue;
        }

        if kind == UnitKind::Fleet && dest.is_bicoastal() {
            targets.extend(fleet_landings(region, coast, dest));
        } else {
            targets.push(Location::new(dest));
        }
    }

    targets
}

/// Generates support-hold and support-move orders for the given unit.
fn push_supports(
    region: Region,
    unit: OrderUnit,
    state: &GameState,
    move_targets: &[Location],
    orders: &mut Vec<Order>,
) {
    // Regions this unit can project force into.
    let reachable: Vec<Region> = move_targets.iter().map(|l| l.region).collect();

    for i in 0..REGION_COUNT {
        let (_other_power, other_kind) = match state.units[i] {
            Some(pu) => pu,
            None => continue,
        };
        let other_region = ALL_REGIONS[i];
        if other_region == region {
            continue;
        }

        let other_coast = state.coast_at(other_region);
        let supported = OrderUnit::new(other_kind, Location::with_coast(other_region, other_coast));

        // Support hold: this unit must be able to reach the supported region.
        if reachable.contains(&other_region) {
            orders.push(Order::SupportHold { unit, supported });
        }

        // Support move: for each region the other unit could enter that this
        // unit can also reach.
        for dest in adjacent_regions(other_region, other_kind, other_coast) {
            if dest == region {
                continue; // cannot support a move into own region
            }
            if !other_kind.can_occupy(dest.kind()) {
                continue;
            }
            if !reachable.contains(&dest) {
                continue;
            }
            orders.push(Order::SupportMove {
                unit,
                supported,
                dest: Location::new(dest),
            });
        }
    }
}

/// Generates convoy orders for a fleet in a sea region.
fn push_convoys(unit: OrderUnit, state: &GameState, orders: &mut Vec<Order>) {
    for i in 0..REGION_COUNT {
        let (_, other_kind) = match state.units[i] {
            Some(pu) => pu,
            None => continue,
        };
        if other_kind != UnitKind::Army {
            continue;
        }

        let army_region = ALL_REGIONS[i];

        // Any coastal destination is a candidate convoy target.
        for dest in ALL_REGIONS.iter() {
            if *dest == army_region {
                continue;
            }
            match dest.kind() {
                RegionKind::Coastal | RegionKind::Bicoastal => {}
                _ => continue,
            }
            orders.push(Order::Convoy {
                unit,
                army: Location::new(army_region),
                dest: Location::new(*dest),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{GameState, Phase, Power, Season};

    fn state_with_unit(region: Region, power: Power, kind: UnitKind, coast: Coast) -> GameState {
        let mut state = GameState::empty(1901, Season::Spring, Phase::Movement);
        state.place_unit(region, power, kind, coast);
        state
    }

    fn has_move_to(orders: &[Order], dest: Region) -> bool {
        orders
            .iter()
            .any(|o| matches!(o, Order::Move { dest: d, .. } if d.region == dest))
    }

    fn has_hold(orders: &[Order]) -> bool {
        orders.iter().any(|o| matches!(o, Order::Hold { .. }))
    }

    #[test]
    fn army_hold_always_present() {
        let state = state_with_unit(Region::Vie, Power::Austria, UnitKind::Army, Coast::None);
        let orders = legal_orders(Region::Vie, &state);
        assert!(has_hold(&orders));
    }

    #[test]
    fn army_basic_moves() {
        let state = state_with_unit(Region::Vie, Power::Austria, UnitKind::Army, Coast::None);
        let orders = legal_orders(Region::Vie, &state);
        assert!(has_move_to(&orders, Region::Boh));
        assert!(has_move_to(&orders, Region::Bud));
        assert!(has_move_to(&orders, Region::Gal));
        assert!(has_move_to(&orders, Region::Tyr));
        assert!(has_move_to(&orders, Region::Tri));
        assert!(!has_move_to(&orders, Region::Ven));
    }

    #[test]
    fn army_cannot_enter_sea() {
        let state = state_with_unit(Region::Bre, Power::France, UnitKind::Army, Coast::None);
        let orders = legal_orders(Region::Bre, &state);
        assert!(!has_move_to(&orders, Region::Mao));
        assert!(!has_move_to(&orders, Region::Eng));
        assert!(has_move_to(&orders, Region::Gas));
        assert!(has_move_to(&orders, Region::Par));
        assert!(has_move_to(&orders, Region::Pic));
    }

    #[test]
    fn fleet_split_coast_spain() {
        // Fleet in MAO can move to Spain's north or south coast.
        let state = state_with_unit(Region::Mao, Power::France, UnitKind::Fleet, Coast::None);
        let orders = legal_orders(Region::Mao, &state);

        let spa_moves: Vec<Coast> = orders
            .iter()
            .filter_map(|o| match o {
                Order::Move { dest, .. } if dest.region == Region::Spa => Some(dest.coast),
                _ => None,
            })
            .collect();
        assert_eq!(spa_moves.len(), 2);
        assert!(spa_moves.contains(&Coast::North));
        assert!(spa_moves.contains(&Coast::South));
    }

    #[test]
    fn fleet_on_split_coast_restricted_movement() {
        let state = state_with_unit(Region::Stp, Power::Russia, UnitKind::Fleet, Coast::South);
        let orders = legal_orders(Region::Stp, &state);
        assert!(has_move_to(&orders, Region::Bot));
        assert!(has_move_to(&orders, Region::Fin));
        assert!(has_move_to(&orders, Region::Lvn));
        assert!(!has_move_to(&orders, Region::Bar));
        assert!(!has_move_to(&orders, Region::Nwy));
    }

    #[test]
    fn support_hold_generated() {
        let mut state = GameState::empty(1901, Season::Spring, Phase::Movement);
        state.place_unit(Region::Tyr, Power::Austria, UnitKind::Army, Coast::None);
        state.place_unit(Region::Vie, Power::Austria, UnitKind::Army, Coast::None);

        let orders = legal_orders(Region::Tyr, &state);
        let support_holds = orders.iter().filter(|o| {
            matches!(o, Order::SupportHold { supported, .. } if supported.location.region == Region::Vie)
        }).count();
        assert_eq!(support_holds, 1);
    }

    #[test]
    fn support_move_generated() {
        let mut state = GameState::empty(1901, Season::Spring, Phase::Movement);
        state.place_unit(Region::Gal, Power::Austria, UnitKind::Army, Coast::None);
        state.place_unit(Region::Bud, Power::Austria, UnitKind::Army, Coast::None);

        let orders = legal_orders(Region::Gal, &state);
        // Gal can support Bud into Rum (both reach Rum).
        let support_rum = orders
            .iter()
            .filter(|o| {
                matches!(o, Order::SupportMove { supported, dest, .. }
                    if supported.location.region == Region::Bud && dest.region == Region::Rum)
            })
            .count();
        assert_eq!(support_rum, 1);
    }

    #[test]
    fn support_move_not_into_own_region() {
        let mut state = GameState::empty(1901, Season::Spring, Phase::Movement);
        state.place_unit(Region::Tyr, Power::Austria, UnitKind::Army, Coast::None);
        state.place_unit(Region::Vie, Power::Austria, UnitKind::Army, Coast::None);

        let orders = legal_orders(Region::Tyr, &state);
        let bad = orders
            .iter()
            .filter(|o| matches!(o, Order::SupportMove { dest, .. } if dest.region == Region::Tyr))
            .count();
        assert_eq!(bad, 0);
    }

    #[test]
    fn support_requires_reachability() {
        let mut state = GameState::empty(1901, Season::Spring, Phase::Movement);
        state.place_unit(Region::Adr, Power::Italy, UnitKind::Fleet, Coast::None);
        state.place_unit(Region::Vie, Power::Austria, UnitKind::Army, Coast::None);

        let orders = legal_orders(Region::Adr, &state);
        // A fleet in the Adriatic cannot reach inland Vienna.
        let vie_supports = orders.iter().filter(|o| {
            matches!(o, Order::SupportHold { supported, .. } if supported.location.region == Region::Vie)
        }).count();
        assert_eq!(vie_supports, 0);
    }

    #[test]
    fn convoy_generated_for_fleet_in_sea() {
        let mut state = GameState::empty(1901, Season::Spring, Phase::Movement);
        state.place_unit(Region::Eng, Power::England, UnitKind::Fleet, Coast::None);
        state.place_unit(Region::Lon, Power::England, UnitKind::Army, Coast::None);

        let orders = legal_orders(Region::Eng, &state);
        assert!(orders.iter().any(|o| matches!(o, Order::Convoy { .. })));
    }

    #[test]
    fn no_convoy_for_fleet_on_coast() {
        let mut state = GameState::empty(1901, Season::Spring, Phase::Movement);
        state.place_unit(Region::Lon, Power::England, UnitKind::Fleet, Coast::None);
        state.place_unit(Region::Yor, Power::England, UnitKind::Army, Coast::None);

        let orders = legal_orders(Region::Lon, &state);
        assert!(!orders.iter().any(|o| matches!(o, Order::Convoy { .. })));
    }

    #[test]
    fn empty_region_returns_empty() {
        let state = GameState::empty(1901, Season::Spring, Phase::Movement);
        let orders = legal_orders(Region::Vie, &state);
        assert!(orders.is_empty());
    }

    #[test]
    fn fleet_bul_ec_moves() {
        let state = state_with_unit(Region::Bul, Power::Turkey, UnitKind::Fleet, Coast::East);
        let orders = legal_orders(Region::Bul, &state);
        assert!(has_move_to(&orders, Region::Bla));
        assert!(has_move_to(&orders, Region::Con));
        assert!(has_move_to(&orders, Region::Rum));
        assert!(!has_move_to(&orders, Region::Aeg));
        assert!(!has_move_to(&orders, Region::Gre));
    }
}
