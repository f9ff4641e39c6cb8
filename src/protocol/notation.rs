//! Order and location text form.
//!
//! One line per order. Display convention: sea region tags are UPPERCASE,
//! land/coastal/bicoastal tags Title Case, coast suffixes lowercase after a
//! slash. The canonical fingerprint of an order set (rendered lines,
//! sorted) identifies equivalent candidates across search workers.

use crate::board::{Coast, Location, Order, Power, Region, UnitKind};

/// Renders a region tag per the display convention.
pub fn region_display(region: Region) -> String {
    let tag = region.tag();
    if region.is_sea() {
        tag.to_uppercase()
    } else {
        let mut chars = tag.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Renders a location: region display plus a lowercase coast suffix.
pub fn location_display(location: &Location) -> String {
    if location.coast == Coast::None {
        region_display(location.region)
    } else {
        format!("{}/{}", region_display(location.region), location.coast.suffix())
    }
}

/// Renders one order as a single line.
pub fn format_order(order: &Order) -> String {
    match order {
        Order::Hold { unit } => {
            format!("{} {} H", unit.kind.letter(), location_display(&unit.location))
        }
        Order::Move { unit, dest, via_convoy } => {
            let suffix = if *via_convoy { " via convoy" } else { "" };
            format!(
                "{} {} - {}{}",
                unit.kind.letter(),
                location_display(&unit.location),
                location_display(dest),
                suffix
            )
        }
        Order::SupportHold { unit, supported } => {
            format!(
                "{} {} S {}",
                unit.kind.letter(),
                location_display(&unit.location),
                location_display(&supported.location)
            )
        }
        Order::SupportMove { unit, supported, dest } => {
            format!(
                "{} {} S {} - {}",
                unit.kind.letter(),
                location_display(&unit.location),
                location_display(&supported.location),
                location_display(dest)
            )
        }
        Order::Convoy { unit, army, dest } => {
            format!(
                "F {} C {} - {}",
                location_display(&unit.location),
                location_display(army),
                location_display(dest)
            )
        }
        Order::Retreat { unit, dest } => {
            format!(
                "{} {} R {}",
                unit.kind.letter(),
                location_display(&unit.location),
                location_display(dest)
            )
        }
        Order::Disband { unit } => {
            format!("{} {} D", unit.kind.letter(), location_display(&unit.location))
        }
        Order::Build { kind, location, .. } => {
            format!("Build {} {}", kind.letter(), location_display(location))
        }
        Order::Waive { power } => format!("{} Waive", power.name()),
    }
}

/// Renders a whole order list, one line per order.
pub fn format_orders(orders: &[Order]) -> Vec<String> {
    orders.iter().map(format_order).collect()
}

/// Canonical fingerprint of an order set: formatted lines, sorted and
/// joined, so equal sets produced in different unit orders compare equal.
pub fn fingerprint(orders: &[Order]) -> String {
    let mut lines = format_orders(orders);
    lines.sort();
    lines.join("; ")
}

/// Renders a unit with its owner for state snapshots.
pub fn describe_unit(power: Power, kind: UnitKind, region: Region, coast: Coast) -> String {
    format!(
        "{} {} {}",
        power.name(),
        kind.letter(),
        location_display(&Location::with_coast(region, coast))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::OrderUnit;

    fn army(region: Region) -> OrderUnit {
        OrderUnit::new(UnitKind::Army, Location::new(region))
    }

    fn fleet(region: Region) -> OrderUnit {
        OrderUnit::new(UnitKind::Fleet, Location::new(region))
    }

    #[test]
    fn sea_regions_render_uppercase() {
        assert_eq!(region_display(Region::Nth), "NTH");
        assert_eq!(region_display(Region::Bud), "Bud");
        assert_eq!(region_display(Region::Stp), "Stp");
    }

    #[test]
    fn hold_and_move() {
        assert_eq!(format_order(&Order::Hold { unit: army(Region::Vie) }), "A Vie H");
        assert_eq!(
            format_order(&Order::Move {
                unit: army(Region::Bud),
                dest: Location::new(Region::Rum),
                via_convoy: false,
            }),
            "A Bud - Rum"
        );
        assert_eq!(
            format_order(&Order::Move {
                unit: fleet(Region::Nrg),
                dest: Location::with_coast(Region::Stp, Coast::North),
                via_convoy: false,
            }),
            "F NRG - Stp/nc"
        );
        assert_eq!(
            format_order(&Order::Move {
                unit: army(Region::Lon),
                dest: Location::new(Region::Bel),
                via_convoy: true,
            }),
            "A Lon - Bel via convoy"
        );
    }

    #[test]
    fn supports_and_convoys() {
        assert_eq!(
            format_order(&Order::SupportHold { unit: army(Region::Tyr), supported: army(Region::Vie) }),
            "A Tyr S Vie"
        );
        assert_eq!(
            format_order(&Order::SupportMove {
                unit: army(Region::Gal),
                supported: army(Region::Bud),
                dest: Location::new(Region::Rum),
            }),
            "A Gal S Bud - Rum"
        );
        assert_eq!(
            format_order(&Order::Convoy {
                unit: fleet(Region::Nth),
                army: Location::new(Region::Lon),
                dest: Location::new(Region::Bel),
            }),
            "F NTH C Lon - Bel"
        );
    }

    #[test]
    fn adjustment_orders() {
        assert_eq!(
            format_order(&Order::Retreat { unit: army(Region::Vie), dest: Location::new(Region::Boh) }),
            "A Vie R Boh"
        );
        assert_eq!(format_order(&Order::Disband { unit: fleet(Region::Tri) }), "F Tri D");
        assert_eq!(
            format_order(&Order::Build {
                power: Power::Russia,
                kind: UnitKind::Fleet,
                location: Location::with_coast(Region::Stp, Coast::South),
            }),
            "Build F Stp/sc"
        );
        assert_eq!(format_order(&Order::Waive { power: Power::Turkey }), "Turkey Waive");
    }

    #[test]
    fn fingerprint_is_order_independent() {
        let a = Order::Hold { unit: army(Region::Vie) };
        let b = Order::Move {
            unit: army(Region::Bud),
            dest: Location::new(Region::Rum),
            via_convoy: false,
        };
        assert_eq!(fingerprint(&[a, b]), fingerprint(&[b, a]));
        assert_ne!(fingerprint(&[a]), fingerprint(&[b]));
    }
}
