//! Order types for all Diplomacy phases.
//!
//! The full set of orders: hold, move (optionally via convoy), support,
//! convoy, retreat, disband, build, and waive, as a tagged union with
//! structural equality and exhaustive case analysis.

use super::region::{Coast, Power, Region};
use super::unit::UnitKind;

/// A location on the board: a region with an optional coast specifier.
///
/// A location whose coast is `None` matches any coast for the same region
/// when the rules have not stipulated one; see [`Location::matches`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub region: Region,
    pub coast: Coast,
}

impl Location {
    /// Creates a location without a coast.
    pub fn new(region: Region) -> Self {
        Self { region, coast: Coast::None }
    }

    /// Creates a location with a coast specifier.
    pub fn with_coast(region: Region, coast: Coast) -> Self {
        Self { region, coast }
    }

    /// Coast-lenient matching: same region, and either coast equal or one
    /// side unspecified. Used when cross-referencing orders (a support may
    /// name a fleet without repeating its coast).
    pub fn matches(&self, other: &Location) -> bool {
        self.region == other.region
            && (self.coast == other.coast
                || self.coast == Coast::None
                || other.coast == Coast::None)
    }
}

/// A unit reference in an order: the unit kind and its current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderUnit {
    pub kind: UnitKind,
    pub location: Location,
}

impl OrderUnit {
    pub fn new(kind: UnitKind, location: Location) -> Self {
        Self { kind, location }
    }
}

/// A Diplomacy order covering all three phases.
///
/// Each variant carries exactly the data needed to unambiguously specify the
/// order. Support-hold and support-move are distinct variants rather than a
/// destination-equals-target encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    /// Hold: `A Vie H`
    Hold { unit: OrderUnit },

    /// Move: `A Bud - Rum`, `F NRG - Stp/nc`, or `A Lon - Bel via convoy`
    Move {
        unit: OrderUnit,
        dest: Location,
        via_convoy: bool,
    },

    /// Support hold: `A Tyr S A Vie`
    SupportHold { unit: OrderUnit, supported: OrderUnit },

    /// Support move: `A Gal S A Bud - Rum`
    SupportMove {
        unit: OrderUnit,
        supported: OrderUnit,
        dest: Location,
    },

    /// Convoy: `F MAO C Bre - Spa`
    Convoy {
        unit: OrderUnit,
        army: Location,
        dest: Location,
    },

    /// Retreat: `A Vie R Boh`
    Retreat { unit: OrderUnit, dest: Location },

    /// Disband: `F Tri D` (retreat phase) or `A War D` (build phase)
    Disband { unit: OrderUnit },

    /// Build: `Build A Vie` or `Build F Stp/sc`
    Build {
        power: Power,
        kind: UnitKind,
        location: Location,
    },

    /// Waive: voluntarily skip one build.
    Waive { power: Power },
}

impl Order {
    /// Returns the region of the ordered unit, or None for build/waive
    /// orders, which are issued by a power rather than a unit.
    pub fn unit_region(&self) -> Option<Region> {
        match self {
            Order::Hold { unit }
            | Order::Move { unit, .. }
            | Order::SupportHold { unit, .. }
            | Order::SupportMove { unit, .. }
            | Order::Convoy { unit, .. }
            | Order::Retreat { unit, .. }
            | Order::Disband { unit } => Some(unit.location.region),
            Order::Build { .. } | Order::Waive { .. } => None,
        }
    }

    /// Returns the ordered unit, if the order references one.
    pub fn unit(&self) -> Option<OrderUnit> {
        match self {
            Order::Hold { unit }
            | Order::Move { unit, .. }
            | Order::SupportHold { unit, .. }
            | Order::SupportMove { unit, .. }
            | Order::Convoy { unit, .. }
            | Order::Retreat { unit, .. }
            | Order::Disband { unit } => Some(*unit),
            Order::Build { .. } | Order::Waive { .. } => None,
        }
    }

    /// Returns true for the stationary movement-phase orders (everything
    /// except a move).
    pub fn is_stationary(&self) -> bool {
        !matches!(self, Order::Move { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::region::{Coast, Region};
    use crate::board::unit::UnitKind;

    #[test]
    fn location_new_has_no_coast() {
        let loc = Location::new(Region::Vie);
        assert_eq!(loc.region, Region::Vie);
        assert_eq!(loc.coast, Coast::None);
    }

    #[test]
    fn location_matching_is_coast_lenient() {
        let bare = Location::new(Region::Stp);
        let south = Location::with_coast(Region::Stp, Coast::South);
        let north = Location::with_coast(Region::Stp, Coast::North);
        assert!(bare.matches(&south));
        assert!(south.matches(&bare));
        assert!(!south.matches(&north));
        assert!(!bare.matches(&Location::new(Region::Mos)));
    }

    #[test]
    fn order_variants_are_distinct() {
        let unit = OrderUnit::new(UnitKind::Army, Location::new(Region::Vie));
        let hold = Order::Hold { unit };
        let disband = Order::Disband { unit };
        assert_ne!(hold, disband);
    }

    #[test]
    fn build_and_waive_have_no_unit_region() {
        let build = Order::Build {
            power: crate::board::region::Power::Russia,
            kind: UnitKind::Fleet,
            location: Location::with_coast(Region::Stp, Coast::South),
        };
        assert_eq!(build.unit_region(), None);
        let waive = Order::Waive { power: crate::board::region::Power::Russia };
        assert_eq!(waive.unit_region(), None);
    }

    #[test]
    fn move_carries_convoy_flag() {
        let unit = OrderUnit::new(UnitKind::Army, Location::new(Region::Lon));
        let by_land = Order::Move { unit, dest: Location::new(Region::Yor), via_convoy: false };
        let by_sea = Order::Move { unit, dest: Location::new(Region::Yor), via_convoy: true };
        assert_ne!(by_land, by_sea);
    }
}
