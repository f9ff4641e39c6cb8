//! Game state representation.
//!
//! A complete snapshot of a game at a point in time: turn descriptor, unit
//! positions, supply-center ownership, and dislodged units awaiting retreat.
//! States are treated as immutable values by the rest of the engine: each
//! adjudication produces a new state.

use super::order::Location;
use super::region::{Coast, Power, Region, ALL_REGIONS, REGION_COUNT};
use super::unit::{Unit, UnitKind};

/// The season of a game turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Spring,
    Fall,
}

impl Season {
    /// Returns a dense index for key-table lookups.
    pub const fn index(self) -> usize {
        match self {
            Season::Spring => 0,
            Season::Fall => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Fall => "Fall",
        }
    }

    /// Parses a season name, case-insensitively.
    pub fn from_name(s: &str) -> Option<Season> {
        match s.to_ascii_lowercase().as_str() {
            "spring" => Some(Season::Spring),
            "fall" | "autumn" => Some(Season::Fall),
            _ => None,
        }
    }
}

/// The phase within a game turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Movement,
    Retreat,
    Build,
}

impl Phase {
    /// Returns a dense index for key-table lookups.
    pub const fn index(self) -> usize {
        match self {
            Phase::Movement => 0,
            Phase::Retreat => 1,
            Phase::Build => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Phase::Movement => "Movement",
            Phase::Retreat => "Retreat",
            Phase::Build => "Build",
        }
    }

    /// Parses a phase name, case-insensitively.
    pub fn from_name(s: &str) -> Option<Phase> {
        match s.to_ascii_lowercase().as_str() {
            "movement" | "move" | "diplomacy" => Some(Phase::Movement),
            "retreat" | "retreats" => Some(Phase::Retreat),
            "build" | "builds" | "adjustment" => Some(Phase::Build),
            _ => None,
        }
    }
}

/// The turn descriptor: year, season, and phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Turn {
    pub year: u16,
    pub season: Season,
    pub phase: Phase,
}

impl Turn {
    pub fn new(year: u16, season: Season, phase: Phase) -> Self {
        Self { year, season, phase }
    }
}

/// A dislodged unit: who it is, where it was attacked from, and where it may
/// legally retreat. The retreat set is computed by the movement adjudicator,
/// which alone knows this turn's bounce sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DislodgedUnit {
    pub power: Power,
    pub kind: UnitKind,
    pub region: Region,
    pub coast: Coast,
    pub attacker_from: Region,
    pub retreats: Vec<Location>,
}

/// Complete game state at a point in time.
///
/// Units and supply-center ownership use fixed-size arrays indexed by
/// `Region as usize` for O(1) lookup; dislodged units live in a separate
/// list that is non-empty only during a retreat phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub turn: Turn,
    /// Unit at each region: Some((power, kind)) or None.
    pub units: [Option<(Power, UnitKind)>; REGION_COUNT],
    /// Coast occupied by fleets on bicoastal regions.
    pub fleet_coast: [Option<Coast>; REGION_COUNT],
    /// Supply-center owner: None if not a supply center or if neutral.
    pub sc_owner: [Option<Power>; REGION_COUNT],
    /// Dislodged units awaiting retreat orders.
    pub dislodged: Vec<DislodgedUnit>,
}

impl GameState {
    /// Creates an empty state with no units or ownership.
    pub fn empty(year: u16, season: Season, phase: Phase) -> Self {
        GameState {
            turn: Turn::new(year, season, phase),
            units: [None; REGION_COUNT],
            fleet_coast: [None; REGION_COUNT],
            sc_owner: [None; REGION_COUNT],
            dislodged: Vec::new(),
        }
    }

    /// Places a unit on the board. Returns false if the region is occupied.
    pub fn place_unit(&mut self, region: Region, power: Power, kind: UnitKind, coast: Coast) -> bool {
        let idx = region as usize;
        if self.units[idx].is_some() {
            return false;
        }
        self.units[idx] = Some((power, kind));
        if coast != Coast::None {
            self.fleet_coast[idx] = Some(coast);
        }
        true
    }

    /// Removes the unit at a region, if any.
    pub fn remove_unit(&mut self, region: Region) {
        self.units[region as usize] = None;
        self.fleet_coast[region as usize] = None;
    }

    /// Sets supply-center ownership for a region.
    pub fn set_sc_owner(&mut self, region: Region, owner: Option<Power>) {
        self.sc_owner[region as usize] = owner;
    }

    /// Returns the unit at a region, if any.
    pub fn unit_at(&self, region: Region) -> Option<(Power, UnitKind)> {
        self.units[region as usize]
    }

    /// Returns the coast occupied by the unit at a region (None-coast if
    /// the region is not bicoastal or vacant).
    pub fn coast_at(&self, region: Region) -> Coast {
        self.fleet_coast[region as usize].unwrap_or(Coast::None)
    }

    /// Returns the dislodged unit at a region, if any.
    pub fn dislodged_at(&self, region: Region) -> Option<&DislodgedUnit> {
        self.dislodged.iter().find(|d| d.region == region)
    }

    /// Counts supply centers owned by the given power.
    pub fn supply_center_count(&self, power: Power) -> usize {
        self.sc_owner.iter().filter(|o| **o == Some(power)).count()
    }

    /// Counts units belonging to the given power (dislodged units excluded).
    pub fn unit_count(&self, power: Power) -> usize {
        self.units
            .iter()
            .filter(|u| matches!(u, Some((p, _)) if *p == power))
            .count()
    }

    /// Iterates the regions holding a unit of the given power, in region
    /// order.
    pub fn unit_regions(&self, power: Power) -> impl Iterator<Item = Region> + '_ {
        ALL_REGIONS
            .iter()
            .copied()
            .filter(move |r| matches!(self.units[*r as usize], Some((p, _)) if p == power))
    }

    /// Iterates every unit on the board, in region order.
    pub fn all_units(&self) -> impl Iterator<Item = Unit> + '_ {
        ALL_REGIONS.iter().filter_map(move |r| {
            self.unit_at(*r).map(|(power, kind)| Unit {
                kind,
                power,
                region: *r,
                coast: self.coast_at(*r),
            })
        })
    }

    /// Returns the Zobrist hash of this state.
    pub fn zobrist(&self) -> u64 {
        super::zobrist::hash_state(self)
    }
}
