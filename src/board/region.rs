//! Regions, powers, and coasts of the Classic Diplomacy map.
//!
//! The 75 regions are enumerated alphabetically by 3-letter tag; metadata
//! (display name, kind, supply-center status, home power, coasts) lives in
//! a constructor-built table indexed by the `Region` discriminant.
//! Bicoastal regions (Bulgaria, Spain, St. Petersburg) are a distinct kind
//! whose fleet adjacency depends on the occupied coast.

/// The number of regions on the Classic Diplomacy map.
pub const REGION_COUNT: usize = 75;

/// The number of supply centers on the Classic Diplomacy map.
pub const SUPPLY_CENTER_COUNT: usize = 34;

/// A region on the Classic Diplomacy map.
///
/// Variants are in alphabetical order by 3-letter tag; `#[repr(u8)]`
/// assigns sequential discriminants used as array indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Region {
    Adr, Aeg, Alb, Ank, Apu, Arm, Bal, Bar, Bel, Ber,
    Bla, Boh, Bot, Bre, Bud, Bul, Bur, Cly, Con, Den,
    Eas, Edi, Eng, Fin, Gal, Gas, Gol, Gre, Hel, Hol,
    Ion, Iri, Kie, Lon, Lvn, Lvp, Mao, Mar, Mos, Mun,
    Naf, Nao, Nap, Nrg, Nth, Nwy, Par, Pic, Pie, Por,
    Pru, Rom, Ruh, Rum, Ser, Sev, Sil, Ska, Smy, Spa,
    Stp, Swe, Syr, Tri, Tun, Tus, Tyr, Tys, Ukr, Ven,
    Vie, Wal, War, Wes, Yor,
}

/// All region variants in discriminant order.
pub const ALL_REGIONS: [Region; REGION_COUNT] = [
    Region::Adr, Region::Aeg, Region::Alb, Region::Ank, Region::Apu,
    Region::Arm, Region::Bal, Region::Bar, Region::Bel, Region::Ber,
    Region::Bla, Region::Boh, Region::Bot, Region::Bre, Region::Bud,
    Region::Bul, Region::Bur, Region::Cly, Region::Con, Region::Den,
    Region::Eas, Region::Edi, Region::Eng, Region::Fin, Region::Gal,
    Region::Gas, Region::Gol, Region::Gre, Region::Hel, Region::Hol,
    Region::Ion, Region::Iri, Region::Kie, Region::Lon, Region::Lvn,
    Region::Lvp, Region::Mao, Region::Mar, Region::Mos, Region::Mun,
    Region::Naf, Region::Nao, Region::Nap, Region::Nrg, Region::Nth,
    Region::Nwy, Region::Par, Region::Pic, Region::Pie, Region::Por,
    Region::Pru, Region::Rom, Region::Ruh, Region::Rum, Region::Ser,
    Region::Sev, Region::Sil, Region::Ska, Region::Smy, Region::Spa,
    Region::Stp, Region::Swe, Region::Syr, Region::Tri, Region::Tun,
    Region::Tus, Region::Tyr, Region::Tys, Region::Ukr, Region::Ven,
    Region::Vie, Region::Wal, Region::War, Region::Wes, Region::Yor,
];

impl Region {
    /// Returns the lowercase 3-letter tag for this region.
    pub const fn tag(self) -> &'static str {
        REGION_INFO[self as usize].tag
    }

    /// Returns the full display name for this region.
    pub const fn name(self) -> &'static str {
        REGION_INFO[self as usize].name
    }

    /// Returns the region kind (Inland, Sea, Coastal, or Bicoastal).
    pub const fn kind(self) -> RegionKind {
        REGION_INFO[self as usize].kind
    }

    /// Returns true if this region is a supply center.
    pub const fn is_supply_center(self) -> bool {
        REGION_INFO[self as usize].is_supply_center
    }

    /// Returns the home power for this region, or None if neutral.
    pub const fn home_power(self) -> Option<Power> {
        REGION_INFO[self as usize].home_power
    }

    /// Returns the valid coasts for bicoastal regions, empty otherwise.
    pub const fn valid_coasts(self) -> &'static [Coast] {
        REGION_INFO[self as usize].coasts
    }

    /// Returns true if this region has distinct fleet coasts.
    pub const fn is_bicoastal(self) -> bool {
        matches!(REGION_INFO[self as usize].kind, RegionKind::Bicoastal)
    }

    /// Returns true if this region is a sea region.
    pub const fn is_sea(self) -> bool {
        matches!(REGION_INFO[self as usize].kind, RegionKind::Sea)
    }

    /// Converts a raw index back to a Region, returning None if out of range.
    pub fn from_index(idx: usize) -> Option<Region> {
        ALL_REGIONS.get(idx).copied()
    }

    /// Looks up a region by its lowercase 3-letter tag.
    ///
    /// Accepts the Backstabbr spellings of four sea regions as aliases:
    /// `nor` (Norway), `lyo` (Gulf of Lyon), `tyn` (Tyrrhenian Sea),
    /// and `nat` (North Atlantic Ocean).
    pub fn from_tag(tag: &str) -> Option<Region> {
        let tag = match tag {
            "nor" => "nwy",
            "lyo" => "gol",
            "tyn" => "tys",
            "nat" => "nao",
            other => other,
        };
        ALL_REGIONS.iter().copied().find(|r| r.tag() == tag)
    }
}

/// Coast specifier for bicoastal regions.
///
/// `None` is the only valid value for non-bicoastal regions. The Classic map
/// uses north, south, and east coasts; `West` exists for API completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coast {
    None,
    North,
    South,
    East,
    West,
}

/// Number of coast variants, used to size Zobrist key tables.
pub const COAST_COUNT: usize = 5;

impl Coast {
    /// Returns the 2-letter suffix (empty string for None).
    pub const fn suffix(self) -> &'static str {
        match self {
            Coast::None => "",
            Coast::North => "nc",
            Coast::South => "sc",
            Coast::East => "ec",
            Coast::West => "wc",
        }
    }

    /// Parses a coast from its 2-letter suffix.
    pub fn from_suffix(s: &str) -> Option<Coast> {
        match s {
            "" => Some(Coast::None),
            "nc" => Some(Coast::North),
            "sc" => Some(Coast::South),
            "ec" => Some(Coast::East),
            "wc" => Some(Coast::West),
            _ => Option::None,
        }
    }

    /// Returns a dense index for key-table lookups.
    pub const fn index(self) -> usize {
        match self {
            Coast::None => 0,
            Coast::North => 1,
            Coast::South => 2,
            Coast::East => 3,
            Coast::West => 4,
        }
    }
}

/// Classifies a region by terrain.
///
/// Bicoastal regions are coastal regions whose fleet adjacency depends on
/// which coast the fleet occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Inland,
    Sea,
    Coastal,
    Bicoastal,
}

/// One of the seven great powers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Power {
    Austria,
    England,
    France,
    Germany,
    Italy,
    Russia,
    Turkey,
}

/// Number of powers, used to size per-power arrays.
pub const POWER_COUNT: usize = 7;

/// All seven powers in standard order.
pub const ALL_POWERS: [Power; POWER_COUNT] = [
    Power::Austria,
    Power::England,
    Power::France,
    Power::Germany,
    Power::Italy,
    Power::Russia,
    Power::Turkey,
];

impl Power {
    /// Returns the capitalized display name of this power.
    pub const fn name(self) -> &'static str {
        match self {
            Power::Austria => "Austria",
            Power::England => "England",
            Power::France => "France",
            Power::Germany => "Germany",
            Power::Italy => "Italy",
            Power::Russia => "Russia",
            Power::Turkey => "Turkey",
        }
    }

    /// Parses a power from its name, case-insensitively.
    ///
    /// `Austria-Hungary` is accepted as an alias for Austria.
    pub fn from_name(name: &str) -> Option<Power> {
        match name.to_ascii_lowercase().as_str() {
            "austria" | "austria-hungary" => Some(Power::Austria),
            "england" => Some(Power::England),
            "france" => Some(Power::France),
            "germany" => Some(Power::Germany),
            "italy" => Some(Power::Italy),
            "russia" => Some(Power::Russia),
            "turkey" => Some(Power::Turkey),
            _ => Option::None,
        }
    }
}

/// Static metadata for a region.
pub struct RegionInfo {
    pub tag: &'static str,
    pub name: &'static str,
    pub kind: RegionKind,
    pub is_supply_center: bool,
    pub home_power: Option<Power>,
    pub coasts: &'static [Coast],
}

/// Row constructor for an ordinary region.
const fn region(tag: &'static str, name: &'static str, kind: RegionKind) -> RegionInfo {
    RegionInfo { tag, name, kind, is_supply_center: false, home_power: None, coasts: &[] }
}

/// Row constructor for a supply center; `home` is None for neutral centers.
const fn center(
    tag: &'static str,
    name: &'static str,
    kind: RegionKind,
    home: Option<Power>,
) -> RegionInfo {
    RegionInfo { tag, name, kind, is_supply_center: true, home_power: home, coasts: &[] }
}

/// Row constructor for the bicoastal supply centers.
const fn split_center(
    tag: &'static str,
    name: &'static str,
    home: Option<Power>,
    coasts: &'static [Coast],
) -> RegionInfo {
    RegionInfo {
        tag,
        name,
        kind: RegionKind::Bicoastal,
        is_supply_center: true,
        home_power: home,
        coasts,
    }
}

use RegionKind::{Coastal, Inland, Sea};

/// Region metadata, indexed by `Region as usize`. Rows follow the enum's
/// alphabetical tag order.
pub static REGION_INFO: [RegionInfo; REGION_COUNT] = [
    region("adr", "Adriatic Sea", Sea),
    region("aeg", "Aegean Sea", Sea),
    region("alb", "Albania", Coastal),
    center("ank", "Ankara", Coastal, Some(Power::Turkey)),
    region("apu", "Apulia", Coastal),
    region("arm", "Armenia", Coastal),
    region("bal", "Baltic Sea", Sea),
    region("bar", "Barents Sea", Sea),
    center("bel", "Belgium", Coastal, None),
    center("ber", "Berlin", Coastal, Some(Power::Germany)),
    region("bla", "Black Sea", Sea),
    region("boh", "Bohemia", Inland),
    region("bot", "Gulf of Bothnia", Sea),
    center("bre", "Brest", Coastal, Some(Power::France)),
    center("bud", "Budapest", Inland, Some(Power::Austria)),
    split_center("bul", "Bulgaria", None, &[Coast::East, Coast::South]),
    region("bur", "Burgundy", Inland),
    region("cly", "Clyde", Coastal),
    center("con", "Constantinople", Coastal, Some(Power::Turkey)),
    center("den", "Denmark", Coastal, None),
    region("eas", "Eastern Mediterranean", Sea),
    center("edi", "Edinburgh", Coastal, Some(Power::England)),
    region("eng", "English Channel", Sea),
    region("fin", "Finland", Coastal),
    region("gal", "Galicia", Inland),
    region("gas", "Gascony", Coastal),
    region("gol", "Gulf of Lyon", Sea),
    center("gre", "Greece", Coastal, None),
    region("hel", "Heligoland Bight", Sea),
    center("hol", "Holland", Coastal, None),
    region("ion", "Ionian Sea", Sea),
    region("iri", "Irish Sea", Sea),
    center("kie", "Kiel", Coastal, Some(Power::Germany)),
    center("lon", "London", Coastal, Some(Power::England)),
    region("lvn", "Livonia", Coastal),
    center("lvp", "Liverpool", Coastal, Some(Power::England)),
    region("mao", "Mid-Atlantic Ocean", Sea),
    center("mar", "Marseilles", Coastal, Some(Power::France)),
    center("mos", "Moscow", Inland, Some(Power::Russia)),
    center("mun", "Munich", Inland, Some(Power::Germany)),
    region("naf", "North Africa", Coastal),
    region("nao", "North Atlantic Ocean", Sea),
    center("nap", "Naples", Coastal, Some(Power::Italy)),
    region("nrg", "Norwegian Sea", Sea),
    region("nth", "North Sea", Sea),
    center("nwy", "Norway", Coastal, None),
    center("par", "Paris", Inland, Some(Power::France)),
    region("pic", "Picardy", Coastal),
    region("pie", "Piedmont", Coastal),
    center("por", "Portugal", Coastal, None),
    region("pru", "Prussia", Coastal),
    center("rom", "Rome", Coastal, Some(Power::Italy)),
    region("ruh", "Ruhr", Inland),
    center("rum", "Rumania", Coastal, None),
    center("ser", "Serbia", Inland, None),
    center("sev", "Sevastopol", Coastal, Some(Power::Russia)),
    region("sil", "Silesia", Inland),
    region("ska", "Skagerrak", Sea),
    center("smy", "Smyrna", Coastal, Some(Power::Turkey)),
    split_center("spa", "Spain", None, &[Coast::North, Coast::South]),
    split_center("stp", "St. Petersburg", Some(Power::Russia), &[Coast::North, Coast::South]),
    center("swe", "Sweden", Coastal, None),
    region("syr", "Syria", Coastal),
    center("tri", "Trieste", Coastal, Some(Power::Austria)),
    center("tun", "Tunisia", Coastal, None),
    region("tus", "Tuscany", Coastal),
    region("tyr", "Tyrolia", Inland),
    region("tys", "Tyrrhenian Sea", Sea),
    region("ukr", "Ukraine", Inland),
    center("ven", "Venice", Coastal, Some(Power::Italy)),
    center("vie", "Vienna", Inland, Some(Power::Austria)),
    region("wal", "Wales", Coastal),
    center("war", "Warsaw", Inland, Some(Power::Russia)),
    region("wes", "Western Mediterranean", Sea),
    region("yor", "Yorkshire", Coastal),
];
