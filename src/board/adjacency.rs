//! Border graph for the Classic Diplomacy map.
//!
//! The map data is a table of *undirected* borders, each crossable by one
//! passage type: land (armies), water (fleets), or shoreline (both). A
//! border touching a bicoastal region carries the coast it meets; all other
//! endpoints use `Coast::None`. Directed traversal steps are derived from
//! the table at first use and bucketed per region.
//!
//! Constantinople and Kiel are land bridges: their straits carry both a
//! land and a water crossing, so armies walk across while fleets pass
//! through the region.

use std::sync::LazyLock;

use super::order::Location;
use super::region::{Coast, Region, REGION_COUNT};
use super::unit::UnitKind;

/// How a border may be crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passage {
    /// Land border: armies only.
    Land,
    /// Water border: fleets only.
    Water,
    /// Shared shoreline: either unit kind.
    Shoreline,
}

impl Passage {
    /// Returns true if a unit of the given kind may use this border.
    pub const fn open_to(self, kind: UnitKind) -> bool {
        match self {
            Passage::Land => matches!(kind, UnitKind::Army),
            Passage::Water => matches!(kind, UnitKind::Fleet),
            Passage::Shoreline => true,
        }
    }
}

/// An undirected border between two regions.
#[derive(Debug, Clone, Copy)]
pub struct Border {
    pub a: Region,
    pub a_coast: Coast,
    pub b: Region,
    pub b_coast: Coast,
    pub passage: Passage,
}

const fn land(a: Region, b: Region) -> Border {
    Border { a, a_coast: Coast::None, b, b_coast: Coast::None, passage: Passage::Land }
}
const fn water(a: Region, b: Region) -> Border {
    Border { a, a_coast: Coast::None, b, b_coast: Coast::None, passage: Passage::Water }
}
const fn shoreline(a: Region, b: Region) -> Border {
    Border { a, a_coast: Coast::None, b, b_coast: Coast::None, passage: Passage::Shoreline }
}
/// Water border meeting a specific coast of bicoastal region `b`.
const fn water_at(a: Region, b: Region, b_coast: Coast) -> Border {
    Border { a, a_coast: Coast::None, b, b_coast, passage: Passage::Water }
}

use Coast::{East as Ec, North as Nc, South as Sc};
use Region::*;

/// Number of undirected borders on the Classic map.
pub const BORDER_COUNT: usize = 217;

/// The full border table. Grouped by passage: open water, sea-to-shore,
/// coastal straits, shorelines, land borders. Within each group, borders
/// sort by their first region.
pub static BORDERS: [Border; BORDER_COUNT] = [
    // Open water: 21 sea-to-sea borders.
    water(Adr, Ion),
    water(Aeg, Eas),
    water(Aeg, Ion),
    water(Bal, Bot),
    water(Eng, Iri),
    water(Eng, Mao),
    water(Eng, Nth),
    water(Gol, Tys),
    water(Gol, Wes),
    water(Hel, Nth),
    water(Ion, Eas),
    water(Ion, Tys),
    water(Iri, Mao),
    water(Iri, Nao),
    water(Mao, Nao),
    water(Mao, Wes),
    water(Nao, Nrg),
    water(Nrg, Bar),
    water(Nth, Nrg),
    water(Nth, Ska),
    water(Tys, Wes),
    // Sea to shore: 75 borders between a sea and the coasts it washes.
    water(Adr, Alb),
    water(Adr, Apu),
    water(Adr, Tri),
    water(Adr, Ven),
    water_at(Aeg, Bul, Sc),
    water(Aeg, Con),
    water(Aeg, Gre),
    water(Aeg, Smy),
    water(Bal, Ber),
    water(Bal, Den),
    water(Bal, Kie),
    water(Bal, Lvn),
    water(Bal, Pru),
    water(Bal, Swe),
    water(Bar, Nwy),
    water_at(Bar, Stp, Nc),
    water(Bla, Ank),
    water(Bla, Arm),
    water_at(Bla, Bul, Ec),
    water(Bla, Con),
    water(Bla, Rum),
    water(Bla, Sev),
    water(Bot, Fin),
    water(Bot, Lvn),
    water_at(Bot, Stp, Sc),
    water(Bot, Swe),
    water(Eas, Smy),
    water(Eas, Syr),
    water(Eng, Bel),
    water(Eng, Bre),
    water(Eng, Lon),
    water(Eng, Pic),
    water(Eng, Wal),
    water(Gol, Mar),
    water(Gol, Pie),
    water_at(Gol, Spa, Sc),
    water(Gol, Tus),
    water(Hel, Den),
    water(Hel, Hol),
    water(Hel, Kie),
    water(Ion, Alb),
    water(Ion, Apu),
    water(Ion, Gre),
    water(Ion, Nap),
    water(Ion, Tun),
    water(Iri, Lvp),
    water(Iri, Wal),
    water(Mao, Bre),
    water(Mao, Gas),
    water(Mao, Naf),
    water(Mao, Por),
    water_at(Mao, Spa, Nc),
    water_at(Mao, Spa, Sc),
    water(Nao, Cly),
    water(Nao, Lvp),
    water(Nrg, Cly),
    water(Nrg, Edi),
    water(Nrg, Nwy),
    water(Nth, Bel),
    water(Nth, Den),
    water(Nth, Edi),
    water(Nth, Hol),
    water(Nth, Lon),
    water(Nth, Nwy),
    water(Nth, Yor),
    water(Ska, Den),
    water(Ska, Nwy),
    water(Ska, Swe),
    water(Tys, Nap),
    water(Tys, Rom),
    water(Tys, Tun),
    water(Tys, Tus),
    water(Wes, Naf),
    water_at(Wes, Spa, Sc),
    water(Wes, Tun),
    // Coastal straits: 11 fleet passages hugging a bicoastal coast.
    water_at(Con, Bul, Ec),
    water_at(Con, Bul, Sc),
    water_at(Fin, Stp, Sc),
    water_at(Gas, Spa, Nc),
    water_at(Gre, Bul, Sc),
    water_at(Lvn, Stp, Sc),
    water_at(Mar, Spa, Sc),
    water_at(Nwy, Stp, Nc),
    water_at(Por, Spa, Nc),
    water_at(Por, Spa, Sc),
    water_at(Rum, Bul, Ec),
    // Shorelines: 33 coastal borders along a shared sea face.
    shoreline(Alb, Gre),
    shoreline(Alb, Tri),
    shoreline(Ank, Arm),
    shoreline(Ank, Con),
    shoreline(Apu, Nap),
    shoreline(Apu, Ven),
    shoreline(Bel, Hol),
    shoreline(Bel, Pic),
    shoreline(Ber, Kie),
    shoreline(Ber, Pru),
    shoreline(Bre, Gas),
    shoreline(Bre, Pic),
    shoreline(Cly, Edi),
    shoreline(Cly, Lvp),
    shoreline(Con, Smy),
    shoreline(Den, Kie),
    shoreline(Den, Swe),
    shoreline(Edi, Yor),
    shoreline(Fin, Swe),
    shoreline(Lon, Wal),
    shoreline(Lon, Yor),
    shoreline(Lvp, Wal),
    shoreline(Mar, Pie),
    shoreline(Naf, Tun),
    shoreline(Nwy, Swe),
    shoreline(Pie, Tus),
    shoreline(Pru, Lvn),
    shoreline(Rom, Nap),
    shoreline(Rom, Tus),
    shoreline(Sev, Arm),
    shoreline(Sev, Rum),
    shoreline(Smy, Syr),
    shoreline(Tri, Ven),
    // Land borders: 77 army-only crossings, including coastal pairs whose
    // shores face different seas (e.g. Rome-Venice) and the straits at
    // Constantinople and the bicoastal landward sides.
    land(Ank, Smy),
    land(Apu, Rom),
    land(Arm, Syr),
    land(Boh, Gal),
    land(Boh, Mun),
    land(Boh, Sil),
    land(Boh, Tyr),
    land(Boh, Vie),
    land(Bud, Gal),
    land(Bud, Rum),
    land(Bud, Ser),
    land(Bud, Tri),
    land(Bud, Vie),
    land(Bur, Bel),
    land(Bur, Gas),
    land(Bur, Mar),
    land(Bur, Mun),
    land(Bur, Par),
    land(Bur, Pic),
    land(Bur, Ruh),
    land(Con, Bul),
    land(Edi, Lvp),
    land(Fin, Nwy),
    land(Fin, Stp),
    land(Gal, Rum),
    land(Gal, Sil),
    land(Gal, Ukr),
    land(Gal, Vie),
    land(Gal, War),
    land(Gas, Mar),
    land(Gas, Spa),
    land(Gre, Bul),
    land(Lvn, Stp),
    land(Lvp, Yor),
    land(Mar, Spa),
    land(Mos, Lvn),
    land(Mos, Sev),
    land(Mos, Stp),
    land(Mos, Ukr),
    land(Mos, War),
    land(Mun, Ber),
    land(Mun, Kie),
    land(Mun, Ruh),
    land(Mun, Sil),
    land(Mun, Tyr),
    land(Nwy, Stp),
    land(Par, Bre),
    land(Par, Gas),
    land(Par, Pic),
    land(Pie, Ven),
    land(Por, Spa),
    land(Rom, Ven),
    land(Ruh, Bel),
    land(Ruh, Hol),
    land(Ruh, Kie),
    land(Rum, Bul),
    land(Ser, Alb),
    land(Ser, Bul),
    land(Ser, Gre),
    land(Ser, Rum),
    land(Ser, Tri),
    land(Sil, Ber),
    land(Sil, Pru),
    land(Sil, War),
    land(Smy, Arm),
    land(Tus, Ven),
    land(Tyr, Pie),
    land(Tyr, Tri),
    land(Tyr, Ven),
    land(Tyr, Vie),
    land(Ukr, Rum),
    land(Ukr, Sev),
    land(Ukr, War),
    land(Vie, Tri),
    land(Wal, Yor),
    land(War, Lvn),
    land(War, Pru),
];

/// One direction of a border, as seen from a region.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub to: Region,
    pub from_coast: Coast,
    pub to_coast: Coast,
    pub passage: Passage,
}

/// Per-region traversal steps, expanded from the undirected table once at
/// first use.
static STEP_MAP: LazyLock<[Vec<Step>; REGION_COUNT]> = LazyLock::new(|| {
    let mut buckets: [Vec<Step>; REGION_COUNT] = std::array::from_fn(|_| Vec::new());
    for border in &BORDERS {
        buckets[border.a as usize].push(Step {
            to: border.b,
            from_coast: border.a_coast,
            to_coast: border.b_coast,
            passage: border.passage,
        });
        buckets[border.b as usize].push(Step {
            to: border.a,
            from_coast: border.b_coast,
            to_coast: border.a_coast,
            passage: border.passage,
        });
    }
    buckets
});

/// Returns the traversal steps leaving a region.
#[inline]
pub fn steps_from(region: Region) -> &'static [Step] {
    &STEP_MAP[region as usize]
}

/// A stated coast agrees with a border coast when either side leaves the
/// coast open or both name the same one.
#[inline]
fn coasts_agree(border: Coast, stated: Coast) -> bool {
    border == Coast::None || stated == Coast::None || border == stated
}

/// Returns true if a unit of the given kind may move from `src` to `dst` in
/// one step, ignoring other units.
///
/// Fleet origins in bicoastal regions require `src_coast`; a `dst_coast` of
/// None accepts any coast of the destination.
pub fn is_adjacent(
    src: Region,
    src_coast: Coast,
    dst: Region,
    dst_coast: Coast,
    kind: UnitKind,
) -> bool {
    steps_from(src).iter().any(|step| {
        step.to == dst
            && step.passage.open_to(kind)
            && coasts_agree(step.from_coast, src_coast)
            && coasts_agree(step.to_coast, dst_coast)
    })
}

/// Returns the regions reachable in one step by a unit of the given kind,
/// as bare region tags (coast qualifiers stripped).
pub fn adjacent_regions(region: Region, kind: UnitKind, coast: Coast) -> Vec<Region> {
    let mut reachable = Vec::new();
    for step in steps_from(region) {
        if !step.passage.open_to(kind) || !coasts_agree(step.from_coast, coast) {
            continue;
        }
        if !reachable.contains(&step.to) {
            reachable.push(step.to);
        }
    }
    reachable
}

/// Returns the landings a fleet at (src, src_coast) can make in `dst`: one
/// location per reachable coast of the destination.
pub fn fleet_landings(src: Region, src_coast: Coast, dst: Region) -> Vec<Location> {
    let mut landings: Vec<Location> = Vec::new();
    for step in steps_from(src) {
        if step.to != dst
            || !step.passage.open_to(UnitKind::Fleet)
            || !coasts_agree(step.from_coast, src_coast)
        {
            continue;
        }
        let landing = Location::with_coast(dst, step.to_coast);
        if !landings.contains(&landing) {
            landings.push(landing);
        }
    }
    landings
}

#[cfg(test)]
mod tests {
    use super::super::region::{RegionKind, ALL_REGIONS};
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn border_count() {
        assert_eq!(BORDERS.len(), BORDER_COUNT);
    }

    #[test]
    fn no_region_borders_itself() {
        for border in BORDERS.iter() {
            assert_ne!(border.a, border.b, "self-border at {:?}", border.a);
        }
    }

    #[test]
    fn no_duplicate_borders() {
        for (i, x) in BORDERS.iter().enumerate() {
            let dup = BORDERS.iter().skip(i + 1).any(|y| {
                let same = x.a == y.a && x.b == y.b && x.a_coast == y.a_coast && x.b_coast == y.b_coast;
                let flipped =
                    x.a == y.b && x.b == y.a && x.a_coast == y.b_coast && x.b_coast == y.a_coast;
                same || flipped
            });
            assert!(!dup, "duplicate border {:?}-{:?}", x.a, x.b);
        }
    }

    #[test]
    fn steps_mirror_in_both_directions() {
        for region in ALL_REGIONS.iter() {
            for step in steps_from(*region) {
                let mirrored = steps_from(step.to).iter().any(|back| {
                    back.to == *region
                        && back.from_coast == step.to_coast
                        && back.to_coast == step.from_coast
                        && back.passage == step.passage
                });
                assert!(
                    mirrored,
                    "step {:?} -> {:?} has no mirror",
                    region, step.to
                );
            }
        }
    }

    #[test]
    fn every_region_connects_somewhere() {
        for region in ALL_REGIONS.iter() {
            assert!(!steps_from(*region).is_empty(), "{:?} is isolated", region);
        }
    }

    #[test]
    fn coast_qualified_endpoints_are_bicoastal() {
        for border in BORDERS.iter() {
            if border.a_coast != Coast::None {
                assert!(border.a.is_bicoastal());
            }
            if border.b_coast != Coast::None {
                assert!(border.b.is_bicoastal());
            }
        }
    }

    #[test]
    fn land_bridges() {
        // Armies cross the straits at Constantinople and Kiel; fleets pass
        // through the regions themselves.
        assert!(is_adjacent(Region::Con, Coast::None, Region::Smy, Coast::None, UnitKind::Army));
        assert!(is_adjacent(Region::Con, Coast::None, Region::Ank, Coast::None, UnitKind::Army));
        assert!(is_adjacent(Region::Con, Coast::None, Region::Bul, Coast::None, UnitKind::Army));
        assert!(is_adjacent(Region::Kie, Coast::None, Region::Den, Coast::None, UnitKind::Army));
        assert!(is_adjacent(Region::Kie, Coast::None, Region::Ber, Coast::None, UnitKind::Army));
    }

    #[test]
    fn smyrna_ankara_is_land_only() {
        // Shared land border, but their shores face different seas.
        assert!(is_adjacent(Region::Smy, Coast::None, Region::Ank, Coast::None, UnitKind::Army));
        assert!(!is_adjacent(Region::Smy, Coast::None, Region::Ank, Coast::None, UnitKind::Fleet));
    }

    #[test]
    fn vienna_venice_not_adjacent() {
        assert!(!is_adjacent(Region::Vie, Coast::None, Region::Ven, Coast::None, UnitKind::Army));
        assert!(!is_adjacent(Region::Vie, Coast::None, Region::Ven, Coast::None, UnitKind::Fleet));
    }

    #[test]
    fn vienna_neighbors() {
        let reachable: HashSet<Region> =
            adjacent_regions(Region::Vie, UnitKind::Army, Coast::None).into_iter().collect();
        let expected: HashSet<Region> =
            [Region::Boh, Region::Bud, Region::Gal, Region::Tyr, Region::Tri]
                .into_iter()
                .collect();
        assert_eq!(reachable, expected);
    }

    #[test]
    fn bicoastal_bulgaria() {
        let by_army: HashSet<Region> =
            adjacent_regions(Region::Bul, UnitKind::Army, Coast::None).into_iter().collect();
        assert_eq!(
            by_army,
            [Region::Con, Region::Gre, Region::Rum, Region::Ser].into_iter().collect()
        );

        let east: HashSet<Region> =
            adjacent_regions(Region::Bul, UnitKind::Fleet, Coast::East).into_iter().collect();
        assert_eq!(east, [Region::Bla, Region::Con, Region::Rum].into_iter().collect());

        let south: HashSet<Region> =
            adjacent_regions(Region::Bul, UnitKind::Fleet, Coast::South).into_iter().collect();
        assert_eq!(south, [Region::Aeg, Region::Con, Region::Gre].into_iter().collect());
    }

    #[test]
    fn bicoastal_spain() {
        let north: HashSet<Region> =
            adjacent_regions(Region::Spa, UnitKind::Fleet, Coast::North).into_iter().collect();
        assert_eq!(north, [Region::Mao, Region::Gas, Region::Por].into_iter().collect());

        let south: HashSet<Region> =
            adjacent_regions(Region::Spa, UnitKind::Fleet, Coast::South).into_iter().collect();
        assert_eq!(
            south,
            [Region::Gol, Region::Mao, Region::Mar, Region::Por, Region::Wes]
                .into_iter()
                .collect()
        );
    }

    #[test]
    fn bicoastal_st_petersburg() {
        let north: HashSet<Region> =
            adjacent_regions(Region::Stp, UnitKind::Fleet, Coast::North).into_iter().collect();
        assert_eq!(north, [Region::Bar, Region::Nwy].into_iter().collect());

        let south: HashSet<Region> =
            adjacent_regions(Region::Stp, UnitKind::Fleet, Coast::South).into_iter().collect();
        assert_eq!(south, [Region::Bot, Region::Fin, Region::Lvn].into_iter().collect());
    }

    #[test]
    fn fleet_landings_in_spain() {
        let from_mao = fleet_landings(Region::Mao, Coast::None, Region::Spa);
        assert_eq!(from_mao.len(), 2);
        assert!(from_mao.contains(&Location::with_coast(Region::Spa, Coast::North)));
        assert!(from_mao.contains(&Location::with_coast(Region::Spa, Coast::South)));

        let from_mar = fleet_landings(Region::Mar, Coast::None, Region::Spa);
        assert_eq!(from_mar, vec![Location::with_coast(Region::Spa, Coast::South)]);
    }

    #[test]
    fn seas_have_no_land_crossings() {
        for region in ALL_REGIONS.iter() {
            if region.kind() == RegionKind::Sea {
                assert!(
                    adjacent_regions(*region, UnitKind::Army, Coast::None).is_empty(),
                    "{:?} has an army crossing",
                    region
                );
            }
        }
    }

    #[test]
    fn inland_regions_have_no_water_crossings() {
        for region in ALL_REGIONS.iter() {
            if region.kind() == RegionKind::Inland {
                assert!(
                    adjacent_regions(*region, UnitKind::Fleet, Coast::None).is_empty(),
                    "{:?} has a fleet crossing",
                    region
                );
            }
        }
    }

    #[test]
    fn different_sea_face_pairs_are_land_only() {
        let pairs = [
            (Region::Rom, Region::Ven),
            (Region::Gas, Region::Mar),
            (Region::Edi, Region::Lvp),
            (Region::Wal, Region::Yor),
            (Region::Fin, Region::Nwy),
            (Region::Arm, Region::Syr),
        ];
        for (a, b) in pairs {
            assert!(is_adjacent(a, Coast::None, b, Coast::None, UnitKind::Army));
            assert!(!is_adjacent(a, Coast::None, b, Coast::None, UnitKind::Fleet));
        }
    }

    #[test]
    fn known_water_routes() {
        assert!(is_adjacent(Region::Ank, Coast::None, Region::Bla, Coast::None, UnitKind::Fleet));
        assert!(!is_adjacent(Region::Ank, Coast::None, Region::Bla, Coast::None, UnitKind::Army));
        assert!(is_adjacent(Region::Eng, Coast::None, Region::Bre, Coast::None, UnitKind::Fleet));
        assert!(is_adjacent(Region::Ank, Coast::None, Region::Arm, Coast::None, UnitKind::Fleet));
        assert!(is_adjacent(Region::Ank, Coast::None, Region::Arm, Coast::None, UnitKind::Army));
    }

    #[test]
    fn passage_rules() {
        assert!(Passage::Land.open_to(UnitKind::Army));
        assert!(!Passage::Land.open_to(UnitKind::Fleet));
        assert!(Passage::Water.open_to(UnitKind::Fleet));
        assert!(!Passage::Water.open_to(UnitKind::Army));
        assert!(Passage::Shoreline.open_to(UnitKind::Army));
        assert!(Passage::Shoreline.open_to(UnitKind::Fleet));
    }
}
