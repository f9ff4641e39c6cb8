//! Movement-phase adjudication.
//!
//! Resolution pipeline: default holds, structural validation (void orders
//! are treated as holds for strength purposes), convoy-path discovery,
//! support cutting, strength calculation, iterative move resolution with
//! circular-movement detection, dislodgement bookkeeping with retreat-set
//! computation, and construction of the successor state.

use tracing::warn;

use crate::board::{
    adjacent_regions, fleet_landings, is_adjacent, Coast, DislodgedUnit, GameState, Location,
    Order, Power, Region, Season, UnitKind, REGION_COUNT,
};

use super::{next_turn, update_sc_ownership, Adjudication, OrderStatus, Resolution};

/// Iteration cap for the move-resolution fix-point. Reaching it marks the
/// remaining moves bounced with reason "unresolvable".
const RESOLUTION_CAP: usize = 100;

/// What a unit effectively does this turn, after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Holding in place: an explicit hold, a defaulted hold, or a void order.
    Stay,
    Move {
        dest: Region,
        dest_coast: Coast,
        convoy: bool,
    },
    SupportHold {
        target: Region,
    },
    SupportMove {
        src: Region,
        dest: Region,
    },
    Convoy {
        src: Region,
        dest: Region,
    },
}

/// Resolution progress of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Pending,
    Success,
    Failed,
}

/// One unit's adjudication entry.
struct UnitEntry {
    region: Region,
    power: Power,
    kind: UnitKind,
    coast: Coast,
    action: Action,
    /// Index into the input order slice, None for defaulted holds.
    input: Option<usize>,
    /// Move resolution state (movers only).
    mark: Mark,
    /// The move's convoy route was searched and not found.
    convoy_failed: bool,
    /// Support was cut (supports only).
    cut: bool,
    /// Attack strength (movers only).
    attack: i32,
    /// Hold strength when staying.
    hold: i32,
    /// Origin of the successful attacker that dislodged this unit.
    dislodged_by: Option<Region>,
    /// Still pending when resolution gave up (iteration cap).
    unresolved: bool,
}

/// Per-input-order outcome recorded before the final resolution pass.
#[derive(Clone, Copy)]
enum InputOutcome {
    /// Structurally illegal; the reason is final.
    Void(&'static str),
    /// Valid and mapped onto the unit entry at the given region.
    Entry(Region),
}

pub fn resolve_movement(state: &GameState, orders: &[(Order, Power)]) -> Adjudication {
    let mut resolver = Resolver::new(state);
    resolver.ingest(orders);
    resolver.discover_convoy_routes();
    resolver.cut_supports();
    resolver.compute_strengths();
    resolver.resolve_moves();
    resolver.finish(orders)
}

struct Resolver<'a> {
    state: &'a GameState,
    entries: Vec<UnitEntry>,
    lookup: [i16; REGION_COUNT],
    outcomes: Vec<InputOutcome>,
}

impl<'a> Resolver<'a> {
    fn new(state: &'a GameState) -> Self {
        Resolver {
            state,
            entries: Vec::with_capacity(34),
            lookup: [-1; REGION_COUNT],
            outcomes: Vec::new(),
        }
    }

    fn entry_at(&self, region: Region) -> Option<&UnitEntry> {
        let idx = self.lookup[region as usize];
        if idx < 0 {
            return None;
        }
        Some(&self.entries[idx as usize])
    }

    /// Seeds one entry per unit (defaulting to a hold), then applies each
    /// input order, validating structure and recording void reasons.
    fn ingest(&mut self, orders: &[(Order, Power)]) {
        for region in crate::board::ALL_REGIONS.iter() {
            if let Some((power, kind)) = self.state.unit_at(*region) {
                let idx = self.entries.len();
                self.entries.push(UnitEntry {
                    region: *region,
                    power,
                    kind,
                    coast: self.state.coast_at(*region),
                    action: Action::Stay,
                    input: None,
                    mark: Mark::Pending,
                    convoy_failed: false,
                    cut: false,
                    attack: 1,
                    hold: 1,
                    dislodged_by: None,
                    unresolved: false,
                });
                self.lookup[*region as usize] = idx as i16;
            }
        }

        for (i, (order, power)) in orders.iter().enumerate() {
            let outcome = self.apply_order(i, order, *power);
            self.outcomes.push(outcome);
        }
    }

    /// Validates one input order and attaches it to its unit entry.
    fn apply_order(&mut self, input_idx: usize, order: &Order, power: Power) -> InputOutcome {
        let region = match order.unit_region() {
            Some(r) => r,
            None => return InputOutcome::Void("wrong phase for order"),
        };
        if matches!(order, Order::Retreat { .. } | Order::Disband { .. }) {
            return InputOutcome::Void("wrong phase for order");
        }

        let entry_idx = self.lookup[region as usize];
        if entry_idx < 0 {
            return InputOutcome::Void("no unit at region");
        }
        let entry_idx = entry_idx as usize;
        let (entry_power, entry_kind, entry_coast) = {
            let e = &self.entries[entry_idx];
            (e.power, e.kind, e.coast)
        };
        if entry_power != power {
            return InputOutcome::Void("unit belongs to another power");
        }
        if self.entries[entry_idx].input.is_some() {
            return InputOutcome::Void("duplicate order for unit");
        }
        if let Some(unit) = order.unit() {
            if unit.kind != entry_kind {
                return InputOutcome::Void("unit kind mismatch");
            }
        }

        let action = match *order {
            Order::Hold { .. } => Action::Stay,
            Order::Move { dest, via_convoy, .. } => {
                match self.validate_move(region, entry_kind, entry_coast, dest, via_convoy) {
                    Ok(action) => action,
                    Err(reason) => return InputOutcome::Void(reason),
                }
            }
            Order::SupportHold { supported, .. } => {
                let target = supported.location.region;
                if target == region {
                    return InputOutcome::Void("cannot support itself");
                }
                if self.entry_at(target).is_none() {
                    return InputOutcome::Void("no unit to support");
                }
                if !self.can_reach(region, entry_kind, entry_coast, target) {
                    return InputOutcome::Void("cannot reach supported region");
                }
                Action::SupportHold { target }
            }
            Order::SupportMove { supported, dest, .. } => {
                let src = supported.location.region;
                if dest.region == region {
                    return InputOutcome::Void("cannot support into own region");
                }
                if self.entry_at(src).is_none() {
                    return InputOutcome::Void("no unit to support");
                }
                if !self.can_reach(region, entry_kind, entry_coast, dest.region) {
                    return InputOutcome::Void("cannot reach support destination");
                }
                Action::SupportMove { src, dest: dest.region }
            }
            Order::Convoy { army, dest, .. } => {
                if entry_kind != UnitKind::Fleet || !region.is_sea() {
                    return InputOutcome::Void("only sea fleets may convoy");
                }
                match self.entry_at(army.region) {
                    Some(e) if e.kind == UnitKind::Army => {}
                    _ => return InputOutcome::Void("no army to convoy"),
                }
                if dest.region.is_sea() {
                    return InputOutcome::Void("cannot convoy to sea");
                }
                Action::Convoy { src: army.region, dest: dest.region }
            }
            Order::Retreat { .. }
            | Order::Disband { .. }
            | Order::Build { .. }
            | Order::Waive { .. } => unreachable!("filtered above"),
        };

        let e = &mut self.entries[entry_idx];
        e.action = action;
        e.input = Some(input_idx);
        InputOutcome::Entry(region)
    }

    fn validate_move(
        &self,
        src: Region,
        kind: UnitKind,
        coast: Coast,
        dest: Location,
        via_convoy: bool,
    ) -> Result<Action, &'static str> {
        if dest.region == src {
            return Err("moves to its own region");
        }
        if !kind.can_occupy(dest.region.kind()) {
            return Err("cannot occupy destination");
        }

        match kind {
            UnitKind::Fleet => {
                if via_convoy {
                    return Err("only armies may be convoyed");
                }
                if dest.region.is_bicoastal() && dest.coast == Coast::None {
                    return Err("coast required");
                }
                if !is_adjacent(src, coast, dest.region, dest.coast, UnitKind::Fleet) {
                    return Err("destination unreachable");
                }
                Ok(Action::Move { dest: dest.region, dest_coast: dest.coast, convoy: false })
            }
            UnitKind::Army => {
                let adjacent = is_adjacent(src, Coast::None, dest.region, Coast::None, UnitKind::Army);
                if via_convoy || !adjacent {
                    // Convoy requested, or implied by a non-adjacent destination.
                    Ok(Action::Move { dest: dest.region, dest_coast: Coast::None, convoy: true })
                } else {
                    Ok(Action::Move { dest: dest.region, dest_coast: Coast::None, convoy: false })
                }
            }
        }
    }

    /// True if a unit of the given kind at (region, coast) projects force
    /// into `target` in one step. Coast specifics at the target are ignored:
    /// support lands on the region, not a coast.
    fn can_reach(&self, region: Region, kind: UnitKind, coast: Coast, target: Region) -> bool {
        is_adjacent(region, coast, target, Coast::None, kind)
    }

    /// Breadth-first search over convoying fleets for each move that needs a
    /// route. The search is static: it considers fleets as ordered, not
    /// their eventual fate.
    fn discover_convoy_routes(&mut self) {
        let n = self.entries.len();
        for i in 0..n {
            let (src, dest) = match self.entries[i].action {
                Action::Move { dest, convoy: true, .. } => (self.entries[i].region, dest),
                _ => continue,
            };
            if !self.convoy_route_exists(src, dest) {
                self.entries[i].convoy_failed = true;
                self.entries[i].mark = Mark::Failed;
            }
        }
    }

    fn convoy_route_exists(&self, src: Region, dest: Region) -> bool {
        // Collect the fleets ordered to convoy this (src, dest) pair.
        let convoyers: Vec<Region> = self
            .entries
            .iter()
            .filter(|e| matches!(e.action, Action::Convoy { src: s, dest: d } if s == src && d == dest))
            .map(|e| e.region)
            .collect();
        if convoyers.is_empty() {
            return false;
        }

        let mut visited = [false; REGION_COUNT];
        let mut queue: Vec<Region> = Vec::with_capacity(convoyers.len());

        for c in &convoyers {
            if is_adjacent(src, Coast::None, *c, Coast::None, UnitKind::Fleet) {
                visited[*c as usize] = true;
                queue.push(*c);
            }
        }

        let mut head = 0;
        while head < queue.len() {
            let current = queue[head];
            head += 1;

            if is_adjacent(current, Coast::None, dest, Coast::None, UnitKind::Fleet) {
                return true;
            }

            for c in &convoyers {
                if !visited[*c as usize]
                    && is_adjacent(current, Coast::None, *c, Coast::None, UnitKind::Fleet)
                {
                    visited[*c as usize] = true;
                    queue.push(*c);
                }
            }
        }

        false
    }

    /// Marks supports cut by attacks on the supporter's region.
    ///
    /// The classic exception: an attack arriving from the very region the
    /// support directs force into does not cut it, unless the support is a
    /// support-hold of that attacker's own region. Attacks by the
    /// supporter's power never cut, and a convoyed attack with no route
    /// cannot cut.
    fn cut_supports(&mut self) {
        let n = self.entries.len();
        for i in 0..n {
            let (force_into, is_support_hold) = match self.entries[i].action {
                Action::SupportHold { target } => (target, true),
                Action::SupportMove { dest, .. } => (dest, false),
                _ => continue,
            };
            let support_region = self.entries[i].region;
            let support_power = self.entries[i].power;

            let cut = self.entries.iter().any(|m| {
                let m_dest = match m.action {
                    Action::Move { dest, .. } => dest,
                    _ => return false,
                };
                m_dest == support_region
                    && !m.convoy_failed
                    && m.power != support_power
                    && (m.region != force_into || is_support_hold)
            });

            if cut {
                self.entries[i].cut = true;
            }
        }
    }

    /// Computes static attack and hold strengths from the uncut supports.
    fn compute_strengths(&mut self) {
        let n = self.entries.len();

        for i in 0..n {
            match self.entries[i].action {
                Action::Move { dest, .. } => {
                    if self.entries[i].convoy_failed {
                        continue;
                    }
                    let src = self.entries[i].region;
                    let mut strength = 1;
                    for s in &self.entries {
                        let (s_src, s_dest) = match s.action {
                            Action::SupportMove { src, dest } => (src, dest),
                            _ => continue,
                        };
                        if s.cut || s_src != src || s_dest != dest {
                            continue;
                        }
                        // A support that would dislodge the supporter's own
                        // stationary unit does not count.
                        if let Some(defender) = self.entry_at(dest) {
                            if defender.power == s.power
                                && !matches!(defender.action, Action::Move { .. })
                            {
                                continue;
                            }
                        }
                        strength += 1;
                    }
                    self.entries[i].attack = strength;
                }
                _ => {
                    let region = self.entries[i].region;
                    let mut strength = 1;
                    for s in &self.entries {
                        match s.action {
                            Action::SupportHold { target } if target == region && !s.cut => {
                                strength += 1;
                            }
                            _ => {}
                        }
                    }
                    self.entries[i].hold = strength;
                }
            }
        }
    }

    fn is_live_mover(e: &UnitEntry) -> bool {
        matches!(e.action, Action::Move { .. }) && !e.convoy_failed
    }

    fn move_dest(e: &UnitEntry) -> Option<Region> {
        match e.action {
            Action::Move { dest, .. } if !e.convoy_failed => Some(dest),
            _ => None,
        }
    }

    /// Iterates move resolution to a fix-point, then breaks circular chains,
    /// then gives up on anything left (bounded by `RESOLUTION_CAP`).
    fn resolve_moves(&mut self) {
        let n = self.entries.len();
        let mut iterations = 0;

        loop {
            iterations += 1;
            if iterations > RESOLUTION_CAP {
                warn!("movement resolution exceeded {} iterations", RESOLUTION_CAP);
                break;
            }

            let mut changed = false;
            for i in 0..n {
                if !Self::is_live_mover(&self.entries[i]) || self.entries[i].mark != Mark::Pending {
                    continue;
                }
                if self.try_resolve_move(i) {
                    changed = true;
                }
            }

            if changed {
                continue;
            }

            // Fix-point with pending moves left: circular movement.
            if !self.break_cycles() {
                break;
            }
        }

        // Anything still pending is unresolvable: bounce it.
        for e in self.entries.iter_mut() {
            if Self::is_live_mover(e) && e.mark == Mark::Pending {
                e.mark = Mark::Failed;
                e.unresolved = true;
            }
        }
        self.record_dislodgements();
    }

    /// Attempts to decide one pending move. Returns true if its mark changed.
    fn try_resolve_move(&mut self, i: usize) -> bool {
        let (dest, attack, src, power, convoyed) = {
            let e = &self.entries[i];
            let (dest, convoyed) = match e.action {
                Action::Move { dest, convoy, .. } => (dest, convoy),
                _ => return false,
            };
            (dest, e.attack, e.region, e.power, convoyed)
        };

        // Strongest rival prevent strength among other moves into dest.
        let max_prevent = self
            .entries
            .iter()
            .filter(|o| o.region != src && Self::move_dest(o) == Some(dest))
            .map(|o| o.attack)
            .max()
            .unwrap_or(0);

        if attack <= max_prevent {
            self.entries[i].mark = Mark::Failed;
            return true;
        }

        // Head-to-head: the destination unit is moving into our region.
        // Convoyed legs pass over the strait and do not collide.
        let h2h = self.entry_at(dest).and_then(|opp| match opp.action {
            Action::Move { dest: od, convoy: oc, .. }
                if od == src && !oc && !convoyed && !opp.convoy_failed =>
            {
                Some((opp.attack, opp.power))
            }
            _ => None,
        });

        if let Some((defend, opp_power)) = h2h {
            if attack > defend {
                if opp_power == power {
                    // A move may never dislodge a unit of the same power.
                    self.entries[i].mark = Mark::Failed;
                } else {
                    self.entries[i].mark = Mark::Success;
                    let opp_idx = self.lookup[dest as usize] as usize;
                    self.entries[opp_idx].mark = Mark::Failed;
                }
            } else {
                self.entries[i].mark = Mark::Failed;
            }
            return true;
        }

        // Destination defender: stationary, or a mover whose fate decides
        // whether the region is vacated.
        let defender = self.entry_at(dest);
        let (hold, defender_stays, defender_power) = match defender {
            None => (0, false, None),
            Some(d) if Self::is_live_mover(d) => match d.mark {
                Mark::Success => (0, false, None),
                Mark::Failed => (1, true, Some(d.power)),
                Mark::Pending => return false, // cannot decide yet
            },
            Some(d) => (d.hold, true, Some(d.power)),
        };

        if attack > hold {
            if defender_stays && defender_power == Some(power) {
                self.entries[i].mark = Mark::Failed;
            } else {
                self.entries[i].mark = Mark::Success;
            }
        } else {
            self.entries[i].mark = Mark::Failed;
        }
        true
    }

    /// Detects cycles among pending moves (A->B, B->C, ..., Z->A) and
    /// resolves each: all members succeed simultaneously unless an outside
    /// attacker matches a member's strength, in which case the cycle
    /// bounces. Returns true if anything was resolved.
    fn break_cycles(&mut self) -> bool {
        let n = self.entries.len();
        let mut progressed = false;

        for start in 0..n {
            if !Self::is_live_mover(&self.entries[start])
                || self.entries[start].mark != Mark::Pending
            {
                continue;
            }

            // Walk the chain of pending movers from this one.
            let mut chain = vec![start];
            let mut current = start;
            let cycle = loop {
                let dest = match Self::move_dest(&self.entries[current]) {
                    Some(d) => d,
                    None => break None,
                };
                let next = self.lookup[dest as usize];
                if next < 0 {
                    break None;
                }
                let next = next as usize;
                if !Self::is_live_mover(&self.entries[next])
                    || self.entries[next].mark != Mark::Pending
                {
                    break None;
                }
                if next == start {
                    break Some(chain.clone());
                }
                if chain.contains(&next) {
                    break None; // cycle exists but does not include `start`
                }
                chain.push(next);
                current = next;
            };

            // True head-to-head pairs never stay pending, so a 2-chain here
            // is a convoyed swap and rotates like any longer cycle.
            let members = match cycle {
                Some(m) if m.len() >= 2 => m,
                _ => continue,
            };

            // An outside attacker with matching strength stops the rotation.
            let blocked = members.iter().any(|&m| {
                let dest = Self::move_dest(&self.entries[m]).unwrap();
                let attack = self.entries[m].attack;
                self.entries.iter().enumerate().any(|(j, o)| {
                    !members.contains(&j) && Self::move_dest(o) == Some(dest) && o.attack >= attack
                })
            });

            let mark = if blocked { Mark::Failed } else { Mark::Success };
            for &m in &members {
                self.entries[m].mark = mark;
            }
            progressed = true;
        }

        progressed
    }

    /// Records which stationary (or failed-moving) units were displaced by a
    /// successful attack.
    fn record_dislodgements(&mut self) {
        let n = self.entries.len();
        for i in 0..n {
            if self.entries[i].mark != Mark::Success {
                continue;
            }
            let (src, dest) = match self.entries[i].action {
                Action::Move { dest, .. } => (self.entries[i].region, dest),
                _ => continue,
            };
            let defender_idx = self.lookup[dest as usize];
            if defender_idx < 0 {
                continue;
            }
            let defender_idx = defender_idx as usize;
            let defender_moved = Self::is_live_mover(&self.entries[defender_idx])
                && self.entries[defender_idx].mark == Mark::Success;
            if !defender_moved {
                self.entries[defender_idx].dislodged_by = Some(src);
            }
        }
    }

    /// Builds the successor state, computes retreat sets, assigns resolution
    /// records, and advances the turn.
    fn finish(self, orders: &[(Order, Power)]) -> Adjudication {
        let mut next = self.state.clone();
        next.dislodged.clear();

        // Bounce sites: destinations of failed moves this turn.
        let mut bounce_site = [false; REGION_COUNT];
        for e in &self.entries {
            if let Action::Move { dest, .. } = e.action {
                if e.mark == Mark::Failed && !e.convoy_failed {
                    bounce_site[dest as usize] = true;
                }
            }
        }

        // Remove dislodged units first so they do not block incoming moves.
        let mut dislodgements: Vec<(Region, Power, UnitKind, Coast, Region)> = Vec::new();
        for e in &self.entries {
            if let Some(attacker) = e.dislodged_by {
                dislodgements.push((e.region, e.power, e.kind, e.coast, attacker));
                next.remove_unit(e.region);
            }
        }

        // Apply successful moves in two passes so that chains and rotations
        // (A->B with B->C, or full cycles) never clobber each other.
        let mut moved: Vec<(Region, Region, (Power, UnitKind), Coast)> = Vec::new();
        for e in &self.entries {
            if e.mark != Mark::Success {
                continue;
            }
            if let Action::Move { dest, dest_coast, .. } = e.action {
                if let Some(unit) = next.units[e.region as usize] {
                    moved.push((e.region, dest, unit, dest_coast));
                }
            }
        }
        for (src, _, _, _) in &moved {
            next.remove_unit(*src);
        }
        for (_, dest, unit, dest_coast) in moved {
            next.units[dest as usize] = Some(unit);
            next.fleet_coast[dest as usize] =
                if dest_coast != Coast::None { Some(dest_coast) } else { None };
        }

        // Retreat sets against the post-move board.
        for (region, power, kind, coast, attacker_from) in dislodgements {
            let mut retreats = Vec::new();
            for dest in adjacent_regions(region, kind, coast) {
                if dest == attacker_from
                    || bounce_site[dest as usize]
                    || next.units[dest as usize].is_some()
                    || !kind.can_occupy(dest.kind())
                {
                    continue;
                }
                if kind == UnitKind::Fleet && dest.is_bicoastal() {
                    retreats.extend(fleet_landings(region, coast, dest));
                } else {
                    retreats.push(Location::new(dest));
                }
            }
            next.dislodged.push(DislodgedUnit {
                power,
                kind,
                region,
                coast,
                attacker_from,
                retreats,
            });
        }

        // Fall turns capture supply centers.
        if self.state.turn.season == Season::Fall {
            update_sc_ownership(&mut next);
        }

        let has_dislodgements = !next.dislodged.is_empty();
        next.turn = next_turn(self.state.turn, has_dislodgements);
        if next.turn.phase != crate::board::Phase::Retreat {
            next.dislodged.clear();
        }

        // One resolution per input order, in input order.
        let mut resolutions = Vec::with_capacity(orders.len());
        for (i, (order, power)) in orders.iter().enumerate() {
            let resolution = match self.outcomes[i] {
                InputOutcome::Void(reason) => {
                    Resolution::new(*order, *power, OrderStatus::Void, Some(reason))
                }
                InputOutcome::Entry(region) => {
                    let e = self.entry_at(region).expect("entry exists for valid order");
                    self.entry_resolution(e, *order, *power)
                }
            };
            resolutions.push(resolution);
        }

        Adjudication { next, resolutions }
    }

    fn entry_resolution(&self, e: &UnitEntry, order: Order, power: Power) -> Resolution {
        let dislodged = e.dislodged_by.is_some();

        match e.action {
            Action::Move { .. } => {
                if e.convoy_failed {
                    let status = if dislodged { OrderStatus::Dislodged } else { OrderStatus::Fails };
                    Resolution::new(order, power, status, Some("no convoy route"))
                } else if e.mark == Mark::Success {
                    Resolution::new(order, power, OrderStatus::Succeeds, None)
                } else if dislodged {
                    Resolution::new(order, power, OrderStatus::Dislodged, None)
                } else {
                    let reason = if e.unresolved { Some("unresolvable") } else { None };
                    Resolution::new(order, power, OrderStatus::Bounced, reason)
                }
            }
            Action::SupportHold { .. } | Action::SupportMove { .. } => {
                if dislodged {
                    Resolution::new(order, power, OrderStatus::Dislodged, None)
                } else if e.cut {
                    Resolution::new(order, power, OrderStatus::Cut, None)
                } else {
                    Resolution::new(order, power, OrderStatus::Succeeds, None)
                }
            }
            Action::Convoy { .. } | Action::Stay => {
                if dislodged {
                    Resolution::new(order, power, OrderStatus::Dislodged, None)
                } else {
                    Resolution::new(order, power, OrderStatus::Succeeds, None)
                }
            }
        }
    }
}
