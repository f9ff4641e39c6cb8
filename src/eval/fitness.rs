//! Coalition fitness scoring.
//!
//! Pure evaluation of a state for a coalition of powers: supply-center and
//! unit counts folded into a composite score, terminal win detection
//! (domination at 18 centers, or elimination of every outside power), and
//! user-supplied priority adjustments tied to region occupancy.

use serde::Serialize;

use crate::board::{is_adjacent, Coast, GameState, Power, Region, ALL_POWERS};

use super::Coalition;

/// Score assigned to terminal wins.
pub const WIN_SCORE: i64 = 999_999;

/// Weight of one supply center in the composite score.
pub const CENTER_WEIGHT: i64 = 1000;

/// Weight of one priority adjustment.
pub const PRIORITY_WEIGHT: i64 = 1000;

/// How a terminal win was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WinKind {
    Domination,
    Elimination,
}

/// A user-supplied score adjustment: reward or punish a power occupying a
/// region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Priority {
    pub action: PriorityAction,
    pub power: Power,
    pub region: Region,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityAction {
    Deny,
    Allow,
}

/// The fitness record for one (state, coalition) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fitness {
    pub supply_centers: u32,
    pub units: u32,
    pub score: i64,
    pub win: bool,
    pub win_kind: Option<WinKind>,
    /// An outside power reached a terminal win: the position is lost.
    pub lost: bool,
}

/// Evaluates a state for a coalition.
pub fn fitness(state: &GameState, coalition: &Coalition, priorities: &[Priority]) -> Fitness {
    let mut coalition_centers = 0u32;
    let mut coalition_units = 0u32;
    for &power in &coalition.powers {
        coalition_centers += state.supply_center_count(power) as u32;
        coalition_units += state.unit_count(power) as u32;
    }

    // Domination: any single power at 18 centers ends the game.
    if let Some(winner) = crate::resolve::game_winner(state) {
        if coalition.contains(winner) {
            return Fitness {
                supply_centers: coalition_centers,
                units: coalition_units,
                score: WIN_SCORE,
                win: true,
                win_kind: Some(WinKind::Domination),
                lost: false,
            };
        }
        return Fitness {
            supply_centers: coalition_centers,
            units: coalition_units,
            score: 0,
            win: false,
            win_kind: None,
            lost: true,
        };
    }

    // Elimination: every outside power is off the board and owns nothing.
    let outsiders_gone = ALL_POWERS
        .iter()
        .filter(|p| !coalition.contains(**p))
        .all(|p| state.unit_count(*p) == 0 && state.supply_center_count(*p) == 0);
    if outsiders_gone {
        return Fitness {
            supply_centers: coalition_centers,
            units: coalition_units,
            score: WIN_SCORE,
            win: true,
            win_kind: Some(WinKind::Elimination),
            lost: false,
        };
    }

    let mut score = coalition_centers as i64 * CENTER_WEIGHT + coalition_units as i64;
    for p in priorities {
        if matches!(state.unit_at(p.region), Some((power, _)) if power == p.power) {
            match p.action {
                PriorityAction::Allow => score += PRIORITY_WEIGHT,
                PriorityAction::Deny => score -= PRIORITY_WEIGHT,
            }
        }
    }

    Fitness {
        supply_centers: coalition_centers,
        units: coalition_units,
        score,
        win: false,
        win_kind: None,
        lost: false,
    }
}

/// Counts enemy units (relative to `friends`) that can reach the given
/// region in one move.
pub fn region_threat(region: Region, friends: &[Power], state: &GameState) -> u32 {
    state
        .all_units()
        .filter(|u| {
            !friends.contains(&u.power)
                && is_adjacent(u.region, u.coast, region, Coast::None, u.kind)
        })
        .count() as u32
}
