//! Turn sequencing.
//!
//! Determines the next turn descriptor after a phase resolves and handles
//! supply-center capture after Fall movement and retreats.
//!
//! Phase flow:
//! - Spring Movement -> Spring Retreat (if dislodged) OR Fall Movement
//! - Spring Retreat  -> Fall Movement
//! - Fall Movement   -> Fall Retreat (if dislodged) OR Fall Build
//! - Fall Retreat    -> Fall Build
//! - Fall Build      -> Spring Movement (next year)

use crate::board::{GameState, Phase, Power, Season, Turn, ALL_POWERS, ALL_REGIONS};

/// Supply centers needed for a solo victory.
pub const VICTORY_CENTERS: usize = 18;

/// Computes the turn descriptor that follows the given one.
pub fn next_turn(turn: Turn, has_dislodgements: bool) -> Turn {
    match turn.phase {
        Phase::Movement => {
            if has_dislodgements {
                Turn::new(turn.year, turn.season, Phase::Retreat)
            } else {
                after_movement(turn)
            }
        }
        Phase::Retreat => after_movement(turn),
        Phase::Build => Turn::new(turn.year + 1, Season::Spring, Phase::Movement),
    }
}

fn after_movement(turn: Turn) -> Turn {
    match turn.season {
        Season::Spring => Turn::new(turn.year, Season::Fall, Phase::Movement),
        Season::Fall => Turn::new(turn.year, Season::Fall, Phase::Build),
    }
}

/// Captures supply centers: each occupied center passes to the occupying
/// power. Called after Fall movement and Fall retreat resolution; ownership
/// never changes in Spring or during builds.
pub fn update_sc_ownership(state: &mut GameState) {
    for region in &ALL_REGIONS {
        if !region.is_supply_center() {
            continue;
        }
        let idx = *region as usize;
        if let Some((power, _)) = state.units[idx] {
            state.sc_owner[idx] = Some(power);
        }
        // Vacant centers keep their current owner.
    }
}

/// Returns the power holding a winning supply-center count, if any.
pub fn game_winner(state: &GameState) -> Option<Power> {
    ALL_POWERS
        .iter()
        .copied()
        .find(|p| state.supply_center_count(*p) >= VICTORY_CENTERS)
}
