//! Scraped game-state input.
//!
//! The scraper collaborator delivers a JSON payload: a game identifier,
//! turn descriptor, per-player unit maps (unit values are either a
//! one-letter kind string or an object with kind and optional coast), and a
//! supply-center ownership map. Player names are matched
//! case-insensitively (`Austria-Hungary` aliases to Austria); region tags
//! are normalized to lowercase three-letter form, with the Backstabbr
//! spellings of four sea regions accepted. HTTP fetching and HTML
//! extraction happen upstream and never reach this module.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::board::{Coast, GameState, Phase, Power, Region, Season, UnitKind};

/// Errors converting a scraped payload into a game state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScrapeError {
    #[error("unknown power name '{0}'")]
    UnknownPower(String),

    #[error("unknown region tag '{0}'")]
    UnknownRegion(String),

    #[error("unknown unit kind '{0}'")]
    UnknownUnitKind(String),

    #[error("unknown coast '{0}'")]
    UnknownCoast(String),

    #[error("unknown season '{0}'")]
    UnknownSeason(String),

    #[error("unknown phase '{0}'")]
    UnknownPhase(String),

    #[error("game year {0} predates 1901")]
    InvalidYear(u16),

    #[error("two units share region '{0}'")]
    DuplicateUnit(String),

    #[error("fleet in bicoastal region '{0}' needs a coast")]
    MissingCoast(String),
}

/// The scraped payload as delivered by the front end.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapedGame {
    pub game_id: String,
    #[serde(default)]
    pub name: String,
    pub turn: ScrapedTurn,
    #[serde(default)]
    pub units: HashMap<String, HashMap<String, ScrapedUnit>>,
    #[serde(default)]
    pub supply_centers: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapedTurn {
    pub year: u16,
    pub season: String,
    pub phase: String,
}

/// A unit entry: `"A"` / `"F"`, or `{"kind": "F", "coast": "sc"}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScrapedUnit {
    Kind(String),
    Detailed {
        kind: String,
        #[serde(default)]
        coast: Option<String>,
    },
}

impl ScrapedUnit {
    fn parts(&self) -> (&str, Option<&str>) {
        match self {
            ScrapedUnit::Kind(k) => (k.as_str(), None),
            ScrapedUnit::Detailed { kind, coast } => (kind.as_str(), coast.as_deref()),
        }
    }
}

/// Parses a scraped payload into a game state.
pub fn game_state_from_scrape(scraped: &ScrapedGame) -> Result<GameState, ScrapeError> {
    if scraped.turn.year < 1901 {
        return Err(ScrapeError::InvalidYear(scraped.turn.year));
    }
    let season = Season::from_name(&scraped.turn.season)
        .ok_or_else(|| ScrapeError::UnknownSeason(scraped.turn.season.clone()))?;
    let phase = Phase::from_name(&scraped.turn.phase)
        .ok_or_else(|| ScrapeError::UnknownPhase(scraped.turn.phase.clone()))?;

    let mut state = GameState::empty(scraped.turn.year, season, phase);

    for (player, regions) in &scraped.units {
        let power = parse_power(player)?;
        for (tag, unit) in regions {
            let region = parse_region(tag)?;
            let (kind_str, coast_str) = unit.parts();
            let kind = parse_kind(kind_str)?;
            let coast = match coast_str {
                Some(c) => Coast::from_suffix(&c.to_ascii_lowercase())
                    .ok_or_else(|| ScrapeError::UnknownCoast(c.to_string()))?,
                None => Coast::None,
            };
            if kind == UnitKind::Fleet && region.is_bicoastal() && coast == Coast::None {
                return Err(ScrapeError::MissingCoast(tag.clone()));
            }
            if !state.place_unit(region, power, kind, coast) {
                return Err(ScrapeError::DuplicateUnit(tag.clone()));
            }
        }
    }

    for (tag, owner) in &scraped.supply_centers {
        let region = parse_region(tag)?;
        let power = parse_power(owner)?;
        state.set_sc_owner(region, Some(power));
    }

    Ok(state)
}

fn parse_power(name: &str) -> Result<Power, ScrapeError> {
    Power::from_name(name).ok_or_else(|| ScrapeError::UnknownPower(name.to_string()))
}

fn parse_region(tag: &str) -> Result<Region, ScrapeError> {
    Region::from_tag(&tag.to_ascii_lowercase())
        .ok_or_else(|| ScrapeError::UnknownRegion(tag.to_string()))
}

fn parse_kind(s: &str) -> Result<UnitKind, ScrapeError> {
    let mut chars = s.chars();
    match (chars.next().and_then(UnitKind::from_letter), chars.next()) {
        (Some(kind), None) => Ok(kind),
        _ => Err(ScrapeError::UnknownUnitKind(s.to_string())),
    }
}
