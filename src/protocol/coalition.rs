//! Coalition and priority specification strings.
//!
//! A coalition specification is `P1+P2[,P3+P4]...`: comma-separated
//! coalitions, each a `+`-joined list of power names, matched
//! case-insensitively. A priority specification is
//! `<deny|allow> <power> <region>`. Both parsers reject unknown names
//! rather than guessing.

use thiserror::Error;

use crate::board::{Power, Region};
use crate::eval::{Coalition, Priority, PriorityAction};

/// Errors in user-supplied configuration strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown power name '{0}'")]
    UnknownPower(String),

    #[error("unknown region tag '{0}'")]
    UnknownRegion(String),

    #[error("empty coalition specification")]
    EmptyCoalition,

    #[error("invalid priority '{0}': expected '<deny|allow> <power> <region>'")]
    InvalidPriority(String),
}

/// Parses a full coalition specification into its coalitions.
pub fn parse_coalitions(spec: &str) -> Result<Vec<Coalition>, ConfigError> {
    let tokens: Vec<&str> = spec.split(',').map(str::trim).filter(|t| !t.is_empty()).collect();
    if tokens.is_empty() {
        return Err(ConfigError::EmptyCoalition);
    }
    tokens.into_iter().map(parse_coalition).collect()
}

/// Parses one `P1+P2` token into a coalition named after the token.
pub fn parse_coalition(token: &str) -> Result<Coalition, ConfigError> {
    let mut powers = Vec::new();
    for name in token.split('+').map(str::trim) {
        if name.is_empty() {
            return Err(ConfigError::EmptyCoalition);
        }
        let power =
            Power::from_name(name).ok_or_else(|| ConfigError::UnknownPower(name.to_string()))?;
        if !powers.contains(&power) {
            powers.push(power);
        }
    }
    if powers.is_empty() {
        return Err(ConfigError::EmptyCoalition);
    }
    let name = powers.iter().map(|p| p.name()).collect::<Vec<_>>().join("+");
    Ok(Coalition::new(name, powers))
}

/// Parses one `<deny|allow> <power> <region>` priority line.
pub fn parse_priority(spec: &str) -> Result<Priority, ConfigError> {
    let parts: Vec<&str> = spec.split_whitespace().collect();
    let [action, power, region] = parts.as_slice() else {
        return Err(ConfigError::InvalidPriority(spec.to_string()));
    };

    let action = match action.to_ascii_lowercase().as_str() {
        "deny" => PriorityAction::Deny,
        "allow" => PriorityAction::Allow,
        _ => return Err(ConfigError::InvalidPriority(spec.to_string())),
    };
    let power =
        Power::from_name(power).ok_or_else(|| ConfigError::UnknownPower(power.to_string()))?;
    let region = Region::from_tag(&region.to_ascii_lowercase())
        .ok_or_else(|| ConfigError::UnknownRegion(region.to_string()))?;

    Ok(Priority { action, power, region })
}
