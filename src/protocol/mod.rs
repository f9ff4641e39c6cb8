//! External interfaces: scraped-state input, order text form, and the
//! coalition / priority specification strings.

pub mod coalition;
pub mod notation;
pub mod scrape;

pub use coalition::{parse_coalition, parse_coalitions, parse_priority, ConfigError};
pub use notation::{fingerprint, format_order, format_orders, location_display, region_display};
pub use scrape::{game_state_from_scrape, ScrapeError, ScrapedGame, ScrapedTurn, ScrapedUnit};
