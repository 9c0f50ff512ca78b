//! Movement summaries and the IFRS13 transition commentary table.
//!
//! Both outputs depend only on the `(prior, current)` level pair. Equal
//! levels short-circuit to [`NO_CHANGE`]; differing known levels are looked
//! up in [`TRANSITIONS`]; anything not listed falls back to [`FALLBACK`].

use augur_core::IfrsLevel::{Level1, Level2, Level3};
use augur_core::{IfrsLevel, LevelValue};

pub const NO_CHANGE: &str = "No change in classification — inputs remain consistent.";

pub const FALLBACK: &str = "IFRS13 level changed due to re-evaluation of input observability.";

/// Narrative for each ordered `(prior, current)` level change.
pub const TRANSITIONS: &[((IfrsLevel, IfrsLevel), &str)] = &[
    (
        (Level3, Level2),
        "Trade maturity has now entered the observable range.",
    ),
    (
        (Level3, Level1),
        "Market data inputs have become fully observable.",
    ),
    (
        (Level2, Level1),
        "Trade is now based entirely on quoted prices in active markets.",
    ),
    (
        (Level1, Level2),
        "Partial loss of observability in market inputs.",
    ),
    (
        (Level2, Level3),
        "Key valuation inputs have become unobservable.",
    ),
    (
        (Level1, Level3),
        "Significant deterioration in input observability.",
    ),
];

/// Table entry for a change between two known levels, if one exists.
pub fn transition_commentary(prior: IfrsLevel, current: IfrsLevel) -> Option<&'static str> {
    TRANSITIONS
        .iter()
        .find(|(pair, _)| *pair == (prior, current))
        .map(|(_, text)| *text)
}

/// Commentary for a joined row.
pub fn commentary(prior: &LevelValue, current: &LevelValue) -> &'static str {
    if prior.same_level(current) {
        return NO_CHANGE;
    }
    match (prior.known(), current.known()) {
        (Some(p), Some(c)) => transition_commentary(p, c).unwrap_or(FALLBACK),
        _ => FALLBACK,
    }
}

/// `"No change (Level N)"` or `"Moved from {prior} to {current}"`.
pub fn movement_summary(prior: &LevelValue, current: &LevelValue) -> String {
    if prior.same_level(current) {
        return match current {
            LevelValue::Known(level) => format!("No change (Level {})", level.tier()),
            other => format!("No change ({other})"),
        };
    }
    format!("Moved from {prior} to {current}")
}
