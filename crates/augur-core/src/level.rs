//! IFRS13 fair-value hierarchy levels.
//!
//! Snapshots carry the level as free text (`"Level 2"`). Cells are parsed into
//! [`IfrsLevel`] when they follow one of the accepted spellings; anything else
//! is kept verbatim as [`LevelValue::Unrecognised`] so that it still flows
//! through the comparison and the export untouched. Null or empty cells are
//! [`LevelValue::Missing`], which never counts as the same level as anything,
//! another missing cell included.
//!
//! # Accepted spellings
//!
//! - `Level 1`, `level 1`, `LEVEL1`, `Level   1`
//! - `L1`, `l 1`
//! - bare digit: `1`
//!
//! Surrounding whitespace is ignored. Only tiers 1 to 3 exist.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One tier of the IFRS13 fair-value hierarchy.
///
/// Level 1 is the most observable (quoted prices in active markets), Level 3
/// the least (unobservable inputs). `Ord` follows the tier number, so a move
/// to a *smaller* level is a gain in observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IfrsLevel {
    #[serde(rename = "Level 1")]
    Level1,
    #[serde(rename = "Level 2")]
    Level2,
    #[serde(rename = "Level 3")]
    Level3,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not an IFRS13 level: {0:?}")]
pub struct ParseLevelError(pub String);

impl IfrsLevel {
    pub const ALL: [IfrsLevel; 3] = [IfrsLevel::Level1, IfrsLevel::Level2, IfrsLevel::Level3];

    /// Tier number, 1 to 3.
    pub fn tier(self) -> u8 {
        match self {
            IfrsLevel::Level1 => 1,
            IfrsLevel::Level2 => 2,
            IfrsLevel::Level3 => 3,
        }
    }

    /// Canonical label as it appears in snapshots, e.g. `"Level 2"`.
    pub fn label(self) -> &'static str {
        match self {
            IfrsLevel::Level1 => "Level 1",
            IfrsLevel::Level2 => "Level 2",
            IfrsLevel::Level3 => "Level 3",
        }
    }

    pub fn from_tier(tier: u8) -> Option<Self> {
        match tier {
            1 => Some(IfrsLevel::Level1),
            2 => Some(IfrsLevel::Level2),
            3 => Some(IfrsLevel::Level3),
            _ => None,
        }
    }
}

impl fmt::Display for IfrsLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IfrsLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();

        let rest = if let Some(r) = lower.strip_prefix("level") {
            r
        } else if let Some(r) = lower.strip_prefix('l') {
            r
        } else {
            lower.as_str()
        };

        match rest.trim() {
            "1" => Ok(IfrsLevel::Level1),
            "2" => Ok(IfrsLevel::Level2),
            "3" => Ok(IfrsLevel::Level3),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// A level cell as read from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LevelValue {
    Known(IfrsLevel),
    /// Raw cell text that is not one of the three tiers.
    Unrecognised(String),
    /// Null or empty cell.
    Missing,
}

impl LevelValue {
    /// Interpret an optional cell value.
    pub fn from_cell(cell: Option<&str>) -> Self {
        match cell {
            None | Some("") => LevelValue::Missing,
            Some(text) => match text.parse::<IfrsLevel>() {
                Ok(level) => LevelValue::Known(level),
                Err(_) => LevelValue::Unrecognised(text.to_string()),
            },
        }
    }

    pub fn known(&self) -> Option<IfrsLevel> {
        match self {
            LevelValue::Known(level) => Some(*level),
            LevelValue::Unrecognised(_) | LevelValue::Missing => None,
        }
    }

    /// Whether two cells hold the same level. A missing cell matches nothing.
    pub fn same_level(&self, other: &LevelValue) -> bool {
        !matches!(self, LevelValue::Missing) && self == other
    }
}

impl From<IfrsLevel> for LevelValue {
    fn from(level: IfrsLevel) -> Self {
        LevelValue::Known(level)
    }
}

impl fmt::Display for LevelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelValue::Known(level) => level.fmt(f),
            LevelValue::Unrecognised(raw) => f.write_str(raw),
            LevelValue::Missing => Ok(()),
        }
    }
}
