//! Trade-level record types shared between the MoT engine and its callers.

use serde::{Deserialize, Serialize};

use crate::{IfrsLevel, LevelValue};

/// One row of a classification snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeClassification {
    pub trade_id: String,
    #[serde(rename = "Predicted IFRS13 Level")]
    pub level: IfrsLevel,
}

impl TradeClassification {
    pub fn new(trade_id: impl Into<String>, level: IfrsLevel) -> Self {
        Self {
            trade_id: trade_id.into(),
            level,
        }
    }
}

/// Direction of a level change between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    Unchanged,
    /// Moved toward Level 1.
    MoreObservable,
    /// Moved toward Level 3.
    LessObservable,
    /// Levels differ and at least one side is not a recognised tier.
    Unclassified,
}

impl Movement {
    pub fn between(prior: &LevelValue, current: &LevelValue) -> Self {
        if prior.same_level(current) {
            return Movement::Unchanged;
        }
        match (prior.known(), current.known()) {
            (Some(p), Some(c)) if c < p => Movement::MoreObservable,
            (Some(p), Some(c)) if c > p => Movement::LessObservable,
            _ => Movement::Unclassified,
        }
    }
}

/// One joined row of a Movement-over-Time comparison.
///
/// Levels are rendered as text: known tiers as `Level N`, anything else as
/// the raw snapshot cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub trade_id: String,
    pub prior_level: String,
    pub current_level: String,
    pub movement_summary: String,
    pub commentary: String,
    pub movement: Movement,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(level: IfrsLevel) -> LevelValue {
        LevelValue::Known(level)
    }

    #[test]
    fn movement_direction() {
        use IfrsLevel::*;
        assert_eq!(
            Movement::between(&known(Level2), &known(Level2)),
            Movement::Unchanged
        );
        assert_eq!(
            Movement::between(&known(Level3), &known(Level1)),
            Movement::MoreObservable
        );
        assert_eq!(
            Movement::between(&known(Level1), &known(Level2)),
            Movement::LessObservable
        );
    }

    #[test]
    fn unrecognised_levels() {
        let odd = LevelValue::Unrecognised("Level 4".into());
        assert_eq!(
            Movement::between(&odd, &known(IfrsLevel::Level1)),
            Movement::Unclassified
        );
        assert_eq!(Movement::between(&odd, &odd.clone()), Movement::Unchanged);
    }

    #[test]
    fn missing_levels_are_unclassified() {
        assert_eq!(
            Movement::between(&LevelValue::Missing, &LevelValue::Missing),
            Movement::Unclassified
        );
        assert_eq!(
            Movement::between(&known(IfrsLevel::Level2), &LevelValue::Missing),
            Movement::Unclassified
        );
    }

    #[test]
    fn trade_classification_json_uses_snapshot_column_names() {
        let rec = TradeClassification::new("T-100", IfrsLevel::Level2);
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["trade_id"], "T-100");
        assert_eq!(json["Predicted IFRS13 Level"], "Level 2");
    }

    #[test]
    fn comparison_record_json() {
        let rec = ComparisonRecord {
            trade_id: "T1".into(),
            prior_level: "Level 3".into(),
            current_level: "Level 2".into(),
            movement_summary: "Moved from Level 3 to Level 2".into(),
            commentary: "Trade maturity has now entered the observable range.".into(),
            movement: Movement::MoreObservable,
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"movement\":\"more_observable\""));
        let parsed: ComparisonRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, rec);
    }
}
