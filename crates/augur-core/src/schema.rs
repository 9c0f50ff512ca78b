//! Column names and Arrow schemas for trade classification snapshots.

use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::TradeClassification;

/// Column names shared by snapshots and the comparison export.
pub mod columns {
    /// Join key present in both snapshots.
    pub const TRADE_ID: &str = "trade_id";
    /// Model output column present in both snapshots.
    pub const PREDICTED_LEVEL: &str = "Predicted IFRS13 Level";
    pub const MOVEMENT_SUMMARY: &str = "Movement Summary";
    pub const MOT_COMMENTARY: &str = "MOT Commentary";

    /// Columns every snapshot must carry.
    pub const REQUIRED: &[&str] = &[TRADE_ID, PREDICTED_LEVEL];
}

/// Minimal snapshot schema: `trade_id`, `Predicted IFRS13 Level`, both `Utf8`.
pub fn snapshot_schema() -> Schema {
    Schema::new(vec![
        Field::new(columns::TRADE_ID, DataType::Utf8, true),
        Field::new(columns::PREDICTED_LEVEL, DataType::Utf8, true),
    ])
}

/// The two derived columns appended to a joined snapshot pair.
pub fn derived_fields() -> [Field; 2] {
    [
        Field::new(columns::MOVEMENT_SUMMARY, DataType::Utf8, false),
        Field::new(columns::MOT_COMMENTARY, DataType::Utf8, false),
    ]
}

/// Build a snapshot batch from typed records.
pub fn classification_batch(records: &[TradeClassification]) -> Result<RecordBatch, ArrowError> {
    let ids: StringArray = records.iter().map(|r| Some(r.trade_id.as_str())).collect();
    let levels: StringArray = records.iter().map(|r| Some(r.level.label())).collect();

    RecordBatch::try_new(
        Arc::new(snapshot_schema()),
        vec![Arc::new(ids) as ArrayRef, Arc::new(levels) as ArrayRef],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IfrsLevel;
    use arrow::array::AsArray;

    #[test]
    fn snapshot_schema_has_required_fields() {
        let schema = snapshot_schema();
        assert_eq!(schema.fields().len(), 2);
        for name in columns::REQUIRED {
            assert!(schema.field_with_name(name).is_ok());
        }
    }

    #[test]
    fn classification_batch_preserves_order() {
        let batch = classification_batch(&[
            TradeClassification::new("T2", IfrsLevel::Level3),
            TradeClassification::new("T1", IfrsLevel::Level1),
        ])
        .unwrap();

        assert_eq!(batch.num_rows(), 2);
        let ids = batch.column(0).as_string::<i32>();
        let levels = batch.column(1).as_string::<i32>();
        assert_eq!(ids.value(0), "T2");
        assert_eq!(levels.value(0), "Level 3");
        assert_eq!(ids.value(1), "T1");
        assert_eq!(levels.value(1), "Level 1");
    }

    #[test]
    fn empty_classification_batch() {
        let batch = classification_batch(&[]).unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 2);
    }
}
