//! Inner join of two classification snapshots on `trade_id`.
//!
//! Output order: prior rows in input order, each followed by its matching
//! current rows in input order. Duplicate keys fan out into the cross
//! product of their rows. Rows with a null or empty key never match, not even
//! each other: keys compare the way SQL compares `NULL`, unlike a pandas merge,
//! which pairs missing keys together.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, StringArray, UInt64Array};
use arrow::compute::{cast, take};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use augur_core::schema::derived_fields;
use augur_core::{ComparisonRecord, LevelValue, Movement, columns};
use tracing::{debug, info, warn};

use crate::commentary;
use crate::{ComparisonTable, MotError, Snapshot};

/// Suffixes appended to non-key columns present in both snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSuffixes {
    pub prior: String,
    pub current: String,
}

impl Default for JoinSuffixes {
    fn default() -> Self {
        Self {
            prior: "_prior".to_string(),
            current: "_current".to_string(),
        }
    }
}

/// Compare two snapshots with the default `_prior` / `_current` suffixes.
pub fn compare(prior: &RecordBatch, current: &RecordBatch) -> Result<ComparisonTable, MotError> {
    compare_with(prior, current, &JoinSuffixes::default())
}

/// Compare two snapshots.
///
/// Both batches must carry `trade_id` and `Predicted IFRS13 Level`; any
/// other columns are carried through. Fails before joining if a required
/// column is missing on either side.
pub fn compare_with(
    prior: &RecordBatch,
    current: &RecordBatch,
    suffixes: &JoinSuffixes,
) -> Result<ComparisonTable, MotError> {
    require_columns(prior, Snapshot::Prior)?;
    require_columns(current, Snapshot::Current)?;

    let prior_keys = utf8_column(prior, columns::TRADE_ID)?;
    let current_keys = utf8_column(current, columns::TRADE_ID)?;
    let prior_keys = prior_keys.as_string::<i32>();
    let current_keys = current_keys.as_string::<i32>();

    warn_on_duplicates(prior_keys, Snapshot::Prior);
    warn_on_duplicates(current_keys, Snapshot::Current);

    let (left, right) = join_indices(prior_keys, current_keys);
    debug!(
        prior_rows = prior.num_rows(),
        current_rows = current.num_rows(),
        matched = left.len(),
        "joined snapshots on trade_id"
    );

    // ── Derived columns ──

    let prior_levels = utf8_column(prior, columns::PREDICTED_LEVEL)?;
    let current_levels = utf8_column(current, columns::PREDICTED_LEVEL)?;
    let prior_levels = prior_levels.as_string::<i32>();
    let current_levels = current_levels.as_string::<i32>();

    let mut records = Vec::with_capacity(left.len());
    for (l, r) in left.values().iter().zip(right.values().iter()) {
        let (l, r) = (*l as usize, *r as usize);
        let prior_level = LevelValue::from_cell(cell(prior_levels, l));
        let current_level = LevelValue::from_cell(cell(current_levels, r));

        records.push(ComparisonRecord {
            trade_id: cell(prior_keys, l).unwrap_or_default().to_string(),
            movement_summary: commentary::movement_summary(&prior_level, &current_level),
            commentary: commentary::commentary(&prior_level, &current_level).to_string(),
            movement: Movement::between(&prior_level, &current_level),
            prior_level: prior_level.to_string(),
            current_level: current_level.to_string(),
        });
    }

    let summaries: StringArray = records
        .iter()
        .map(|r| Some(r.movement_summary.as_str()))
        .collect();
    let comments: StringArray = records.iter().map(|r| Some(r.commentary.as_str())).collect();

    // ── Joined columns ──

    let (mut fields, mut arrays) = joined_columns(prior, current, &left, &right, suffixes)?;
    let [summary_field, commentary_field] = derived_fields();
    fields.push(summary_field);
    arrays.push(Arc::new(summaries) as ArrayRef);
    fields.push(commentary_field);
    arrays.push(Arc::new(comments) as ArrayRef);

    let mut seen = HashSet::new();
    for field in &fields {
        if !seen.insert(field.name().as_str()) {
            return Err(MotError::DuplicateColumn(field.name().clone()));
        }
    }

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
    info!(rows = batch.num_rows(), "movement-over-time comparison complete");
    Ok(ComparisonTable::new(batch, records))
}

fn require_columns(batch: &RecordBatch, snapshot: Snapshot) -> Result<(), MotError> {
    let schema = batch.schema();
    let missing: Vec<String> = columns::REQUIRED
        .iter()
        .filter(|name| schema.index_of(name).is_err())
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MotError::MissingColumns {
            snapshot,
            columns: missing,
        })
    }
}

/// Named column cast to `Utf8`. Callers have already checked it exists.
fn utf8_column(batch: &RecordBatch, name: &str) -> Result<ArrayRef, MotError> {
    let idx = batch.schema().index_of(name)?;
    Ok(cast(batch.column(idx).as_ref(), &DataType::Utf8)?)
}

fn cell(arr: &StringArray, row: usize) -> Option<&str> {
    if arr.is_null(row) {
        None
    } else {
        Some(arr.value(row))
    }
}

fn join_key(arr: &StringArray, row: usize) -> Option<&str> {
    cell(arr, row).filter(|k| !k.is_empty())
}

/// Row index pairs `(prior, current)` of the inner join.
fn join_indices(prior: &StringArray, current: &StringArray) -> (UInt64Array, UInt64Array) {
    let mut by_key: HashMap<&str, Vec<u64>> = HashMap::new();
    for row in 0..current.len() {
        if let Some(key) = join_key(current, row) {
            by_key.entry(key).or_default().push(row as u64);
        }
    }

    let mut left = Vec::new();
    let mut right = Vec::new();
    for row in 0..prior.len() {
        if let Some(key) = join_key(prior, row)
            && let Some(matches) = by_key.get(key)
        {
            for &m in matches {
                left.push(row as u64);
                right.push(m);
            }
        }
    }

    (UInt64Array::from(left), UInt64Array::from(right))
}

fn warn_on_duplicates(keys: &StringArray, snapshot: Snapshot) {
    let mut seen = HashSet::new();
    let mut duplicates = HashSet::new();
    for row in 0..keys.len() {
        if let Some(key) = join_key(keys, row)
            && !seen.insert(key)
        {
            duplicates.insert(key);
        }
    }
    if !duplicates.is_empty() {
        warn!(
            snapshot = %snapshot,
            duplicate_keys = duplicates.len(),
            "duplicate trade_id values; matching rows will fan out"
        );
    }
}

/// Prior columns (key unsuffixed), then current columns minus the key.
fn joined_columns(
    prior: &RecordBatch,
    current: &RecordBatch,
    left: &UInt64Array,
    right: &UInt64Array,
    suffixes: &JoinSuffixes,
) -> Result<(Vec<Field>, Vec<ArrayRef>), MotError> {
    let prior_schema = prior.schema();
    let current_schema = current.schema();
    let prior_names: HashSet<&str> = prior_schema
        .fields()
        .iter()
        .map(|f| f.name().as_str())
        .collect();
    let current_names: HashSet<&str> = current_schema
        .fields()
        .iter()
        .map(|f| f.name().as_str())
        .collect();

    let mut fields = Vec::with_capacity(prior.num_columns() + current.num_columns() + 2);
    let mut arrays = Vec::with_capacity(fields.capacity());

    for (idx, field) in prior_schema.fields().iter().enumerate() {
        let name = field.name();
        let out_name = if name != columns::TRADE_ID && current_names.contains(name.as_str()) {
            format!("{name}{}", suffixes.prior)
        } else {
            name.clone()
        };
        fields.push(field.as_ref().clone().with_name(out_name));
        arrays.push(take(prior.column(idx).as_ref(), left, None)?);
    }

    for (idx, field) in current_schema.fields().iter().enumerate() {
        let name = field.name();
        if name == columns::TRADE_ID {
            continue;
        }
        let out_name = if prior_names.contains(name.as_str()) {
            format!("{name}{}", suffixes.current)
        } else {
            name.clone()
        };
        fields.push(field.as_ref().clone().with_name(out_name));
        arrays.push(take(current.column(idx).as_ref(), right, None)?);
    }

    Ok((fields, arrays))
}
