//! CSV snapshot reader.
//!
//! Every column is read as nullable `Utf8` so that identifiers and any extra
//! columns pass through the join and export as the text they were given.
//! Empty fields read as null.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;

use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use tracing::info;

use crate::MotError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read a CSV snapshot with a header row into a single batch.
///
/// An empty input yields a batch with no columns.
pub fn read_snapshot<R: Read>(mut reader: R) -> Result<RecordBatch, MotError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    if bytes.starts_with(UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }

    // Only the header is needed; column types are fixed to Utf8.
    let (header, _) = Format::default()
        .with_header(true)
        .infer_schema(Cursor::new(&bytes), Some(0))?;
    let fields: Vec<Field> = header
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    if schema.fields().is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }

    let csv = ReaderBuilder::new(Arc::clone(&schema))
        .with_header(true)
        .with_truncated_rows(true)
        .build(Cursor::new(bytes))?;
    let batches = csv.collect::<Result<Vec<_>, _>>()?;

    Ok(concat_batches(&schema, &batches)?)
}

/// Read a CSV snapshot from disk.
pub fn read_snapshot_path(path: &Path) -> Result<RecordBatch, MotError> {
    if !path.exists() {
        return Err(MotError::SnapshotNotFound(path.to_path_buf()));
    }
    let batch = read_snapshot(File::open(path)?)?;
    info!(
        path = %path.display(),
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "loaded snapshot"
    );
    Ok(batch)
}
