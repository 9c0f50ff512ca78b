use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use arrow::csv::WriterBuilder;
use arrow::record_batch::RecordBatch;
use augur_core::{ComparisonRecord, Movement};
use tracing::info;

use crate::MotError;

/// Default file name for the exported comparison.
pub const EXPORT_FILE_NAME: &str = "mot_analysis_results.csv";

/// Result of a Movement-over-Time comparison.
///
/// Holds the joined Arrow batch (all snapshot columns plus `Movement Summary`
/// and `MOT Commentary`) and the typed records, row for row.
#[derive(Debug, Clone)]
pub struct ComparisonTable {
    batch: RecordBatch,
    records: Vec<ComparisonRecord>,
}

/// Counts by movement direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementSummary {
    pub rows: usize,
    pub distinct_trades: usize,
    pub unchanged: usize,
    pub more_observable: usize,
    pub less_observable: usize,
    pub unclassified: usize,
    /// `(prior, current)` → row count, for rows whose level changed.
    pub transitions: BTreeMap<(String, String), usize>,
}

impl ComparisonTable {
    pub(crate) fn new(batch: RecordBatch, records: Vec<ComparisonRecord>) -> Self {
        debug_assert_eq!(batch.num_rows(), records.len());
        Self { batch, records }
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn records(&self) -> &[ComparisonRecord] {
        &self.records
    }

    pub fn num_rows(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn movement_summary(&self) -> MovementSummary {
        let mut summary = MovementSummary {
            rows: self.records.len(),
            ..Default::default()
        };
        let mut trades = HashSet::new();

        for rec in &self.records {
            trades.insert(rec.trade_id.as_str());
            match rec.movement {
                Movement::Unchanged => summary.unchanged += 1,
                Movement::MoreObservable => summary.more_observable += 1,
                Movement::LessObservable => summary.less_observable += 1,
                Movement::Unclassified => summary.unclassified += 1,
            }
            if rec.movement != Movement::Unchanged {
                *summary
                    .transitions
                    .entry((rec.prior_level.clone(), rec.current_level.clone()))
                    .or_default() += 1;
            }
        }

        summary.distinct_trades = trades.len();
        summary
    }

    /// Write the table as UTF-8 CSV with a header row.
    ///
    /// The header is written even when there are no rows. Nulls become empty
    /// fields.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), MotError> {
        let mut writer = WriterBuilder::new().with_header(true).build(writer);
        writer.write(&self.batch)?;
        Ok(())
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, MotError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(buf)
    }

    /// Write the CSV export to `path`, replacing any existing file.
    pub fn write_csv_path(&self, path: &Path) -> Result<(), MotError> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_csv(&mut out)?;
        out.flush()?;
        info!(path = %path.display(), rows = self.num_rows(), "wrote comparison export");
        Ok(())
    }
}
