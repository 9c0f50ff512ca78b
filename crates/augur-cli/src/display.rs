//! Terminal rendering for Movement-over-Time results.

use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use augur_core::ComparisonRecord;
use augur_mot::{ComparisonTable, MovementSummary};

const COMMENTARY_COLUMNS: &[&str] = &[
    "trade_id",
    "prior level",
    "current level",
    "Movement Summary",
    "MOT Commentary",
];

/// Print the movement counts block.
pub fn print_summary(summary: &MovementSummary) {
    println!("Movement summary");
    println!("  {:<26} {}", "rows", summary.rows);
    println!("  {:<26} {}", "distinct trades", summary.distinct_trades);
    println!("  {:<26} {}", "unchanged", summary.unchanged);
    println!("  {:<26} {}", "more observable", summary.more_observable);
    println!("  {:<26} {}", "less observable", summary.less_observable);
    if summary.unclassified > 0 {
        println!("  {:<26} {}", "unclassified", summary.unclassified);
    }

    if !summary.transitions.is_empty() {
        println!();
        println!("Transitions");
        for ((from, to), count) in &summary.transitions {
            println!("  {:<26} {}", format!("{from} -> {to}"), count);
        }
    }
    println!();
}

/// Print the trade-level commentary table, at most `limit` rows.
pub fn print_commentary(table: &ComparisonTable, limit: usize) -> anyhow::Result<()> {
    println!("Trade-Level Commentary on Fair Value Classification Movements");

    if table.is_empty() {
        println!("  (no trades present in both snapshots)");
        return Ok(());
    }

    let shown = &table.records()[..table.num_rows().min(limit)];
    let batch = commentary_batch(shown)?;
    println!("{}", pretty_format_batches(&[batch])?);

    if table.num_rows() > shown.len() {
        println!(
            "  ... and {} more (see the CSV export)",
            table.num_rows() - shown.len()
        );
    }
    Ok(())
}

fn commentary_batch(records: &[ComparisonRecord]) -> anyhow::Result<RecordBatch> {
    let fields: Vec<Field> = COMMENTARY_COLUMNS
        .iter()
        .map(|name| Field::new(*name, DataType::Utf8, false))
        .collect();

    let column = |get: fn(&ComparisonRecord) -> &str| -> ArrayRef {
        Arc::new(records.iter().map(|r| Some(get(r))).collect::<StringArray>())
    };

    Ok(RecordBatch::try_new(
        Arc::new(Schema::new(fields)),
        vec![
            column(|r| r.trade_id.as_str()),
            column(|r| r.prior_level.as_str()),
            column(|r| r.current_level.as_str()),
            column(|r| r.movement_summary.as_str()),
            column(|r| r.commentary.as_str()),
        ],
    )?)
}
