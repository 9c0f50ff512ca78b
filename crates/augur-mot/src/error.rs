use std::fmt;

use thiserror::Error;

/// Which side of the comparison a table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Snapshot {
    Prior,
    Current,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Snapshot::Prior => f.write_str("prior"),
            Snapshot::Current => f.write_str("current"),
        }
    }
}

#[derive(Debug, Error)]
pub enum MotError {
    #[error("snapshot file not found: {0}")]
    SnapshotNotFound(std::path::PathBuf),

    #[error(
        "{snapshot} snapshot is missing required column(s): {}; both files must contain 'trade_id' and 'Predicted IFRS13 Level'",
        .columns.join(", ")
    )]
    MissingColumns {
        snapshot: Snapshot,
        columns: Vec<String>,
    },

    #[error("joined output would contain duplicate column {0:?}; choose different suffixes")]
    DuplicateColumn(String),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
