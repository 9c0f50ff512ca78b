//! Movement-over-Time: joins two classification snapshots on `trade_id` and
//! annotates each trade with a movement summary and commentary.

mod error;
pub use error::{MotError, Snapshot};

pub mod commentary;

mod engine;
pub use engine::{JoinSuffixes, compare, compare_with};

mod snapshot;
pub use snapshot::{read_snapshot, read_snapshot_path};

mod table;
pub use table::{ComparisonTable, EXPORT_FILE_NAME, MovementSummary};
