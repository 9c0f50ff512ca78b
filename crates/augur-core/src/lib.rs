pub mod level;
pub mod schema;
pub mod trade;

pub use level::{IfrsLevel, LevelValue, ParseLevelError};
pub use schema::{classification_batch, columns};
pub use trade::{ComparisonRecord, Movement, TradeClassification};
