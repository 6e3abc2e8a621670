pub mod cache;
pub mod classify;
pub mod date;
pub mod partition;
pub mod query;
pub mod types;

pub use cache::{ClassificationCache, ReceiptCollection};
pub use classify::{Classification, Section, SkippedRecords, classify, find_receipt};
pub use partition::{CalendarMonths, Grouping, PartitionStrategy, RollingWindows, SectionBounds};
pub use query::SearchQuery;
pub use types::{DateSpan, Receipt, ReferenceDay};
