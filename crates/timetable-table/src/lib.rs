//! timetable-table: the in-memory schedule table and everything that reads it.
//!
//! The table is loaded once at startup and never mutated afterwards:
//!
//! - [`Table`]: ordered, immutable records plus a per-value index of the
//!   categorical columns
//! - [`query`]: filter → stable sort → paginate
//! - [`aggregate`]: value counts over category, teacher and building
//!
//! ```rust,no_run
//! use timetable_core::config::DatasetConfig;
//! use timetable_table::{aggregate, query, QueryParams, Table};
//!
//! let table = Table::load("app/data.csv", &DatasetConfig::default()).unwrap();
//! let page = query(&table, &QueryParams::default()).unwrap();
//! println!("{} of {} rows", page.records.len(), page.total);
//! let stats = aggregate(&table);
//! println!("{} categories", stats.event_stats.len());
//! ```

pub mod error;
pub mod index;
pub mod query;
pub mod record;
pub mod stats;
pub mod table;

pub use error::{LoadError, QueryError};
pub use query::{query, PageResult, QueryParams, SortDirection, SortKey, SortSpec};
pub use record::{Record, RecordView};
pub use stats::{aggregate, StatEntry, Stats};
pub use table::Table;
