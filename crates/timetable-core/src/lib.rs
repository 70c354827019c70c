//! timetable-core: configuration, error taxonomy and shared field names
//! for the timetable dashboard service.

pub mod config;
pub mod error;
pub mod types;

pub use config::TimetableConfig;
pub use error::{Result, TimetableError};
pub use types::Field;
