//! HTTP gateway over the in-memory timetable: a dashboard page, paginated
//! listing, aggregate stats and a health probe.

pub mod app;
pub mod cache;
pub mod http;
