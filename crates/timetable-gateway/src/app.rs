use axum::{routing::get, Router};
use std::sync::Arc;
use timetable_core::TimetableConfig;
use timetable_table::Table;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::cache::ResponseCache;

/// Shared state for every handler. The table is loaded once at startup
/// and only read afterwards.
pub struct AppState {
    pub config: TimetableConfig,
    pub table: Arc<Table>,
    pub cache: ResponseCache,
}

impl AppState {
    pub fn new(config: TimetableConfig, table: Table) -> Self {
        let cache = ResponseCache::from_config(&config.cache);
        Self {
            config,
            table: Arc::new(table),
            cache,
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(crate::http::ui::ui_handler))
        .route("/health", get(crate::http::health::health_handler))
        .route("/api/data", get(crate::http::data::data_handler))
        .route("/api/stats", get(crate::http::stats::stats_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}
