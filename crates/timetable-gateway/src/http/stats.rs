//! Aggregate counts endpoint: GET /api/stats
//!
//! Response:
//! `{ "event_stats": [{"type": .., "count": ..}], "teacher_stats":
//! [{"teacher": .., "count": ..}], "building_stats": [{"building": .., "count": ..}] }`

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::Response,
};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;
use timetable_core::TimetableError;
use timetable_table::{aggregate, StatEntry, Table};

use super::error::{error_response, ApiError};
use super::json_body;
use super::params::RequestParams;
use crate::app::AppState;

pub const ENDPOINT: &str = "/api/stats";

/// A stat group serialized as `[{<label>: key, "count": n}, ...]`.
struct Labeled<'a> {
    label: &'static str,
    entries: &'a [StatEntry],
}

impl Serialize for Labeled<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter().map(|entry| LabeledEntry {
            label: self.label,
            entry,
        }))
    }
}

struct LabeledEntry<'a> {
    label: &'static str,
    entry: &'a StatEntry,
}

impl Serialize for LabeledEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.label, &self.entry.key)?;
        map.serialize_entry("count", &self.entry.count)?;
        map.end()
    }
}

#[derive(serde::Serialize)]
struct StatsResponse<'a> {
    event_stats: Labeled<'a>,
    teacher_stats: Labeled<'a>,
    building_stats: Labeled<'a>,
}

/// GET /api/stats: value counts over the whole table.
pub async fn stats_handler(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let params = RequestParams::from_pairs(pairs);
    let body = state
        .cache
        .get_or_compute(&params.cache_key(ENDPOINT), || render_stats(&state.table))
        .map_err(error_response)?;
    Ok(json_body(body))
}

pub fn render_stats(table: &Table) -> Result<Bytes, TimetableError> {
    let stats = aggregate(table);
    let response = StatsResponse {
        event_stats: Labeled {
            label: "type",
            entries: &stats.event_stats,
        },
        teacher_stats: Labeled {
            label: "teacher",
            entries: &stats.teacher_stats,
        },
        building_stats: Labeled {
            label: "building",
            entries: &stats.building_stats,
        },
    };
    Ok(Bytes::from(serde_json::to_vec(&response)?))
}
