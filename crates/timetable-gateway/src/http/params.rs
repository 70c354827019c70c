//! Query-string handling shared by the read endpoints.
//!
//! Parameters are collected into a name → value map (a repeated name keeps
//! its last value). The same map drives both typed parsing and the cache
//! key, so two URLs that parse identically also share a cache entry.

use std::collections::BTreeMap;

use timetable_table::query::{DEFAULT_PAGE, DEFAULT_PER_PAGE};
use timetable_table::record::parse_date;
use timetable_table::{QueryError, QueryParams, SortDirection, SortSpec};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams(BTreeMap<String, String>);

impl RequestParams {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self(pairs.into_iter().collect())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Canonical cache key: endpoint plus the parameter map, JSON-encoded
    /// with names in sorted order.
    pub fn cache_key(&self, endpoint: &str) -> String {
        format!("{endpoint}:{}", serde_json::to_string(&self.0).unwrap_or_default())
    }

    /// Build typed listing parameters.
    ///
    /// Only `page` and `per_page` can fail. Unparsable dates, unknown sort
    /// columns and missing `columns[N][data]` entries all mean "no filter"
    /// or "no sort".
    pub fn to_query(&self) -> Result<QueryParams, QueryError> {
        let params = QueryParams {
            start_date: self.get("start_date").and_then(parse_date),
            end_date: self.get("end_date").and_then(parse_date),
            category: self.get("event_type").map(str::to_string),
            teacher: self.get("teacher").map(str::to_string),
            building: self.get("building").map(str::to_string),
            sort: self.sort_spec(),
            page: self.count("page", DEFAULT_PAGE)?,
            per_page: self.count("per_page", DEFAULT_PER_PAGE)?,
        };
        params.validate()?;
        Ok(params)
    }

    fn count(&self, name: &'static str, default: usize) -> Result<usize, QueryError> {
        match self.get(name) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|_| QueryError::InvalidParameter {
                name,
                expected: "an integer",
                value: raw.to_string(),
            }),
        }
    }

    /// DataTables sends `order[0][column]=<position>` plus
    /// `columns[<position>][data]=<name>`. The dashboard script sends the
    /// flat `order_column`/`order_dir` form instead.
    fn sort_spec(&self) -> Option<SortSpec> {
        let position = self
            .get("order[0][column]")
            .or_else(|| self.get("order_column"))
            .filter(|p| !p.is_empty())?;
        let column = self
            .get(&format!("columns[{position}][data]"))
            .filter(|c| !c.is_empty())?;
        let direction = SortDirection::from_param(
            self.get("order[0][dir]").or_else(|| self.get("order_dir")),
        );
        Some(SortSpec {
            column: column.to_string(),
            direction,
        })
    }
}
