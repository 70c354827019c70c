//! Filter → stable sort → paginate over a [`Table`].

use std::cmp::Ordering;

use chrono::NaiveDate;
use timetable_core::Field;
use tracing::debug;

use crate::error::QueryError;
use crate::index::intersect_sorted;
use crate::record::Record;
use crate::table::Table;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PER_PAGE: usize = 10;
pub const MAX_PER_PAGE: usize = 100;

/// Filter value meaning "no filter".
pub const ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Only the exact string `desc` sorts descending.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Column name as it appears in the header (or `index`).
    pub column: String,
    pub direction: SortDirection,
}

/// A column the table knows how to order by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Row ordinal in file order.
    Index,
    /// One of the typed columns.
    Field(Field),
    /// An opaque column, by header position.
    Column(usize),
}

impl SortKey {
    fn compare(self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortKey::Index => a.index.cmp(&b.index),
            SortKey::Field(Field::Date) => a.date.cmp(&b.date),
            SortKey::Field(Field::StartTime) => a.start_time.cmp(&b.start_time),
            SortKey::Field(Field::EndTime) => a.end_time.cmp(&b.end_time),
            SortKey::Field(field) => a.categorical(field).cmp(&b.categorical(field)),
            SortKey::Column(position) => compare_cells(&a.cells[position], &b.cells[position]),
        }
    }
}

/// Opaque cells: numbers before text, numbers numerically, text byte-wise.
fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Everything `/api/data` can ask for, already typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub teacher: Option<String>,
    pub building: Option<String>,
    pub sort: Option<SortSpec>,
    pub page: usize,
    pub per_page: usize,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            category: None,
            teacher: None,
            building: None,
            sort: None,
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl QueryParams {
    /// Reject out-of-range pagination before any filtering happens.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.page < 1 {
            return Err(QueryError::InvalidParameter {
                name: "page",
                expected: ">= 1",
                value: self.page.to_string(),
            });
        }
        if !(1..=MAX_PER_PAGE).contains(&self.per_page) {
            return Err(QueryError::InvalidParameter {
                name: "per_page",
                expected: "between 1 and 100",
                value: self.per_page.to_string(),
            });
        }
        Ok(())
    }

    /// Active equality filters. Empty values and `all` are no filter.
    fn filters(&self) -> impl Iterator<Item = (Field, &str)> {
        [
            (Field::Category, &self.category),
            (Field::Teacher, &self.teacher),
            (Field::Building, &self.building),
        ]
        .into_iter()
        .filter_map(|(field, value)| match value.as_deref() {
            None | Some("") | Some(ALL) => None,
            Some(v) => Some((field, v)),
        })
    }

    fn date_in_range(&self, record: &Record) -> bool {
        if self.start_date.is_none() && self.end_date.is_none() {
            return true;
        }
        let Some(date) = record.date else {
            return false;
        };
        self.start_date.map_or(true, |start| date >= start)
            && self.end_date.map_or(true, |end| date <= end)
    }
}

/// One page of matching records plus the pre-pagination match count.
#[derive(Debug)]
pub struct PageResult<'a> {
    pub records: Vec<&'a Record>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

/// Run a listing query against the table.
///
/// The three categorical filters go through the value indexes, so the
/// candidate set is an intersection of postings and stays in ordinal order.
/// The sort is stable; rows with equal keys keep their file order in both
/// directions.
pub fn query<'a>(table: &'a Table, params: &QueryParams) -> Result<PageResult<'a>, QueryError> {
    params.validate()?;

    let mut candidates: Option<Vec<usize>> = None;
    for (field, value) in params.filters() {
        let postings = table.index(field).map(|idx| idx.get(value)).unwrap_or(&[]);
        candidates = Some(match candidates {
            None => postings.to_vec(),
            Some(current) => intersect_sorted(&current, postings),
        });
    }

    let mut rows: Vec<&Record> = match candidates {
        None => table.iter().filter(|r| params.date_in_range(r)).collect(),
        Some(ordinals) => ordinals
            .into_iter()
            .filter_map(|i| table.get(i))
            .filter(|r| params.date_in_range(r))
            .collect(),
    };

    if let Some(spec) = &params.sort {
        match table.resolve_sort_key(&spec.column) {
            Some(key) => match spec.direction {
                SortDirection::Asc => rows.sort_by(|a, b| key.compare(a, b)),
                SortDirection::Desc => rows.sort_by(|a, b| key.compare(b, a)),
            },
            None => debug!(column = %spec.column, "unknown sort column ignored"),
        }
    }

    let total = rows.len();
    let offset = (params.page - 1).saturating_mul(params.per_page);
    let records: Vec<&Record> = rows.into_iter().skip(offset).take(params.per_page).collect();

    Ok(PageResult {
        records,
        total,
        page: params.page,
        per_page: params.per_page,
    })
}
