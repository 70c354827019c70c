use std::fs::File;
use std::io::Read;
use std::path::Path;

use timetable_core::config::{ColumnsConfig, DatasetConfig};
use timetable_core::Field;
use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::index::ValueIndex;
use crate::query::SortKey;
use crate::record::{format_time, normalize_cell, parse_date, parse_time, Record, RecordView};

/// Header positions of the typed fields.
#[derive(Debug, Clone, Copy)]
struct Columns {
    category: usize,
    teacher: usize,
    building: usize,
    date: usize,
    start_time: usize,
    end_time: usize,
}

impl Columns {
    fn resolve(header: &[String], names: &ColumnsConfig) -> Result<Self, LoadError> {
        let find = |field: Field| -> Result<usize, LoadError> {
            let name = names.name_of(field);
            let position = header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| LoadError::MissingColumn {
                    column: name.to_string(),
                })?;
            debug!(%field, column = name, position, "column resolved");
            Ok(position)
        };
        Ok(Self {
            category: find(Field::Category)?,
            teacher: find(Field::Teacher)?,
            building: find(Field::Building)?,
            date: find(Field::Date)?,
            start_time: find(Field::StartTime)?,
            end_time: find(Field::EndTime)?,
        })
    }

    fn of(&self, field: Field) -> usize {
        match field {
            Field::Category => self.category,
            Field::Teacher => self.teacher,
            Field::Building => self.building,
            Field::Date => self.date,
            Field::StartTime => self.start_time,
            Field::EndTime => self.end_time,
        }
    }
}

/// The loaded schedule. Built once at startup, read-only afterwards, shared
/// between request handlers as `Arc<Table>`.
#[derive(Debug)]
pub struct Table {
    header: Vec<String>,
    columns: Columns,
    records: Vec<Record>,
    by_category: ValueIndex,
    by_teacher: ValueIndex,
    by_building: ValueIndex,
}

impl Table {
    /// Load a delimiter-separated file. Fails if the file is missing,
    /// malformed, lacks a required column, or holds an unparsable time.
    pub fn load(path: impl AsRef<Path>, dataset: &DatasetConfig) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::from_reader(file, dataset)?;
        info!(
            path = %path.display(),
            rows = table.len(),
            columns = table.header.len(),
            "table loaded"
        );
        Ok(table)
    }

    /// Parse a table from any reader. The first row is the header.
    pub fn from_reader<R: Read>(reader: R, dataset: &DatasetConfig) -> Result<Self, LoadError> {
        if !dataset.delimiter.is_ascii() {
            return Err(LoadError::InvalidDelimiter(dataset.delimiter));
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(dataset.delimiter as u8)
            .has_headers(true)
            .from_reader(reader);

        let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let columns = Columns::resolve(&header, &dataset.columns)?;

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            let mut cells: Vec<String> = row.iter().map(normalize_cell).collect();

            // The date cell is served verbatim; the parsed day only drives
            // range filters and sorting.
            let date = match cells[columns.date].as_str() {
                "" => None,
                raw => {
                    let parsed = parse_date(raw);
                    if parsed.is_none() {
                        warn!(line, value = raw, "unparsable date, row kept without a day");
                    }
                    parsed
                }
            };
            let start_time = typed_time(&cells, &header, columns.start_time, line)?;
            let end_time = typed_time(&cells, &header, columns.end_time, line)?;

            cells[columns.start_time] = format_time(start_time);
            cells[columns.end_time] = format_time(end_time);

            records.push(Record {
                index,
                category: cells[columns.category].clone(),
                teacher: cells[columns.teacher].clone(),
                building: cells[columns.building].clone(),
                date,
                start_time,
                end_time,
                cells,
            });
        }

        let build = |field: Field| {
            ValueIndex::build(records.iter().filter_map(|r| Some((r.categorical(field)?, r.index))))
        };
        let by_category = build(Field::Category);
        let by_teacher = build(Field::Teacher);
        let by_building = build(Field::Building);
        debug!(
            categories = by_category.len(),
            teachers = by_teacher.len(),
            buildings = by_building.len(),
            "value indexes built"
        );

        Ok(Self {
            header,
            columns,
            records,
            by_category,
            by_teacher,
            by_building,
        })
    }

    /// Column names in file order.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// All records in ordinal order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, ordinal: usize) -> Option<&Record> {
        self.records.get(ordinal)
    }

    /// Value index of a categorical field; `None` for the others.
    pub fn index(&self, field: Field) -> Option<&ValueIndex> {
        match field {
            Field::Category => Some(&self.by_category),
            Field::Teacher => Some(&self.by_teacher),
            Field::Building => Some(&self.by_building),
            _ => None,
        }
    }

    /// Resolve a column name to something sortable. Header names win over
    /// the synthetic `index` column; unknown names resolve to `None`.
    pub fn resolve_sort_key(&self, name: &str) -> Option<SortKey> {
        let Some(position) = self.header.iter().position(|h| h == name) else {
            return (name == "index").then_some(SortKey::Index);
        };
        let typed = Field::ALL
            .into_iter()
            .find(|&field| self.columns.of(field) == position);
        Some(match typed {
            Some(field) => SortKey::Field(field),
            None => SortKey::Column(position),
        })
    }

    /// Serializable JSON view of one record.
    pub fn view<'a>(&'a self, record: &'a Record) -> RecordView<'a> {
        RecordView {
            header: &self.header,
            record,
        }
    }
}

fn typed_time(
    cells: &[String],
    header: &[String],
    position: usize,
    line: u64,
) -> Result<Option<chrono::NaiveTime>, LoadError> {
    match cells[position].as_str() {
        "" => Ok(None),
        raw => parse_time(raw).map(Some).ok_or_else(|| LoadError::InvalidTime {
            line,
            column: header[position].clone(),
            value: raw.to_string(),
        }),
    }
}
