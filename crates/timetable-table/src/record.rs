use chrono::{NaiveDate, NaiveTime};
use serde::ser::{Serialize, SerializeMap, Serializer};
use timetable_core::Field;

/// Cell contents treated as "no value". They normalize to the empty string
/// so filters never deal with nulls.
pub const NULL_TOKENS: [&str; 5] = ["", "NULL", "null", "NaN", "N/A"];

pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATE_FORMATS: [&str; 2] = [DATE_FORMAT, "%d.%m.%Y"];
const TIME_SUFFIX_FORMATS: [&str; 2] = [TIME_FORMAT, "%H:%M"];

/// One schedule row. Identity is `index`, the row's ordinal in the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub index: usize,
    pub category: String,
    pub teacher: String,
    pub building: String,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    /// Every cell in header order, normalized. Time cells hold their
    /// canonical `HH:MM:SS` rendering; the date cell is kept as read.
    pub cells: Vec<String>,
}

impl Record {
    /// Text of a categorical field; `None` for date and time fields.
    pub fn categorical(&self, field: Field) -> Option<&str> {
        match field {
            Field::Category => Some(&self.category),
            Field::Teacher => Some(&self.teacher),
            Field::Building => Some(&self.building),
            _ => None,
        }
    }
}

/// Map null tokens to the empty string; everything else is kept verbatim.
pub fn normalize_cell(raw: &str) -> String {
    if NULL_TOKENS.contains(&raw) {
        String::new()
    } else {
        raw.to_string()
    }
}

/// `HH:MM:SS`. `None` for anything else.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FORMAT).ok()
}

/// Accepts `YYYY-MM-DD` or `DD.MM.YYYY`, optionally followed by a time of
/// day separated by `T` or a space.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let (day, rest) = match s.find(|c: char| c == 'T' || c == ' ') {
        Some(at) => (&s[..at], Some(s[at + 1..].trim())),
        None => (s, None),
    };

    if let Some(rest) = rest {
        let time_ok = TIME_SUFFIX_FORMATS
            .iter()
            .any(|fmt| NaiveTime::parse_from_str(rest, fmt).is_ok());
        if !time_ok {
            return None;
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
}

pub fn format_time(t: Option<NaiveTime>) -> String {
    t.map(|t| t.format(TIME_FORMAT).to_string()).unwrap_or_default()
}

/// JSON view of a record: `index` followed by every column keyed by its
/// header name, in file order.
pub struct RecordView<'a> {
    pub(crate) header: &'a [String],
    pub(crate) record: &'a Record,
}

impl Serialize for RecordView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // A source column literally called "index" wins over the ordinal.
        let emit_ordinal = !self.header.iter().any(|h| h == "index");
        let len = self.header.len() + usize::from(emit_ordinal);

        let mut map = serializer.serialize_map(Some(len))?;
        if emit_ordinal {
            map.serialize_entry("index", &self.record.index)?;
        }
        for (name, value) in self.header.iter().zip(&self.record.cells) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
