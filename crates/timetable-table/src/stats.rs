//! Value counts over the whole table, independent of any listing filter.

use timetable_core::Field;

use crate::table::Table;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatEntry {
    pub key: String,
    pub count: usize,
}

/// Frequency tables for the three categorical columns, each sorted by
/// descending count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub event_stats: Vec<StatEntry>,
    pub teacher_stats: Vec<StatEntry>,
    pub building_stats: Vec<StatEntry>,
}

/// Count values of category, teacher and building over every record.
///
/// Ties are broken by first appearance in the file, so the output is
/// deterministic. Empty cells are counted under the empty key.
pub fn aggregate(table: &Table) -> Stats {
    let counts = |field: Field| -> Vec<StatEntry> {
        table
            .index(field)
            .map(|idx| {
                idx.value_counts()
                    .into_iter()
                    .map(|(key, count)| StatEntry {
                        key: key.to_string(),
                        count,
                    })
                    .collect()
            })
            .unwrap_or_default()
    };

    Stats {
        event_stats: counts(Field::Category),
        teacher_stats: counts(Field::Teacher),
        building_stats: counts(Field::Building),
    }
}
