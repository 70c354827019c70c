//! Per-value postings for the categorical columns.
//!
//! Each distinct value maps to the ascending list of record ordinals that
//! carry it. Equality filters intersect postings instead of scanning the
//! table; results keep ordinal order, so they are indistinguishable from a
//! linear scan.

use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct ValueIndex {
    postings: HashMap<String, Vec<usize>>,
}

impl ValueIndex {
    /// Build from `(value, ordinal)` pairs supplied in ascending ordinal order.
    pub fn build<'a>(values: impl IntoIterator<Item = (&'a str, usize)>) -> Self {
        let mut postings: HashMap<String, Vec<usize>> = HashMap::new();
        for (value, ordinal) in values {
            postings.entry(value.to_string()).or_default().push(ordinal);
        }
        Self { postings }
    }

    /// Ordinals of records whose value equals `value` exactly.
    pub fn get(&self, value: &str) -> &[usize] {
        self.postings.get(value).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// `(value, count)` by descending count; ties keep first-seen order.
    pub fn value_counts(&self) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize, usize)> = self
            .postings
            .iter()
            .map(|(value, ids)| (value.as_str(), ids.len(), ids[0]))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        counts
            .into_iter()
            .map(|(value, count, _)| (value, count))
            .collect()
    }
}

/// Intersection of two ascending ordinal lists.
pub fn intersect_sorted(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}
