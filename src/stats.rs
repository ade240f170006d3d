//! Derived stat snapshots over a result set, memoized by input hash.
//!
//! The stat-filter strip shows per-value row counts (status, priority,
//! ...). Recomputing on every render is wasteful; a `KeyedCache` stores
//! `(input_hash, value)` and recomputes only when the hash of the rows'
//! relevant field values changes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde_json::Value;

use crate::resultset::ResultSet;
use crate::store::EntityRecord;

/// Single-slot memo keyed by a hash of its input.
#[derive(Debug)]
pub struct KeyedCache<T> {
    slot: Option<(u64, T)>,
}

impl<T> Default for KeyedCache<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T: Clone> KeyedCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value when the hash matches, otherwise compute
    /// and replace the slot.
    pub fn get_or_compute(&mut self, input_hash: u64, compute: impl FnOnce() -> T) -> T {
        if let Some((hash, value)) = &self.slot {
            if *hash == input_hash {
                return value.clone();
            }
        }
        let value = compute();
        self.slot = Some((input_hash, value.clone()));
        value
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }
}

/// Hash a set of rows on one field, for stat invalidation.
pub fn field_hash(records: &[EntityRecord], field: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    field.hash(&mut hasher);
    for record in records {
        record.id.hash(&mut hasher);
        if let Some(value) = record.field(field) {
            value.to_string().hash(&mut hasher);
        }
    }
    hasher.finish()
}

/// Per-value row counts over one field, in row order. Rows missing the
/// field are skipped.
pub fn field_counts(records: &[EntityRecord], field: &str) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in records {
        let Some(value) = record.field(field) else {
            continue;
        };
        let label = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        match counts.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }
    counts
}

/// Memoized stat strip for one field of a result set.
#[derive(Debug)]
pub struct StatCounts {
    field: String,
    cache: KeyedCache<Vec<(String, usize)>>,
}

impl StatCounts {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            cache: KeyedCache::new(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Counts for the set's current rows, recomputed only when the
    /// rows' field values change.
    pub fn counts_for(&mut self, set: &ResultSet) -> Vec<(String, usize)> {
        let hash = field_hash(set.entries(), &self.field);
        let field = &self.field;
        let entries = set.entries();
        self.cache
            .get_or_compute(hash, || field_counts(entries, field))
    }
}
