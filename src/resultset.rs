//! Materialized result sets and the registry the resource selector
//! works over.
//!
//! One result set per concurrently open view. The coordinator mutates
//! entries in place by entity id and only replaces contents wholesale on
//! a full reload; the host holds the other end of the `Arc` and renders
//! from it.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::store::{EntityRecord, QuerySpec};

/// Which kind of view a result set backs. Variant order is selection
/// priority: most specific first, the main list last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResultSetKind {
    /// Single-entity view.
    Detail,
    /// Stat-filtered list view.
    Filtered,
    /// The main list.
    Primary,
}

impl std::fmt::Display for ResultSetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultSetKind::Detail => write!(f, "detail"),
            ResultSetKind::Filtered => write!(f, "filtered"),
            ResultSetKind::Primary => write!(f, "primary"),
        }
    }
}

/// A named, ordered list of entities backing one open view, together
/// with the query that defines it.
#[derive(Debug)]
pub struct ResultSet {
    name: String,
    kind: ResultSetKind,
    query: QuerySpec,
    entries: Vec<EntityRecord>,
    total_count: u64,
}

impl ResultSet {
    pub fn new(name: impl Into<String>, kind: ResultSetKind, query: QuerySpec) -> Self {
        Self {
            name: name.into(),
            kind,
            query,
            entries: Vec::new(),
            total_count: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ResultSetKind {
        self.kind
    }

    pub fn query(&self) -> &QuerySpec {
        &self.query
    }

    pub fn entries(&self) -> &[EntityRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Row count matching the query's filters, beyond the page window.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn contains(&self, entity_id: &str) -> bool {
        self.entries.iter().any(|record| record.id == entity_id)
    }

    pub fn get(&self, entity_id: &str) -> Option<&EntityRecord> {
        self.entries.iter().find(|record| record.id == entity_id)
    }

    pub fn get_mut(&mut self, entity_id: &str) -> Option<&mut EntityRecord> {
        self.entries.iter_mut().find(|record| record.id == entity_id)
    }

    /// Replace contents wholesale after a full reload.
    pub fn replace_all(&mut self, entries: Vec<EntityRecord>, total_count: u64) {
        self.entries = entries;
        self.total_count = total_count;
    }
}

pub type SharedResultSet = Arc<RwLock<ResultSet>>;

struct Registered {
    name: String,
    kind: ResultSetKind,
    set: SharedResultSet,
}

/// The currently open views' result sets. Views register on open and
/// unregister on close; the selector picks the active set by kind
/// priority, insertion order breaking ties.
#[derive(Default)]
pub struct ResultSetRegistry {
    sets: RwLock<Vec<Registered>>,
}

impl ResultSetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(
        &self,
        name: impl Into<String>,
        kind: ResultSetKind,
        query: QuerySpec,
    ) -> SharedResultSet {
        let name = name.into();
        let set = Arc::new(RwLock::new(ResultSet::new(name.clone(), kind, query)));
        self.sets.write().await.push(Registered {
            name,
            kind,
            set: set.clone(),
        });
        set
    }

    pub async fn unregister(&self, name: &str) {
        self.sets.write().await.retain(|registered| registered.name != name);
    }

    /// The highest-priority open view's set, with its kind. `None` when
    /// no view is open.
    pub async fn select_active(&self) -> Option<(SharedResultSet, ResultSetKind)> {
        let sets = self.sets.read().await;
        sets.iter()
            .min_by_key(|registered| registered.kind)
            .map(|registered| (registered.set.clone(), registered.kind))
    }

    /// The main list, target of the polling fallback.
    pub async fn primary(&self) -> Option<SharedResultSet> {
        let sets = self.sets.read().await;
        sets.iter()
            .find(|registered| registered.kind == ResultSetKind::Primary)
            .map(|registered| registered.set.clone())
    }

    pub async fn len(&self) -> usize {
        self.sets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sets.read().await.is_empty()
    }
}
