//! The entity store seam: source of truth for records and list queries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FetchError, QueryError};

const DEFAULT_ORDER_BY: &str = "creation desc";
const DEFAULT_PAGE_LENGTH: usize = 10;

/// A single entity row as displayed in a list. Fields are an open map so
/// a freshly fetched record can be merged field-wise into a displayed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EntityRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Field-wise overwrite from a freshly fetched record. The receiving
    /// record keeps its slot in the result set; only field values move,
    /// so anything bound to the row observes the update in place.
    pub fn merge_from(&mut self, fresh: &EntityRecord) {
        for (key, value) in &fresh.fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }
}

/// The defining query of a result set. A reload re-runs exactly this,
/// with the same filters and the same page window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub entity_type: String,
    pub filters: Map<String, Value>,
    pub order_by: String,
    pub limit_start: usize,
    pub limit_page_length: usize,
}

impl QuerySpec {
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            filters: Map::new(),
            order_by: DEFAULT_ORDER_BY.to_string(),
            limit_start: 0,
            limit_page_length: DEFAULT_PAGE_LENGTH,
        }
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = order_by.into();
        self
    }

    pub fn with_page(mut self, start: usize, length: usize) -> Self {
        self.limit_start = start;
        self.limit_page_length = length;
        self
    }
}

/// Source of truth for entity data.
///
/// All methods are async to support remote backends; implementations are
/// expected to be cheap to clone behind an `Arc`.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Fetch the authoritative current record for one entity.
    async fn fetch_one(&self, entity_type: &str, entity_id: &str)
        -> Result<EntityRecord, FetchError>;

    /// Run a result set's defining query.
    async fn query(&self, spec: &QuerySpec) -> Result<Vec<EntityRecord>, QueryError>;

    /// Total row count for the query's filters, ignoring the page window.
    async fn count(&self, spec: &QuerySpec) -> Result<u64, QueryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overwrites_and_keeps_unlisted_fields() {
        let mut displayed = EntityRecord::new("ISS-1")
            .with_field("status", "Open")
            .with_field("subject", "Printer on fire")
            .with_field("priority", "High");

        let fresh = EntityRecord::new("ISS-1")
            .with_field("status", "Closed")
            .with_field("modified_by", "admin");

        displayed.merge_from(&fresh);

        assert_eq!(displayed.field("status").unwrap(), "Closed");
        assert_eq!(displayed.field("modified_by").unwrap(), "admin");
        // A field the fetch did not carry stays as displayed.
        assert_eq!(displayed.field("subject").unwrap(), "Printer on fire");
        assert_eq!(displayed.field("priority").unwrap(), "High");
    }

    #[test]
    fn test_query_spec_defaults() {
        let spec = QuerySpec::new("issue");

        assert_eq!(spec.entity_type, "issue");
        assert!(spec.filters.is_empty());
        assert_eq!(spec.order_by, "creation desc");
        assert_eq!(spec.limit_start, 0);
        assert_eq!(spec.limit_page_length, 10);
    }

    #[test]
    fn test_query_spec_builder() {
        let spec = QuerySpec::new("issue")
            .with_filter("status", "Open")
            .with_order_by("modified desc")
            .with_page(20, 50);

        assert_eq!(spec.filters.get("status").unwrap(), "Open");
        assert_eq!(spec.order_by, "modified desc");
        assert_eq!(spec.limit_start, 20);
        assert_eq!(spec.limit_page_length, 50);
    }

    #[test]
    fn test_record_serde_flattens_fields() {
        let record = EntityRecord::new("ISS-9").with_field("status", "Open");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], "ISS-9");
        assert_eq!(json["status"], "Open");

        let back: EntityRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
