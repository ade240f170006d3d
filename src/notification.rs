use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Insert,
    Update,
    Delete,
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeAction::Insert => write!(f, "insert"),
            ChangeAction::Update => write!(f, "update"),
            ChangeAction::Delete => write!(f, "delete"),
        }
    }
}

impl std::str::FromStr for ChangeAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "insert" | "create" => Ok(ChangeAction::Insert),
            "update" | "modify" => Ok(ChangeAction::Update),
            "delete" | "trash" => Ok(ChangeAction::Delete),
            _ => Err(anyhow::anyhow!("Unknown change action: {}", s)),
        }
    }
}

/// A single change delivered by the transport. Immutable once received;
/// lives only in the pending queue until a processing pass consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeNotification {
    pub entity_type: String,
    pub entity_id: String,
    pub action: ChangeAction,
    /// Who made the change (informational only; effects are always
    /// re-derived from fetched data, never from the notification).
    pub actor: String,
    pub occurred_at: DateTime<Utc>,
}

impl ChangeNotification {
    pub fn new(
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        action: ChangeAction,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            action,
            actor: actor.into(),
            occurred_at: Utc::now(),
        }
    }
}

/// Accumulates accepted notifications between processing passes.
///
/// Duplicates are kept at insert time; consumption collapses a drained
/// batch to unique entity ids. The queue is never drained partially.
#[derive(Debug, Default)]
pub struct PendingQueue {
    entries: Vec<ChangeNotification>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: ChangeNotification) {
        self.entries.push(notification);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Empty the queue and hand the whole batch to the caller.
    pub fn drain(&mut self) -> Vec<ChangeNotification> {
        std::mem::take(&mut self.entries)
    }
}

/// Collapse a drained batch to unique entity ids, first-seen order
/// preserved.
pub fn unique_ids(batch: &[ChangeNotification]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for notification in batch {
        if seen.insert(notification.entity_id.as_str()) {
            ids.push(notification.entity_id.clone());
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn change(id: &str, action: ChangeAction) -> ChangeNotification {
        ChangeNotification::new("issue", id, action, "admin")
    }

    #[test]
    fn test_action_display() {
        assert_eq!(ChangeAction::Insert.to_string(), "insert");
        assert_eq!(ChangeAction::Update.to_string(), "update");
        assert_eq!(ChangeAction::Delete.to_string(), "delete");
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!(ChangeAction::from_str("insert").unwrap(), ChangeAction::Insert);
        assert_eq!(ChangeAction::from_str("create").unwrap(), ChangeAction::Insert);
        assert_eq!(ChangeAction::from_str("Update").unwrap(), ChangeAction::Update);
        assert_eq!(ChangeAction::from_str("delete").unwrap(), ChangeAction::Delete);
        assert!(ChangeAction::from_str("rename").is_err());
    }

    #[test]
    fn test_action_serde_lowercase() {
        let json = serde_json::to_string(&ChangeAction::Insert).unwrap();
        assert_eq!(json, "\"insert\"");
        let action: ChangeAction = serde_json::from_str("\"delete\"").unwrap();
        assert_eq!(action, ChangeAction::Delete);
    }

    #[test]
    fn test_queue_keeps_duplicates_until_drained() {
        let mut queue = PendingQueue::new();
        queue.push(change("ISS-1", ChangeAction::Update));
        queue.push(change("ISS-1", ChangeAction::Update));
        queue.push(change("ISS-2", ChangeAction::Update));

        assert_eq!(queue.len(), 3);

        let batch = queue.drain();
        assert!(queue.is_empty());
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn test_unique_ids_first_seen_order() {
        let batch = vec![
            change("ISS-2", ChangeAction::Update),
            change("ISS-1", ChangeAction::Update),
            change("ISS-2", ChangeAction::Update),
            change("ISS-3", ChangeAction::Update),
        ];

        assert_eq!(unique_ids(&batch), vec!["ISS-2", "ISS-1", "ISS-3"]);
    }

    #[test]
    fn test_clear_empties_without_yielding() {
        let mut queue = PendingQueue::new();
        queue.push(change("ISS-1", ChangeAction::Insert));
        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }
}
