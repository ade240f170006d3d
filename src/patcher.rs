//! In-place row patching: refetch just the affected entities and merge
//! them into the displayed result set, instead of reloading everything.

use std::sync::Arc;

use futures_util::future::join_all;

use crate::resultset::SharedResultSet;
use crate::store::EntityStore;

/// Result of one targeted patch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Every visible entity in the batch was refetched and merged.
    Applied { updated: usize },
    /// Some fetches failed; the caller should fall back to a full reload.
    PartiallyApplied { updated: usize, failed: Vec<String> },
    /// No entity in the batch is visible; the caller must not refresh.
    NotApplicable,
}

pub struct RowPatcher {
    store: Arc<dyn EntityStore>,
}

impl RowPatcher {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Refetch the listed entities and merge each into its existing row.
    ///
    /// Only entities visible in the current page window are considered;
    /// out-of-view changes are dropped and never force a reload. Fetches
    /// run concurrently and fail independently; one failure leaves the
    /// other rows' merges intact.
    pub async fn patch(&self, set: &SharedResultSet, entity_ids: &[String]) -> PatchOutcome {
        let (entity_type, visible) = {
            let set = set.read().await;
            let visible: Vec<String> = entity_ids
                .iter()
                .filter(|id| set.contains(id))
                .cloned()
                .collect();
            (set.query().entity_type.clone(), visible)
        };

        if visible.is_empty() {
            return PatchOutcome::NotApplicable;
        }

        let store = &self.store;
        let entity_type = entity_type.as_str();
        let results = join_all(visible.iter().map(|id| async move {
            (id.as_str(), store.fetch_one(entity_type, id).await)
        }))
        .await;

        let mut updated = 0usize;
        let mut failed: Vec<String> = Vec::new();
        {
            let mut set = set.write().await;
            for (id, result) in results {
                match result {
                    Ok(fresh) => match set.get_mut(id) {
                        Some(row) => {
                            row.merge_from(&fresh);
                            updated += 1;
                        }
                        // Row vanished between the snapshot and the merge.
                        None => failed.push(id.to_string()),
                    },
                    Err(e) => {
                        tracing::warn!("Fetch failed for {}: {}", id, e);
                        failed.push(id.to_string());
                    }
                }
            }
        }

        if failed.is_empty() {
            PatchOutcome::Applied { updated }
        } else {
            PatchOutcome::PartiallyApplied { updated, failed }
        }
    }
}
