//! The debounced processing pass.
//!
//! Fires once the quiet period closes after the last accepted
//! notification, or immediately when visibility returns with work
//! pending. Effects are always re-derived from freshly fetched data, so
//! stale or out-of-order notifications self-correct.

use super::{Coordinator, ListUpdate};
use crate::notification::{unique_ids, ChangeAction};
use crate::patcher::PatchOutcome;

impl Coordinator {
    /// Drain the pending queue and apply one processing pass to the
    /// active result set. The queue is consumed whole, never partially.
    pub(super) async fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let batch = self.pending.drain();

        let Some((set, kind)) = self.registry.select_active().await else {
            tracing::debug!("No open result set, dropped {} pending change(s)", batch.len());
            return;
        };

        let ids = unique_ids(&batch);
        tracing::debug!(
            "Processing pass: {} change(s), {} unique id(s), {} view",
            batch.len(),
            ids.len(),
            kind
        );

        // Inserts and deletes change which rows belong in the window;
        // only update-only batches can be repaired row by row.
        let membership_change = batch
            .iter()
            .any(|notification| notification.action != ChangeAction::Update);
        if membership_change {
            self.refresh_set(&set).await;
            return;
        }

        match self.patcher.patch(&set, &ids).await {
            PatchOutcome::Applied { .. } => {
                let _ = self.updates.send(ListUpdate::Patched { entity_ids: ids });
            }
            PatchOutcome::NotApplicable => {
                // Nothing visible changed; a reload would only cause churn.
            }
            PatchOutcome::PartiallyApplied { updated, failed } => {
                tracing::warn!(
                    "Patch left {} row(s) stale ({} merged), falling back to reload",
                    failed.len(),
                    updated
                );
                self.refresh_set(&set).await;
            }
        }
    }
}
