//! Decides whether an incoming change notification is worth enqueueing.
//!
//! Rejected notifications are dropped, not deferred: the coordinator's
//! visibility-regained path reconciles whatever was suppressed.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::notification::{ChangeAction, ChangeNotification};

/// Snapshot of host view state consulted before enqueueing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuppressionContext {
    /// View is hidden or backgrounded.
    pub hidden: bool,
    /// A bulk operation is in progress.
    pub bulk_edit: bool,
}

impl SuppressionContext {
    pub fn suppressed(&self) -> bool {
        self.hidden || self.bulk_edit
    }
}

/// Host-owned source of the current suppression flags. Read-only to the
/// coordinator.
pub trait SuppressionSource: Send + Sync {
    fn current(&self) -> SuppressionContext;
}

/// Atomic-flag implementation for hosts that flip visibility/bulk state
/// from outside the coordinator's control thread.
#[derive(Debug, Default)]
pub struct SharedSuppression {
    hidden: AtomicBool,
    bulk_edit: AtomicBool,
}

impl SharedSuppression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.hidden.store(hidden, Ordering::Relaxed);
    }

    pub fn set_bulk_edit(&self, active: bool) {
        self.bulk_edit.store(active, Ordering::Relaxed);
    }
}

impl SuppressionSource for SharedSuppression {
    fn current(&self) -> SuppressionContext {
        SuppressionContext {
            hidden: self.hidden.load(Ordering::Relaxed),
            bulk_edit: self.bulk_edit.load(Ordering::Relaxed),
        }
    }
}

/// Pure accept/reject predicate over incoming notifications.
#[derive(Debug, Clone)]
pub struct NotificationFilter {
    entity_type: String,
    /// Accept insert actions. Off for fixed-window lists that should not
    /// shift when a new row appears.
    accept_inserts: bool,
}

impl NotificationFilter {
    pub fn new(entity_type: impl Into<String>, accept_inserts: bool) -> Self {
        Self {
            entity_type: entity_type.into(),
            accept_inserts,
        }
    }

    /// No side effects; a `false` means the notification is dropped.
    pub fn accept(&self, notification: &ChangeNotification, context: &SuppressionContext) -> bool {
        if notification.entity_type != self.entity_type {
            return false;
        }
        if context.suppressed() {
            return false;
        }
        if !self.accept_inserts && notification.action == ChangeAction::Insert {
            return false;
        }
        true
    }
}
