//! The publish/subscribe change transport seam.
//!
//! Lifecycle events and notifications arrive on an unbounded channel the
//! coordinator owns; this module's trait covers the calls made back into
//! the transport. Reconnection policy is the transport's own business;
//! the coordinator only reacts to the events it surfaces.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::notification::ChangeNotification;

/// Lifecycle and data events delivered by the transport.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    Connected,
    Disconnected,
    ConnectError(String),
    Notification(ChangeNotification),
}

/// Receiving end handed to the coordinator.
pub type TransportEvents = mpsc::UnboundedReceiver<TransportEvent>;

/// Sending end a transport implementation feeds.
pub type TransportEventSender = mpsc::UnboundedSender<TransportEvent>;

/// Create the event channel between a transport implementation and the
/// coordinator.
pub fn event_channel() -> (TransportEventSender, TransportEvents) {
    mpsc::unbounded_channel()
}

/// Publish/subscribe channel keyed by entity type.
#[async_trait]
pub trait ChangeTransport: Send + Sync {
    /// Join the change channel for one entity type.
    async fn subscribe(&self, entity_type: &str) -> Result<(), TransportError>;

    /// Leave the change channel for one entity type.
    async fn unsubscribe(&self, entity_type: &str) -> Result<(), TransportError>;
}
