//! The connection/polling supervisor: one select loop owning the whole
//! synchronization pipeline.
//!
//! All callbacks (transport events, host commands, the debounce
//! deadline, poll ticks) run on this single logical control thread.
//! Per-entity fetches fan out concurrently inside the row patcher but
//! merge back here.

mod flush;
mod state;

pub use state::ConnectionState;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::SyncConfig;
use crate::debounce::DebounceTimer;
use crate::filter::{NotificationFilter, SuppressionSource};
use crate::notification::PendingQueue;
use crate::patcher::RowPatcher;
use crate::refresher::FallbackRefresher;
use crate::resultset::{ResultSetRegistry, SharedResultSet};
use crate::store::EntityStore;
use crate::transport::{ChangeTransport, TransportEvent, TransportEvents};

/// Host-facing events describing what the coordinator did to the data.
///
/// Transient connectivity loss is deliberately quiet: a state change,
/// not an error. A failed full refresh is the terminal fallback and the
/// only event a host should surface as a failure notice.
#[derive(Debug, Clone)]
pub enum ListUpdate {
    /// Rows were merged in place; bound views update without a reload.
    Patched { entity_ids: Vec<String> },
    /// A result set was reloaded wholesale.
    Refreshed { name: String, rows: usize },
    /// The full reload failed.
    RefreshFailed { reason: String },
    ConnectionChanged(ConnectionState),
}

#[derive(Debug)]
enum Command {
    Refresh,
    BecameVisible,
    ViewChanged,
    Shutdown,
}

/// Cloneable handle for driving a running coordinator. All methods are
/// fire-and-forget; sends after shutdown are silently ignored.
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl CoordinatorHandle {
    /// Full reload of the active result set, clearing anything pending.
    pub fn refresh(&self) {
        let _ = self.commands.send(Command::Refresh);
    }

    /// Edge signal: the view became visible again. Reconciles changes
    /// the filter dropped while hidden.
    pub fn became_visible(&self) {
        let _ = self.commands.send(Command::BecameVisible);
    }

    /// The set of open views changed; pending work no longer applies.
    pub fn view_changed(&self) {
        let _ = self.commands.send(Command::ViewChanged);
    }

    /// Tear down the coordinator. Safe to call more than once.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}

pub struct Coordinator {
    config: SyncConfig,
    state: ConnectionState,
    transport: Arc<dyn ChangeTransport>,
    events: TransportEvents,
    events_closed: bool,
    suppression: Arc<dyn SuppressionSource>,
    registry: Arc<ResultSetRegistry>,
    filter: NotificationFilter,
    pending: PendingQueue,
    debounce: DebounceTimer,
    poll: DebounceTimer,
    probe: DebounceTimer,
    patcher: RowPatcher,
    refresher: FallbackRefresher,
    commands: mpsc::UnboundedReceiver<Command>,
    updates: mpsc::UnboundedSender<ListUpdate>,
}

impl Coordinator {
    pub fn new(
        config: SyncConfig,
        transport: Arc<dyn ChangeTransport>,
        events: TransportEvents,
        store: Arc<dyn EntityStore>,
        suppression: Arc<dyn SuppressionSource>,
        registry: Arc<ResultSetRegistry>,
    ) -> (
        Self,
        CoordinatorHandle,
        mpsc::UnboundedReceiver<ListUpdate>,
    ) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        let coordinator = Self {
            filter: NotificationFilter::new(config.entity_type.as_str(), config.list.accept_inserts),
            debounce: DebounceTimer::new(config.debounce.window()),
            poll: DebounceTimer::new(config.polling.interval()),
            probe: DebounceTimer::new(config.polling.startup_grace()),
            patcher: RowPatcher::new(store.clone()),
            refresher: FallbackRefresher::new(store),
            state: ConnectionState::Connecting,
            events_closed: false,
            pending: PendingQueue::new(),
            config,
            transport,
            events,
            suppression,
            registry,
            commands: command_rx,
            updates: update_tx,
        };

        (
            coordinator,
            CoordinatorHandle {
                commands: command_tx,
            },
            update_rx,
        )
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Drive the coordinator until shutdown.
    pub async fn run(mut self) {
        self.probe.arm();
        loop {
            tokio::select! {
                event = self.events.recv(), if !self.events_closed => {
                    match event {
                        Some(event) => self.on_transport_event(event).await,
                        None => {
                            // Transport dropped its sender; same as a disconnect.
                            self.events_closed = true;
                            self.enter_degraded("transport event channel closed").await;
                        }
                    }
                }
                command = self.commands.recv() => {
                    match command {
                        Some(Command::Shutdown) | None => break,
                        Some(command) => self.on_command(command).await,
                    }
                }
                _ = self.debounce.fired(), if self.debounce.is_armed() => {
                    self.debounce.cancel();
                    self.flush().await;
                }
                _ = self.poll.fired(), if self.poll.is_armed() => {
                    self.poll.arm();
                    self.poll_refresh().await;
                }
                _ = self.probe.fired(), if self.probe.is_armed() => {
                    self.probe.cancel();
                    if self.state == ConnectionState::Connecting {
                        self.enter_degraded("no transport lifecycle event within startup grace")
                            .await;
                    }
                }
            }
        }
        self.teardown().await;
    }

    async fn on_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Connected => {
                self.probe.cancel();
                self.poll.cancel();
                self.set_state(ConnectionState::Connected);
                if let Err(e) = self.transport.subscribe(&self.config.entity_type).await {
                    tracing::warn!("Subscribe failed for {}: {}", self.config.entity_type, e);
                }
            }
            TransportEvent::Disconnected => {
                self.enter_degraded("transport disconnected").await;
            }
            TransportEvent::ConnectError(reason) => {
                self.enter_degraded(&reason).await;
            }
            TransportEvent::Notification(notification) => {
                let context = self.suppression.current();
                if !self.filter.accept(&notification, &context) {
                    tracing::debug!(
                        "Dropped {} notification for {}",
                        notification.action,
                        notification.entity_id
                    );
                    return;
                }
                self.pending.push(notification);
                self.debounce.arm();
            }
        }
    }

    async fn on_command(&mut self, command: Command) {
        match command {
            Command::Refresh => self.manual_refresh().await,
            Command::BecameVisible => {
                if self.pending.is_empty() {
                    // Nothing queued, but the filter may have dropped
                    // changes while hidden; reconcile with one reload.
                    self.manual_refresh().await;
                } else {
                    self.debounce.cancel();
                    self.flush().await;
                }
            }
            Command::ViewChanged => {
                self.pending.clear();
                self.debounce.cancel();
            }
            // Handled by the run loop.
            Command::Shutdown => {}
        }
    }

    async fn enter_degraded(&mut self, reason: &str) {
        if self.state == ConnectionState::Degraded {
            return;
        }
        tracing::info!("Falling back to polling: {}", reason);
        self.probe.cancel();
        self.poll.arm();
        self.set_state(ConnectionState::Degraded);
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state != state {
            tracing::debug!("Connection state {} -> {}", self.state, state);
            self.state = state;
            let _ = self.updates.send(ListUpdate::ConnectionChanged(state));
        }
    }

    async fn manual_refresh(&mut self) {
        self.pending.clear();
        self.debounce.cancel();
        let Some((set, _)) = self.registry.select_active().await else {
            return;
        };
        self.refresh_set(&set).await;
    }

    /// Poll tick. Polling has no per-entity granularity, so it bypasses
    /// the filter and patcher and reloads the primary list.
    async fn poll_refresh(&mut self) {
        let Some(set) = self.registry.primary().await else {
            return;
        };
        self.refresh_set(&set).await;
    }

    async fn refresh_set(&mut self, set: &SharedResultSet) {
        match self.refresher.refresh(set).await {
            Ok(rows) => {
                let name = set.read().await.name().to_string();
                let _ = self.updates.send(ListUpdate::Refreshed { name, rows });
            }
            Err(e) => {
                let _ = self.updates.send(ListUpdate::RefreshFailed {
                    reason: e.to_string(),
                });
            }
        }
    }

    async fn teardown(&mut self) {
        self.debounce.cancel();
        self.poll.cancel();
        self.probe.cancel();
        self.pending.clear();
        if self.state == ConnectionState::Connected {
            if let Err(e) = self.transport.unsubscribe(&self.config.entity_type).await {
                tracing::warn!("Unsubscribe failed for {}: {}", self.config.entity_type, e);
            }
        }
        self.set_state(ConnectionState::Disconnected);
    }
}
