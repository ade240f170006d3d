//! Real-time list synchronization.
//!
//! `ripple` keeps a displayed list of entities in step with a remote
//! source of truth. Change notifications arrive over a publish/subscribe
//! transport; bursts are debounced into a single processing pass;
//! affected rows are patched in place when possible and the whole set is
//! reloaded when it is not. While the transport is down, a fixed-interval
//! poll of the primary list substitutes for push updates.
//!
//! The host supplies the collaborators as trait objects (a
//! [`ChangeTransport`], an [`EntityStore`] and a [`SuppressionSource`]),
//! registers one [`ResultSet`] per open view, then drives a
//! [`Coordinator`] and renders from the shared sets as [`ListUpdate`]s
//! arrive.

pub mod config;
pub mod coordinator;
pub mod debounce;
pub mod error;
pub mod feed;
pub mod filter;
pub mod notification;
pub mod patcher;
pub mod refresher;
pub mod resultset;
pub mod stats;
pub mod store;
pub mod transport;

pub use config::SyncConfig;
pub use coordinator::{ConnectionState, Coordinator, CoordinatorHandle, ListUpdate};
pub use error::{FetchError, QueryError, TransportError};
pub use feed::{FeedEntry, FeedLevel, UpdateFeed};
pub use filter::{NotificationFilter, SharedSuppression, SuppressionContext, SuppressionSource};
pub use notification::{ChangeAction, ChangeNotification, PendingQueue};
pub use patcher::{PatchOutcome, RowPatcher};
pub use refresher::FallbackRefresher;
pub use resultset::{ResultSet, ResultSetKind, ResultSetRegistry, SharedResultSet};
pub use stats::{KeyedCache, StatCounts};
pub use store::{EntityRecord, EntityStore, QuerySpec};
pub use transport::{ChangeTransport, TransportEvent, TransportEventSender, TransportEvents};
