//! Host-facing feed of sync notices.
//!
//! Consumes [`ListUpdate`]s and keeps a bounded, auto-expiring list of
//! human-readable entries plus a marker for the most recent data change.
//! Intended for a notification strip or status bar; the host drains the
//! coordinator's update channel into it and calls `clear_expired` from
//! its own tick.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::coordinator::{ConnectionState, ListUpdate};

const MAX_ENTRIES: usize = 50;
const DEFAULT_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One human-readable notice.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub level: FeedLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Marker for the most recent in-place data change.
#[derive(Debug, Clone)]
pub struct LastUpdate {
    pub entity_ids: Vec<String>,
    pub at: DateTime<Utc>,
}

pub struct UpdateFeed {
    entries: VecDeque<FeedEntry>,
    ttl: Duration,
    last_update: Option<LastUpdate>,
}

impl Default for UpdateFeed {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl UpdateFeed {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: VecDeque::new(),
            ttl,
            last_update: None,
        }
    }

    /// Turn a coordinator event into feed entries.
    pub fn absorb(&mut self, update: &ListUpdate) {
        match update {
            ListUpdate::Patched { entity_ids } => {
                self.push(
                    FeedLevel::Info,
                    format!("{} row(s) updated", entity_ids.len()),
                );
                self.last_update = Some(LastUpdate {
                    entity_ids: entity_ids.clone(),
                    at: Utc::now(),
                });
            }
            ListUpdate::Refreshed { name, rows } => {
                self.push(FeedLevel::Info, format!("\"{}\" reloaded ({} rows)", name, rows));
            }
            ListUpdate::RefreshFailed { reason } => {
                self.push(FeedLevel::Error, format!("Refresh failed: {}", reason));
            }
            ListUpdate::ConnectionChanged(state) => match state {
                ConnectionState::Connected => {
                    self.push(FeedLevel::Success, "Live updates connected".to_string());
                }
                ConnectionState::Degraded => {
                    self.push(
                        FeedLevel::Warning,
                        "Live updates unavailable, polling for changes".to_string(),
                    );
                }
                // Connecting and teardown are not worth a notice.
                ConnectionState::Connecting | ConnectionState::Disconnected => {}
            },
        }
    }

    fn push(&mut self, level: FeedLevel, message: String) {
        if self.entries.len() == MAX_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(FeedEntry {
            level,
            message,
            at: Utc::now(),
        });
    }

    /// Drop entries older than the TTL.
    pub fn clear_expired(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|entry| {
            let age = Utc::now().signed_duration_since(entry.at).num_milliseconds();
            age >= 0 && (age as u128) < ttl.as_millis()
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    pub fn last_update(&self) -> Option<&LastUpdate> {
        self.last_update.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_patched_sets_last_update() {
        let mut feed = UpdateFeed::default();
        feed.absorb(&ListUpdate::Patched {
            entity_ids: vec!["ISS-1".to_string(), "ISS-2".to_string()],
        });

        assert_eq!(feed.len(), 1);
        let entry = feed.entries().next().unwrap();
        assert_eq!(entry.level, FeedLevel::Info);
        assert_eq!(entry.message, "2 row(s) updated");

        let last = feed.last_update().unwrap();
        assert_eq!(last.entity_ids, vec!["ISS-1", "ISS-2"]);
    }

    #[test]
    fn test_refresh_failure_is_an_error_entry() {
        let mut feed = UpdateFeed::default();
        feed.absorb(&ListUpdate::RefreshFailed {
            reason: "query failed: backend down".to_string(),
        });

        let entry = feed.entries().next().unwrap();
        assert_eq!(entry.level, FeedLevel::Error);
        assert!(entry.message.contains("backend down"));
    }

    #[test]
    fn test_connection_notices() {
        let mut feed = UpdateFeed::default();
        feed.absorb(&ListUpdate::ConnectionChanged(ConnectionState::Degraded));
        feed.absorb(&ListUpdate::ConnectionChanged(ConnectionState::Connected));
        feed.absorb(&ListUpdate::ConnectionChanged(ConnectionState::Disconnected));

        let levels: Vec<FeedLevel> = feed.entries().map(|entry| entry.level).collect();
        assert_eq!(levels, vec![FeedLevel::Warning, FeedLevel::Success]);
    }

    #[test]
    fn test_capped_at_max_entries() {
        let mut feed = UpdateFeed::new(Duration::from_secs(3600));
        for i in 0..60 {
            feed.absorb(&ListUpdate::Refreshed {
                name: format!("view-{}", i),
                rows: i,
            });
        }

        assert_eq!(feed.len(), 50);
        // Oldest entries were evicted first.
        assert!(feed.entries().next().unwrap().message.starts_with("\"view-10\""));
    }

    #[test]
    fn test_zero_ttl_expires_everything() {
        let mut feed = UpdateFeed::new(Duration::ZERO);
        feed.absorb(&ListUpdate::Refreshed {
            name: "issues".to_string(),
            rows: 3,
        });
        assert_eq!(feed.len(), 1);

        feed.clear_expired();
        assert!(feed.is_empty());
    }
}
