use thiserror::Error;

/// Failures reported by the change transport's own surface
/// (subscribe/unsubscribe calls). Connection drops arrive as lifecycle
/// events instead and are recovered by degrading to polling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("transport is not connected")]
    NotConnected,
    #[error("transport error: {0}")]
    Other(String),
}

/// Single-entity fetch failures. Recovered per-entity by the row
/// patcher and aggregated into a partially-applied outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("entity {0} not found")]
    NotFound(String),
    #[error("store error: {0}")]
    Backend(String),
}

/// Full-query failures. The fallback refresher surfaces these to the
/// host; they are the only user-visible error condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("query failed: {0}")]
    Backend(String),
}
