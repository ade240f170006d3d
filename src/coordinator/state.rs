/// Transport connection lifecycle, as observed by the coordinator.
///
/// Transitions are driven by transport lifecycle events, never polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Torn down; nothing is listening.
    Disconnected,
    /// Waiting for the transport's first lifecycle event.
    Connecting,
    /// Transport live; push notifications flow.
    Connected,
    /// Transport down; fixed-interval polling substitutes.
    Degraded,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Degraded => write!(f, "degraded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ConnectionState::Connected.to_string(), "connected");
        assert_eq!(ConnectionState::Degraded.to_string(), "degraded");
    }
}
