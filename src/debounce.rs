//! Restartable quiet-period timer.
//!
//! Classic debounce: every `arm` restarts the window, so a steady stream
//! of notifications postpones the processing pass until input stops.
//! The same primitive backs the polling interval and the startup probe,
//! each as its own independently cancellable instance.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
pub struct DebounceTimer {
    window: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// (Re)start the quiet period from now. An already-armed timer is
    /// replaced, never doubled.
    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.window);
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Deadline for `select!` integration. Meaningful only while armed;
    /// returns now otherwise so disabled branches stay cheap to build.
    pub fn deadline(&self) -> Instant {
        self.deadline.unwrap_or_else(Instant::now)
    }

    /// Resolve at the armed deadline. Pending forever while unarmed.
    pub async fn fired(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fires_one_window_after_last_arm() {
        let mut timer = DebounceTimer::new(Duration::from_secs(2));
        let start = Instant::now();

        timer.arm(); // t = 0
        tokio::time::advance(Duration::from_secs(1)).await;
        timer.arm(); // t = 1
        tokio::time::advance(Duration::from_millis(800)).await;
        timer.arm(); // t = 1.8

        timer.fired().await;
        assert_eq!(
            Instant::now().duration_since(start),
            Duration::from_millis(3800)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unarmed_timer_never_fires() {
        let timer = DebounceTimer::new(Duration::from_secs(2));

        let result = tokio::time::timeout(Duration::from_secs(60), timer.fired()).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let mut timer = DebounceTimer::new(Duration::from_secs(2));
        timer.arm();
        timer.cancel();

        assert!(!timer.is_armed());
        let result = tokio::time::timeout(Duration::from_secs(60), timer.fired()).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_deadline() {
        let mut timer = DebounceTimer::new(Duration::from_secs(2));
        timer.arm();
        let first = timer.deadline();

        tokio::time::advance(Duration::from_secs(1)).await;
        timer.arm();

        assert_eq!(timer.deadline(), first + Duration::from_secs(1));
    }
}
