use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Minimum spacing between outbound requests, per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delays {
    /// Between listing page fetches
    pub page: Duration,
    /// After each newly saved article during discovery
    pub article: Duration,
    /// Between reference page scrapes during refresh
    pub reference: Duration,
    /// After each refreshed record
    pub record: Duration,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            page: Duration::from_millis(500),
            article: Duration::from_secs(1),
            reference: Duration::from_secs(1),
            record: Duration::from_secs(2),
        }
    }
}

impl Delays {
    pub fn none() -> Self {
        Self {
            page: Duration::ZERO,
            article: Duration::ZERO,
            reference: Duration::ZERO,
            record: Duration::ZERO,
        }
    }
}

/// Scheduled-delay gate: `mark` opens a cool-down, `wait` sleeps until it ends.
///
/// One gate is meant to live for a whole job so a cool-down opened in one phase
/// still holds back the first request of the next.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    next_allowed: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_allowed: None,
        }
    }

    pub async fn wait(&mut self) {
        if let Some(at) = self.next_allowed.take() {
            sleep_until(at).await;
        }
    }

    pub fn mark(&mut self) {
        self.mark_for(self.interval);
    }

    /// Opens a cool-down of `interval`; a later pending deadline is kept.
    pub fn mark_for(&mut self, interval: Duration) {
        let at = Instant::now() + interval;
        self.next_allowed = Some(self.next_allowed.map_or(at, |pending| pending.max(at)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_wait_is_immediate() {
        let mut throttle = Throttle::new(Duration::from_secs(5));
        let start = Instant::now();
        throttle.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_enforces_spacing_after_mark() {
        let mut throttle = Throttle::new(Duration::from_millis(500));
        let start = Instant::now();
        throttle.mark();
        throttle.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(500));

        // wait consumes the cool-down
        let second = Instant::now();
        throttle.wait().await;
        assert_eq!(second.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_time_counts_toward_spacing() {
        let mut throttle = Throttle::new(Duration::from_secs(2));
        throttle.mark();
        tokio::time::sleep(Duration::from_secs(3)).await;
        let before = Instant::now();
        throttle.wait().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mark_for_keeps_the_later_deadline() {
        let mut throttle = Throttle::new(Duration::from_millis(500));
        let start = Instant::now();
        throttle.mark_for(Duration::from_secs(2));
        throttle.mark();
        throttle.wait().await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[test]
    fn test_default_delays() {
        let delays = Delays::default();
        assert_eq!(delays.page, Duration::from_millis(500));
        assert_eq!(delays.record, Duration::from_secs(2));
        assert_eq!(Delays::none().article, Duration::ZERO);
    }
}
