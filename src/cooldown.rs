use std::thread;
use std::time::{Duration, Instant};

/// Minimum spacing between consecutive requests.
#[derive(Debug, Clone)]
pub struct Cooldown {
    interval: Duration,
    last_request: Option<Instant>,
}

impl Cooldown {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_request(&self) -> Option<Instant> {
        self.last_request
    }

    /// Time left until the next request may be sent.
    pub fn remaining(&self) -> Duration {
        match self.last_request {
            None => Duration::ZERO,
            Some(last) => self.interval.saturating_sub(last.elapsed()),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Blocks for whatever is left of the interval. Returns the time slept.
    pub fn wait(&self) -> Duration {
        let remaining = self.remaining();
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
        remaining
    }

    pub fn mark_request(&mut self) {
        self.last_request = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_cooldown_is_ready() {
        let cooldown = Cooldown::new(Duration::from_secs(10));
        assert!(cooldown.is_ready());
        assert_eq!(cooldown.remaining(), Duration::ZERO);
        assert_eq!(cooldown.wait(), Duration::ZERO);
    }

    #[test]
    fn not_ready_right_after_request() {
        let mut cooldown = Cooldown::new(Duration::from_secs(10));
        cooldown.mark_request();
        assert!(!cooldown.is_ready());
        assert!(cooldown.remaining() > Duration::from_secs(9));
    }

    #[test]
    fn wait_blocks_for_remaining_time() {
        let mut cooldown = Cooldown::new(Duration::from_millis(100));
        cooldown.mark_request();
        let marked = cooldown.last_request().unwrap();
        cooldown.wait();
        assert!(marked.elapsed() >= Duration::from_millis(100));
        assert!(cooldown.is_ready());
    }

    #[test]
    fn zero_interval_never_blocks() {
        let mut cooldown = Cooldown::new(Duration::ZERO);
        cooldown.mark_request();
        assert!(cooldown.is_ready());
    }
}
