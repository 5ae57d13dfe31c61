/// At-most-one-per-window gate
///
/// The window is measured from the last *delivered* notification. Attempts
/// inside it are rejected and do not move the window.
#[derive(Debug, Clone)]
pub struct Throttle {
    window_ms: u64,
    last_delivered_ms: Option<i64>,
}

impl Throttle {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_delivered_ms: None,
        }
    }

    pub fn last_delivered_ms(&self) -> Option<i64> {
        self.last_delivered_ms
    }

    /// Record a delivery at `now_ms` if the window allows it
    pub fn try_acquire(&mut self, now_ms: i64) -> bool {
        if let Some(last) = self.last_delivered_ms {
            let elapsed = now_ms.saturating_sub(last);
            if elapsed < 0 || (elapsed as u64) < self.window_ms {
                return false;
            }
        }
        self.last_delivered_ms = Some(now_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_attempt_always_passes() {
        let mut throttle = Throttle::new(5000);
        assert!(throttle.try_acquire(0));
        assert_eq!(throttle.last_delivered_ms(), Some(0));
    }

    #[test]
    fn test_inside_window_is_dropped() {
        let mut throttle = Throttle::new(5000);
        assert!(throttle.try_acquire(1_000));
        assert!(!throttle.try_acquire(5_999));
        assert_eq!(throttle.last_delivered_ms(), Some(1_000));
    }

    #[test]
    fn test_window_boundary_delivers() {
        let mut throttle = Throttle::new(5000);
        assert!(throttle.try_acquire(1_000));
        assert!(throttle.try_acquire(6_000));
    }

    #[test]
    fn test_dropped_attempts_do_not_extend_window() {
        let mut throttle = Throttle::new(5000);
        assert!(throttle.try_acquire(0));
        assert!(!throttle.try_acquire(4_000));
        assert!(throttle.try_acquire(5_000));
    }

    #[test]
    fn test_zero_window_never_throttles() {
        let mut throttle = Throttle::new(0);
        assert!(throttle.try_acquire(10));
        assert!(throttle.try_acquire(10));
    }
}
