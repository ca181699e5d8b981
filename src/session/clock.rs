//! # Session Clock
//!
//! Tracks the reference instant that each emitted frame's elapsed-millis
//! field is measured from. The reference moves to "now" on every mark, so
//! successive marks yield inter-frame delays; a reset forces the next mark
//! to read zero and start a fresh reference.

use tokio::time::Instant;

/// Resettable clock producing inter-mark delays in milliseconds.
#[derive(Debug)]
pub struct SessionClock {
    reference: Instant,
    reset_pending: bool,
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionClock {
    /// Creates a clock whose first mark reads zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reference: Instant::now(),
            reset_pending: true,
        }
    }

    /// Requests that the next mark read zero.
    pub fn reset(&mut self) {
        self.reset_pending = true;
    }

    /// Returns milliseconds elapsed since the previous mark (or 0 right
    /// after a reset) and moves the reference to now.
    pub fn mark(&mut self) -> u64 {
        let now = Instant::now();

        let millis = if self.reset_pending {
            self.reset_pending = false;
            0
        } else {
            now.duration_since(self.reference).as_millis() as u64
        };

        self.reference = now;
        millis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, Duration};

    #[tokio::test(start_paused = true)]
    async fn test_first_mark_reads_zero() {
        let mut clock = SessionClock::new();
        advance(Duration::from_millis(500)).await;
        assert_eq!(clock.mark(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_marks_measure_inter_mark_delay() {
        let mut clock = SessionClock::new();
        clock.mark();

        advance(Duration::from_millis(150)).await;
        assert_eq!(clock.mark(), 150);

        advance(Duration::from_millis(40)).await;
        assert_eq!(clock.mark(), 40);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_zeroes_next_mark_only() {
        let mut clock = SessionClock::new();
        clock.mark();

        advance(Duration::from_millis(300)).await;
        clock.reset();
        assert_eq!(clock.mark(), 0);

        advance(Duration::from_millis(75)).await;
        assert_eq!(clock.mark(), 75);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_also_moves_reference() {
        let mut clock = SessionClock::new();
        clock.mark();

        advance(Duration::from_millis(1000)).await;
        clock.reset();
        clock.mark();

        advance(Duration::from_millis(20)).await;
        // the 1000ms before the reset must not leak into this measurement
        assert_eq!(clock.mark(), 20);
    }
}
