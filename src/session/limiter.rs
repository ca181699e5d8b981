//! # Address Change Rate Limiter
//!
//! A token bucket of capacity 1 with a fixed refill delay. The live loop
//! consults it before every address change so a held button does not walk
//! the address on every poll tick. The re-arm runs as a detached delayed
//! task and never blocks the control loop.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::time::{sleep, Duration};

/// Delay before another address change is permitted.
pub const ADDRESS_CHANGE_COOLDOWN: Duration = Duration::from_millis(125);

/// Single-permit limiter with asynchronous re-arm.
#[derive(Debug)]
pub struct AddressRateLimiter {
    permit: Arc<Semaphore>,
    cooldown: Duration,
}

impl AddressRateLimiter {
    /// Creates a limiter whose first change is immediately permitted.
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        Self {
            permit: Arc::new(Semaphore::new(1)),
            cooldown,
        }
    }

    /// Attempts to consume the permit.
    ///
    /// On success the permit is handed back after the cooldown by a
    /// detached task, and the caller may apply its change. On failure the
    /// change must be skipped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn try_change(&self) -> bool {
        match self.permit.try_acquire() {
            Ok(permit) => {
                permit.forget();

                let semaphore = Arc::clone(&self.permit);
                let cooldown = self.cooldown;
                tokio::spawn(async move {
                    sleep(cooldown).await;
                    semaphore.add_permits(1);
                });

                true
            }
            Err(_) => false,
        }
    }
}

impl Default for AddressRateLimiter {
    fn default() -> Self {
        Self::new(ADDRESS_CHANGE_COOLDOWN)
    }
}
