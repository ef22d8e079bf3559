//! Minimum-spacing rate limiter for outbound remote calls.
//!
//! One instance is shared by the catalog aggregator and the stream resolver,
//! so every network dispatch in the process is spaced by at least the
//! configured interval.

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Duration, Instant};

/// Enforces a minimum interval between granted call slots.
///
/// Callers reserve the next slot under the lock and wait for it outside the
/// lock, so queued callers line up at `min_interval` spacing without holding
/// each other up during the sleep.
pub struct RateLimiter {
    min_interval: Duration,
    cooldown: Duration,
    next_slot: Mutex<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration, cooldown: Duration) -> Self {
        Self {
            min_interval,
            cooldown,
            next_slot: Mutex::new(Instant::now()),
        }
    }

    /// Wait until at least `min_interval` has passed since the previously
    /// granted slot, claiming the new slot atomically.
    pub async fn acquire(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = if *next > now { *next } else { now };
            *next = slot + self.min_interval;
            slot
        };
        sleep_until(slot).await;
    }

    /// Push the next slot out by the fixed cooldown.
    ///
    /// Called after an upstream "too many requests" signal; a single fixed
    /// pause, not a backoff schedule.
    pub async fn penalize(&self) {
        let mut next = self.next_slot.lock().await;
        let target = Instant::now() + self.cooldown;
        if *next < target {
            *next = target;
        }
    }
}
