//! Request pacing for the upstream APIs.
//!
//! DESIGN
//! ======
//! Both providers throttle anonymous clients, so outgoing requests are
//! spaced at a fixed interval. The limiter keeps a single "next free slot"
//! instant behind a `tokio::sync::Mutex`. Callers take the lock in arrival
//! order (tokio's mutex is fair), claim the current slot, push it forward
//! by one spacing interval, then sleep until their slot outside the lock.
//!
//! TRADE-OFFS
//! ==========
//! No priorities and no cancellation: a caller dropped while sleeping still
//! consumes its slot. Slots never accumulate while idle, so a burst after a
//! quiet period starts immediately but is spaced from then on.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

// =============================================================================
// PACED LIMITER
// =============================================================================

/// FIFO token-paced limiter. Cloning shares the same queue.
#[derive(Clone)]
pub struct PacedLimiter {
    spacing: Duration,
    next_slot: Arc<Mutex<Option<Instant>>>,
}

impl PacedLimiter {
    /// Limiter releasing at most `max_per_second` callers per second.
    /// Returns `None` when `max_per_second` is zero (pacing disabled).
    #[must_use]
    pub fn per_second(max_per_second: u32) -> Option<Self> {
        if max_per_second == 0 {
            return None;
        }
        Some(Self::with_spacing(Duration::from_secs(1) / max_per_second))
    }

    #[must_use]
    pub fn with_spacing(spacing: Duration) -> Self {
        Self { spacing, next_slot: Arc::new(Mutex::new(None)) }
    }

    #[must_use]
    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    /// Suspend until it is this caller's turn.
    pub async fn acquire(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(reserved) if reserved > now => reserved,
                _ => now,
            };
            *next = Some(slot + self.spacing);
            slot
        };
        tokio::time::sleep_until(slot).await;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
