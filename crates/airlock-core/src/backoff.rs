//! Reconnection backoff policy.
//!
//! Pure scheduling math: maps a retry-attempt count to the delay before the
//! next connection attempt. Attempt execution lives in `airlock-sync`.

use std::time::Duration;

/// Default base delay in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;
/// Default maximum delay in milliseconds.
pub const DEFAULT_MAX_DELAY_MS: u64 = 30_000;

/// Deterministic exponential backoff without jitter.
///
/// `delay(n) = min(base * 2^n, max)`. The feed is a convenience channel on
/// top of state that is also obtainable by direct query, so a predictable
/// retry cadence is preferred over jittered spread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Base delay for the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Ceiling applied to every computed delay, in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
        }
    }
}

impl BackoffPolicy {
    /// Create a policy with explicit bounds.
    #[must_use]
    pub fn new(base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            base_delay_ms,
            max_delay_ms,
        }
    }

    /// Delay before retry number `attempt` (zero-based), in milliseconds.
    ///
    /// Overflow-safe for arbitrarily large attempt counts: the exponent is
    /// clamped to 31 and the multiply saturates, so the result is always
    /// capped at `max_delay_ms`.
    #[must_use]
    pub fn delay_ms(&self, attempt: u32) -> u64 {
        let exponential = self.base_delay_ms.saturating_mul(1u64 << attempt.min(31));
        exponential.min(self.max_delay_ms)
    }

    /// Delay before retry number `attempt` as a [`Duration`].
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.delay_ms(attempt))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
