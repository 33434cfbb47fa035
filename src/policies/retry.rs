//! # Retry policy for load cycles.
//!
//! [`RetryPolicy`] bounds how many failed loads a component tolerates before a
//! load cycle gives up. Retries are issued immediately (no backoff).
//!
//! The failure counter is owned by the component and **shared** by all of its
//! in-flight load cycles. It only resets when a cycle exceeds the ceiling.
//!
//! ```text
//! failure #1 ─► counter=1 ─► retry
//! failure #2 ─► counter=2 ─► retry
//! failure #3 ─► counter=3 ─► retry
//! failure #4 ─► counter=4 > 3 ─► reset to 0, give up
//! ```

/// Bound on consecutive load failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Failures tolerated before giving up (`0` = single attempt, no retry).
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    /// Returns a policy with `max_retries = 3`.
    fn default() -> Self {
        Self { max_retries: 3 }
    }
}

impl RetryPolicy {
    /// Policy for a single attempt with no retry.
    pub const fn never() -> Self {
        Self { max_retries: 0 }
    }

    /// Policy tolerating `max_retries` failures.
    pub const fn bounded(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// True if a cycle may retry after the counter reached `failures`.
    #[inline]
    pub fn allows(&self, failures: u32) -> bool {
        failures <= self.max_retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allows_three_retries() {
        let p = RetryPolicy::default();
        assert!(p.allows(1));
        assert!(p.allows(3));
        assert!(!p.allows(4));
    }

    #[test]
    fn test_never_allows_nothing() {
        assert!(!RetryPolicy::never().allows(1));
    }
}
