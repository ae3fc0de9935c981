//! Recursion and elapsed-time guard for redirect chains.

use std::time::Duration;
use thiserror::Error;

/// A guard limit that was exceeded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardViolation {
    #[error("Maximum recursion limit [{max}] exceeded (depth {depth})")]
    RecursionLimitExceeded { depth: u32, max: u32 },

    #[error("Maximum question timeout [{max_ms}ms] exceeded ({elapsed_ms}ms)")]
    TimeoutExceeded { elapsed_ms: u128, max_ms: u128 },
}

/// Limits checked before every sentence dispatch.
///
/// `None` disables the corresponding check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardLimits {
    max_depth: Option<u32>,
    max_elapsed: Option<Duration>,
}

impl GuardLimits {
    pub fn new(max_depth: Option<u32>, max_elapsed: Option<Duration>) -> Self {
        Self {
            max_depth,
            max_elapsed,
        }
    }

    /// Limits that never trip.
    pub fn unlimited() -> Self {
        Self::new(None, None)
    }

    pub fn max_depth(&self) -> Option<u32> {
        self.max_depth
    }

    pub fn max_elapsed(&self) -> Option<Duration> {
        self.max_elapsed
    }

    /// Checks a recursion depth and elapsed time against the limits.
    ///
    /// Depth equal to the maximum is still allowed; only exceeding it fails.
    pub fn check(&self, depth: u32, elapsed: Duration) -> Result<(), GuardViolation> {
        if let Some(max) = self.max_depth {
            if depth > max {
                return Err(GuardViolation::RecursionLimitExceeded { depth, max });
            }
        }

        if let Some(max) = self.max_elapsed {
            if elapsed > max {
                return Err(GuardViolation::TimeoutExceeded {
                    elapsed_ms: elapsed.as_millis(),
                    max_ms: max.as_millis(),
                });
            }
        }

        Ok(())
    }
}

impl Default for GuardLimits {
    fn default() -> Self {
        Self::new(Some(100), Some(Duration::from_secs(60)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_at_limit_passes() {
        let limits = GuardLimits::new(Some(3), None);
        assert!(limits.check(3, Duration::ZERO).is_ok());
    }

    #[test]
    fn depth_over_limit_fails() {
        let limits = GuardLimits::new(Some(3), None);
        assert_eq!(
            limits.check(4, Duration::ZERO),
            Err(GuardViolation::RecursionLimitExceeded { depth: 4, max: 3 })
        );
    }

    #[test]
    fn elapsed_over_limit_fails() {
        let limits = GuardLimits::new(None, Some(Duration::from_millis(50)));
        let result = limits.check(0, Duration::from_millis(51));
        assert!(matches!(result, Err(GuardViolation::TimeoutExceeded { max_ms: 50, .. })));
    }

    #[test]
    fn unlimited_never_trips() {
        let limits = GuardLimits::unlimited();
        assert!(limits.check(u32::MAX, Duration::from_secs(86_400)).is_ok());
    }

    #[test]
    fn recursion_is_checked_before_time() {
        let limits = GuardLimits::new(Some(1), Some(Duration::from_millis(1)));
        let result = limits.check(2, Duration::from_secs(1));
        assert!(matches!(result, Err(GuardViolation::RecursionLimitExceeded { .. })));
    }
}
