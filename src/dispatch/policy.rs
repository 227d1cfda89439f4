// Retry decision and quadratic cooldown schedule
// Author: kelexine (https://github.com/kelexine)

use std::time::Duration;
use tracing::debug;

use crate::config::BackoffConfig;
use crate::error::ApiError;

/// What the dispatcher does after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Install a cooldown of this length (unless one is active) and try again.
    Retry { cooldown: Duration },
    /// Return the failure to the caller.
    GiveUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub max_attempts: u32,
    pub cooldown_unit: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            cooldown_unit: Duration::from_secs(1),
        }
    }
}

impl From<&BackoffConfig> for BackoffPolicy {
    fn from(config: &BackoffConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            cooldown_unit: Duration::from_millis(config.cooldown_unit_ms),
        }
    }
}

impl BackoffPolicy {
    /// Cooldown installed after attempt `attempt` fails: `attempt²` units.
    ///
    /// Saturates at [`Duration::MAX`] instead of overflowing.
    pub fn cooldown_for(&self, attempt: u32) -> Duration {
        self.cooldown_unit
            .checked_mul(attempt.saturating_mul(attempt))
            .unwrap_or(Duration::MAX)
    }

    /// The single retry decision shared by transport failures and throttling.
    pub fn decide(&self, failure: &ApiError, attempt: u32) -> RetryDecision {
        if attempt > self.max_attempts {
            debug!(
                "Attempt {} failed ({}), no attempts left",
                attempt,
                failure.kind()
            );
            return RetryDecision::GiveUp;
        }

        let cooldown = self.cooldown_for(attempt);
        debug!(
            "Attempt {} failed ({}), cooling down for {}ms",
            attempt,
            failure.kind(),
            cooldown.as_millis()
        );
        RetryDecision::Retry { cooldown }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_is_quadratic() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.cooldown_for(1), Duration::from_secs(1));
        assert_eq!(policy.cooldown_for(2), Duration::from_secs(4));
        assert_eq!(policy.cooldown_for(3), Duration::from_secs(9));
        assert_eq!(policy.cooldown_for(4), Duration::from_secs(16));
        assert_eq!(policy.cooldown_for(5), Duration::from_secs(25));
    }

    #[test]
    fn test_decide_retries_through_max_attempt() {
        let policy = BackoffPolicy::default();
        let failure = ApiError::Transport("reset".to_string());
        assert_eq!(
            policy.decide(&failure, 1),
            RetryDecision::Retry { cooldown: Duration::from_secs(1) }
        );
        assert_eq!(
            policy.decide(&failure, 5),
            RetryDecision::Retry { cooldown: Duration::from_secs(25) }
        );
        assert_eq!(policy.decide(&failure, 6), RetryDecision::GiveUp);
    }

    #[test]
    fn test_throttling_shares_the_decision() {
        let policy = BackoffPolicy::default();
        let throttled = ApiError::Throttled { message: "slow down".to_string() };
        let transport = ApiError::Transport("reset".to_string());
        for attempt in 1..=6 {
            assert_eq!(policy.decide(&throttled, attempt), policy.decide(&transport, attempt));
        }
    }

    #[test]
    fn test_policy_from_config() {
        let config = BackoffConfig {
            max_attempts: 2,
            cooldown_unit_ms: 10,
        };
        let policy = BackoffPolicy::from(&config);
        assert_eq!(policy.max_attempts, 2);
        assert_eq!(policy.cooldown_for(3), Duration::from_millis(90));
    }

    #[test]
    fn test_huge_cooldown_unit_saturates() {
        let config = BackoffConfig {
            max_attempts: 5,
            cooldown_unit_ms: u64::MAX,
        };
        let policy = BackoffPolicy::from(&config);
        assert_eq!(policy.cooldown_for(5), Duration::MAX);
        assert_eq!(
            policy.decide(&ApiError::Transport("reset".to_string()), 5),
            RetryDecision::Retry { cooldown: Duration::MAX }
        );
    }
}
