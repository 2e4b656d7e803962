//! Backoff after failed RedisQ polls.
//!
//! Three tiers driven by consecutive failures:
//!
//! | condition              | action                                          |
//! |------------------------|-------------------------------------------------|
//! | short < 3              | short += 1, sleep 5s                            |
//! | short >= 3, long < 3   | short = 0, long += 1, sleep 60s                 |
//! | otherwise              | short = 0, long = 0, very_long += 1, sleep 300s |
//!
//! `short` is incremented before the first check, so the third failure in a row
//! is the one that escalates. A successful poll resets nothing: counters only
//! move when a tier escalates.

use std::time::Duration;

pub const SHORT_BACKOFF: Duration = Duration::from_secs(5);
pub const LONG_BACKOFF: Duration = Duration::from_secs(60);
pub const VERY_LONG_BACKOFF: Duration = Duration::from_secs(300);

/// Failures tolerated in a tier before escalating to the next
const TIER_LIMIT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffTier {
    Short,
    Long,
    VeryLong,
}

/// What the listener should do after a failed poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffAction {
    pub tier: BackoffTier,
    pub delay: Duration,
    /// Counter of `tier` after the transition
    pub count: u32,
}

/// Failure counters for the RedisQ poll loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backoff {
    short: u32,
    long: u32,
    very_long: u32,
    tier: Option<BackoffTier>,
}

impl Backoff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed poll and pick the delay before the next one
    pub fn on_failure(&mut self) -> BackoffAction {
        self.short += 1;

        let action = if self.short < TIER_LIMIT {
            BackoffAction {
                tier: BackoffTier::Short,
                delay: SHORT_BACKOFF,
                count: self.short,
            }
        } else if self.long < TIER_LIMIT {
            self.short = 0;
            self.long += 1;
            BackoffAction {
                tier: BackoffTier::Long,
                delay: LONG_BACKOFF,
                count: self.long,
            }
        } else {
            self.short = 0;
            self.long = 0;
            self.very_long += 1;
            BackoffAction {
                tier: BackoffTier::VeryLong,
                delay: VERY_LONG_BACKOFF,
                count: self.very_long,
            }
        };

        self.tier = Some(action.tier);
        action
    }

    pub fn short(&self) -> u32 {
        self.short
    }

    pub fn long(&self) -> u32 {
        self.long
    }

    pub fn very_long(&self) -> u32 {
        self.very_long
    }

    /// Tier of the most recent failure, `None` before the first failure
    pub fn tier(&self) -> Option<BackoffTier> {
        self.tier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(backoff: &Backoff) -> (u32, u32, u32) {
        (backoff.short(), backoff.long(), backoff.very_long())
    }

    #[test]
    fn four_failures_escalate_once_then_restart_short_tier() {
        let mut backoff = Backoff::new();

        let first = backoff.on_failure();
        assert_eq!(first.delay, SHORT_BACKOFF);
        assert_eq!(counters(&backoff), (1, 0, 0));

        let second = backoff.on_failure();
        assert_eq!(second.delay, SHORT_BACKOFF);
        assert_eq!(counters(&backoff), (2, 0, 0));

        let third = backoff.on_failure();
        assert_eq!(third.tier, BackoffTier::Long);
        assert_eq!(third.delay, LONG_BACKOFF);
        assert_eq!(counters(&backoff), (0, 1, 0));

        let fourth = backoff.on_failure();
        assert_eq!(fourth.tier, BackoffTier::Short);
        assert_eq!(fourth.delay, SHORT_BACKOFF);
        assert_eq!(counters(&backoff), (1, 1, 0));
    }

    #[test]
    fn escalates_to_very_long_after_three_long_episodes() {
        let mut backoff = Backoff::new();

        let delays: Vec<Duration> = (0..9).map(|_| backoff.on_failure().delay).collect();
        assert_eq!(delays.iter().filter(|d| **d == LONG_BACKOFF).count(), 3);
        assert_eq!(counters(&backoff), (0, 3, 0));

        // Two more short failures, then the tier after long is exhausted
        backoff.on_failure();
        backoff.on_failure();
        let action = backoff.on_failure();

        assert_eq!(action.tier, BackoffTier::VeryLong);
        assert_eq!(action.delay, VERY_LONG_BACKOFF);
        assert_eq!(action.count, 1);
        assert_eq!(counters(&backoff), (0, 0, 1));
        assert_eq!(backoff.tier(), Some(BackoffTier::VeryLong));
    }

    #[test]
    fn very_long_counter_is_unbounded() {
        let mut backoff = Backoff::new();

        let very_long = (0..100)
            .map(|_| backoff.on_failure())
            .filter(|action| action.tier == BackoffTier::VeryLong)
            .count();

        assert_eq!(backoff.very_long() as usize, very_long);
        assert!(very_long > 1);
    }
}
