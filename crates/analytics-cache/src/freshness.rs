//! Freshness policy for day-bucketed entries.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Why an entry cannot be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefetchReason {
    /// No entry for the date
    Missing,
    /// Entry is older than the applicable window
    Stale,
    /// Caller asked to bypass the cache
    Forced,
}

/// Verdict for one requested date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessDecision {
    ServeCached,
    MustRefetch(RefetchReason),
}

impl FreshnessDecision {
    pub fn is_usable(&self) -> bool {
        matches!(self, FreshnessDecision::ServeCached)
    }
}

/// Two-tier freshness rule.
///
/// Past dates are usable for `staleness_threshold` after they were cached.
/// Today (and any later date) is only usable for `today_window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    pub staleness_threshold: Duration,
    pub today_window: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            staleness_threshold: Duration::hours(24),
            today_window: Duration::minutes(15),
        }
    }
}

impl FreshnessPolicy {
    /// Create a policy with explicit windows.
    pub fn new(staleness_threshold: Duration, today_window: Duration) -> Self {
        Self {
            staleness_threshold,
            today_window,
        }
    }

    /// Maximum age an entry for `date` may have.
    pub fn max_age_for(&self, date: NaiveDate, today: NaiveDate) -> Duration {
        if date >= today {
            self.today_window
        } else {
            self.staleness_threshold
        }
    }

    /// Decide whether an entry cached at `cached_at` may be served.
    pub fn decide(
        &self,
        date: NaiveDate,
        today: NaiveDate,
        cached_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        force_refresh: bool,
    ) -> FreshnessDecision {
        if force_refresh {
            return FreshnessDecision::MustRefetch(RefetchReason::Forced);
        }

        match cached_at {
            None => FreshnessDecision::MustRefetch(RefetchReason::Missing),
            Some(at) if now - at < self.max_age_for(date, today) => FreshnessDecision::ServeCached,
            Some(_) => FreshnessDecision::MustRefetch(RefetchReason::Stale),
        }
    }

    /// Whether an entry is within the staleness threshold, ignoring the today rule.
    pub fn is_fresh(&self, cached_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - cached_at < self.staleness_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn written_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 9, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_historical_boundary() {
        let policy = FreshnessPolicy::default();
        let today = date("2025-10-10");
        let past = date("2025-10-08");
        let t = written_at();
        let eps = Duration::seconds(1);

        let before = policy.decide(past, today, Some(t), t + Duration::hours(24) - eps, false);
        let after = policy.decide(past, today, Some(t), t + Duration::hours(24) + eps, false);

        assert_eq!(before, FreshnessDecision::ServeCached);
        assert_eq!(after, FreshnessDecision::MustRefetch(RefetchReason::Stale));
    }

    #[test]
    fn test_today_boundary() {
        let policy = FreshnessPolicy::default();
        let today = date("2025-10-09");
        let t = written_at();
        let eps = Duration::seconds(1);

        let before = policy.decide(today, today, Some(t), t + Duration::minutes(15) - eps, false);
        let after = policy.decide(today, today, Some(t), t + Duration::minutes(15) + eps, false);

        assert!(before.is_usable());
        assert_eq!(after, FreshnessDecision::MustRefetch(RefetchReason::Stale));
        // Still inside the historical threshold, but today uses the tighter window
        assert!(policy.is_fresh(t, t + Duration::minutes(15) + eps));
    }

    #[test]
    fn test_missing_entry_is_always_a_miss() {
        let policy = FreshnessPolicy::default();
        let today = date("2025-10-09");
        let now = written_at();

        for d in [date("2025-10-01"), today] {
            assert_eq!(
                policy.decide(d, today, None, now, false),
                FreshnessDecision::MustRefetch(RefetchReason::Missing)
            );
        }
    }

    #[test]
    fn test_force_refresh_bypasses_fresh_entry() {
        let policy = FreshnessPolicy::default();
        let t = written_at();

        let decision = policy.decide(date("2025-10-01"), date("2025-10-09"), Some(t), t, true);
        assert_eq!(decision, FreshnessDecision::MustRefetch(RefetchReason::Forced));
    }

    #[test]
    fn test_future_dates_use_today_window() {
        let policy = FreshnessPolicy::default();
        let today = date("2025-10-09");
        assert_eq!(policy.max_age_for(date("2025-10-10"), today), Duration::minutes(15));
        assert_eq!(policy.max_age_for(date("2025-10-08"), today), Duration::hours(24));
    }

    #[test]
    fn test_custom_windows() {
        let policy = FreshnessPolicy::new(Duration::hours(1), Duration::minutes(1));
        let today = date("2025-10-09");
        let t = written_at();

        assert!(!policy
            .decide(date("2025-10-08"), today, Some(t), t + Duration::hours(2), false)
            .is_usable());
        assert!(policy
            .decide(today, today, Some(t), t + Duration::seconds(30), false)
            .is_usable());
    }
}
