//! Date helpers shared by the analytics modules.
//!
//! All day arithmetic here is whole calendar days; fractional remainders
//! truncate toward zero. Anything that cares about sub-day precision
//! compares the timestamps directly instead of going through these.

use chrono::{DateTime, Utc};

/// Whole days from `from` to `to`. Negative when `to` precedes `from`.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_days()
}

/// Whole days elapsed from `start` to `now`, floored at 1 so per-day
/// rates never divide by zero. Also covers windows that start in the
/// future.
pub fn days_elapsed_min1(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    days_between(start, now).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 21, 8, 25, 0).unwrap()
    }

    #[test]
    fn test_days_between_truncates_partial_days() {
        let now = base();
        assert_eq!(days_between(now, now + Duration::hours(47)), 1);
        assert_eq!(days_between(now, now + Duration::hours(48)), 2);
    }

    #[test]
    fn test_days_between_is_negative_backwards() {
        let now = base();
        assert_eq!(days_between(now, now - Duration::days(3)), -3);
        // 23h back truncates to zero whole days, not -1
        assert_eq!(days_between(now, now - Duration::hours(23)), 0);
    }

    #[test]
    fn test_days_elapsed_floors_at_one() {
        let now = base();
        assert_eq!(days_elapsed_min1(now, now), 1);
        assert_eq!(days_elapsed_min1(now + Duration::days(5), now), 1);
        assert_eq!(days_elapsed_min1(now - Duration::days(9), now), 9);
    }
}
