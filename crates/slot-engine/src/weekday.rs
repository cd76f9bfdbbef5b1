//! Weekday numbering.
//!
//! The platform numbers weekdays 1 (Monday) through 7 (Sunday). Calendar
//! libraries commonly count from Sunday = 0; [`normalize_day_of_week`] bridges
//! the two so every comparison in the engine uses the platform convention.

use chrono::{Datelike, NaiveDate};

/// Remap a Sunday-based weekday (Sunday = 0 … Saturday = 6) to the platform's
/// Monday-based numbering (Monday = 1 … Sunday = 7).
///
/// Monday through Saturday pass through unchanged; only Sunday moves. A value
/// too large for a day number maps to 0, which no weekday range contains.
pub(crate) fn normalize_day_of_week(host_weekday: u32) -> u8 {
    match host_weekday {
        0 => 7,
        day => u8::try_from(day).unwrap_or(0),
    }
}

/// Platform weekday (1 = Monday … 7 = Sunday) of a calendar date.
pub(crate) fn weekday_of(date: NaiveDate) -> u8 {
    normalize_day_of_week(date.weekday().num_days_from_sunday())
}

/// Inclusive membership of `day` in `[start, end]` over the 1–7 week cycle.
///
/// When `start > end` the range wraps past Sunday: Friday(5)..Tuesday(2) is
/// {Fri, Sat, Sun, Mon, Tue}. Out-of-range day numbers are not rejected, they
/// simply fail the comparison.
pub(crate) fn day_of_week_in_range(day: u8, start: u8, end: u8) -> bool {
    if start <= end {
        day >= start && day <= end
    } else {
        day >= start || day <= end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ── normalize_day_of_week ───────────────────────────────────────────

    #[test]
    fn test_sunday_becomes_seven() {
        assert_eq!(normalize_day_of_week(0), 7);
    }

    #[test]
    fn test_monday_through_saturday_unchanged() {
        for d in 1..=6 {
            assert_eq!(normalize_day_of_week(d), d as u8);
        }
    }

    #[test]
    fn test_oversized_value_does_not_wrap_to_a_weekday() {
        // 263 truncated to a byte would read as Sunday (7)
        let day = normalize_day_of_week(263);
        assert_eq!(day, 0);
        assert!(!day_of_week_in_range(day, 1, 7));
    }

    #[test]
    fn test_weekday_of_known_dates() {
        // 2025-06-09 is a Monday, 2025-06-15 a Sunday
        assert_eq!(weekday_of(NaiveDate::from_ymd_opt(2025, 6, 9).unwrap()), 1);
        assert_eq!(weekday_of(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()), 2);
        assert_eq!(weekday_of(NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()), 6);
        assert_eq!(weekday_of(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()), 7);
    }

    // ── day_of_week_in_range ────────────────────────────────────────────

    #[test]
    fn test_plain_range() {
        assert!(day_of_week_in_range(3, 1, 5));
        assert!(day_of_week_in_range(1, 1, 5));
        assert!(day_of_week_in_range(5, 1, 5));
        assert!(!day_of_week_in_range(6, 1, 5));
    }

    #[test]
    fn test_single_day_range() {
        assert!(day_of_week_in_range(4, 4, 4));
        assert!(!day_of_week_in_range(5, 4, 4));
    }

    #[test]
    fn test_wrapping_range() {
        // Fri..Tue
        assert!(day_of_week_in_range(7, 5, 2));
        assert!(day_of_week_in_range(5, 5, 2));
        assert!(day_of_week_in_range(1, 5, 2));
        assert!(day_of_week_in_range(2, 5, 2));
        assert!(!day_of_week_in_range(4, 5, 2));
        assert!(!day_of_week_in_range(3, 5, 2));
    }

    #[test]
    fn test_out_of_cycle_day_fails_plain_range() {
        assert!(!day_of_week_in_range(0, 1, 7));
        assert!(!day_of_week_in_range(9, 1, 7));
    }

    proptest! {
        #[test]
        fn prop_normalized_day_is_in_cycle(host in 0u32..7) {
            let d = normalize_day_of_week(host);
            prop_assert!((1..=7).contains(&d));
        }

        #[test]
        fn prop_wrapped_range_is_complement_of_gap(day in 1u8..=7, start in 1u8..=7, end in 1u8..=7) {
            prop_assume!(start > end);
            // [start, end] wrapping is everything except the open gap (end, start)
            let in_gap = day > end && day < start;
            prop_assert_eq!(day_of_week_in_range(day, start, end), !in_gap);
        }

        #[test]
        fn prop_full_week_range_contains_all(day in 1u8..=7) {
            prop_assert!(day_of_week_in_range(day, 1, 7));
        }
    }
}
