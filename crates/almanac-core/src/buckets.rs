//! Calendar bucketing shared by every storage backend.
//!
//! Each helper turns a reference date into the half-open `[lo, hi)` UTC range
//! of its calendar day, ISO week, or month. The memory backend filters with
//! these bounds client-side and the SQLite backend binds them into its query
//! predicate, so both answer bucket queries with one implementation of the
//! calendar semantics — ISO week numbering included.
//!
//! The helpers are total: at the edges of chrono's representable range the
//! bounds saturate instead of panicking, so a pathological query date yields
//! an empty (or clipped) bucket rather than a crash.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};

/// `[lo, hi)` covering the calendar day (UTC) containing `date`.
pub fn day_bounds(date: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let day = date.date_naive();
    (midnight(day), midnights_later(day, 1))
}

/// `[lo, hi)` covering the ISO week (Monday-based) containing `date`.
///
/// ISO weeks straddle calendar years: Jan 1 can belong to the last week of
/// the previous ISO year and late December to week 1 of the next. The week
/// containing a date always starts on the Monday on or before it, which is
/// exactly the ISO week's Monday.
pub fn week_bounds(date: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let day = date.date_naive();
    let monday = day
        .checked_sub_days(Days::new(u64::from(day.weekday().num_days_from_monday())))
        .unwrap_or(NaiveDate::MIN);
    (midnight(monday), midnights_later(monday, 7))
}

/// `[lo, hi)` covering the calendar month (UTC) containing `date`.
pub fn month_bounds(date: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let day = date.date_naive();
    let first = day.with_day(1).expect("every month has a day 1");
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        first.with_month(first.month() + 1)
    };
    let hi = next.map(midnight).unwrap_or(DateTime::<Utc>::MAX_UTC);
    (midnight(first), hi)
}

fn midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

fn midnights_later(day: NaiveDate, days: u64) -> DateTime<Utc> {
    day.checked_add_days(Days::new(days))
        .map(midnight)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    #[test]
    fn day_bounds_are_midnight_to_midnight() {
        let (lo, hi) = day_bounds(at(2026, 3, 10, 15));
        assert_eq!(lo, at(2026, 3, 10, 0));
        assert_eq!(hi, at(2026, 3, 11, 0));
    }

    #[test]
    fn week_bounds_start_on_monday() {
        // 2026-03-11 is a Wednesday; its ISO week runs Mon 09 .. Mon 16.
        let (lo, hi) = week_bounds(at(2026, 3, 11, 12));
        assert_eq!(lo, at(2026, 3, 9, 0));
        assert_eq!(hi, at(2026, 3, 16, 0));
    }

    #[test]
    fn week_bounds_cross_the_year_boundary() {
        // 2021-01-01 belongs to ISO week 2020-W53 (Mon 2020-12-28).
        let (lo, hi) = week_bounds(at(2021, 1, 1, 10));
        assert_eq!(lo, at(2020, 12, 28, 0));
        assert_eq!(hi, at(2021, 1, 4, 0));

        // 2019-12-30 already belongs to ISO week 2020-W01.
        let (lo, hi) = week_bounds(at(2019, 12, 30, 10));
        assert_eq!(lo, at(2019, 12, 30, 0));
        assert_eq!(hi, at(2020, 1, 6, 0));
    }

    #[test]
    fn month_bounds_handle_december() {
        let (lo, hi) = month_bounds(at(2026, 12, 25, 9));
        assert_eq!(lo, at(2026, 12, 1, 0));
        assert_eq!(hi, at(2027, 1, 1, 0));
    }

    #[test]
    fn bounds_saturate_at_the_date_extremes() {
        for date in [DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC] {
            for (lo, hi) in [day_bounds(date), week_bounds(date), month_bounds(date)] {
                assert!(lo <= hi);
            }
        }
        let (_, hi) = day_bounds(DateTime::<Utc>::MAX_UTC);
        assert_eq!(hi, DateTime::<Utc>::MAX_UTC);
    }
}
