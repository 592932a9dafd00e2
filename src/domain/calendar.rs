// Calendar arithmetic for day/week/month periods in a local timezone
use super::timewindow::{Direction, SelectorMode, TimeRange};
use chrono::{DateTime, Datelike, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};

const LAST_MS_OF_DAY: i64 = 86_399_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarPeriod {
    Day,
    Week,
    Month,
}

impl SelectorMode {
    pub fn calendar_period(&self) -> Option<CalendarPeriod> {
        match self {
            SelectorMode::Day => Some(CalendarPeriod::Day),
            SelectorMode::Week => Some(CalendarPeriod::Week),
            SelectorMode::Month => Some(CalendarPeriod::Month),
            SelectorMode::Custom => None,
        }
    }
}

/// Range of the calendar period containing `reference`, from local midnight
/// of the first day to 23:59:59.999 of the last day.
pub fn calculate_range<Tz: TimeZone>(period: CalendarPeriod, reference: &DateTime<Tz>) -> TimeRange {
    let tz = reference.timezone();
    let date = reference.date_naive();

    let (first, last) = match period {
        CalendarPeriod::Day => (date, date),
        CalendarPeriod::Week => {
            // 0 = Sunday .. 6 = Saturday; weeks start on Monday
            let dow = date.weekday().num_days_from_sunday() as i64;
            let diff_to_monday = if dow == 0 { -6 } else { 1 - dow };
            let monday = date + TimeDelta::days(diff_to_monday);
            (monday, monday + TimeDelta::days(6))
        }
        CalendarPeriod::Month => {
            let first = date - TimeDelta::days(date.day0() as i64);
            // day 0 of next month
            let last = first + Months::new(1) - TimeDelta::days(1);
            (first, last)
        }
    };

    TimeRange::new(
        start_of_day(&tz, first).timestamp_millis(),
        end_of_day(&tz, last).timestamp_millis(),
    )
}

/// Move the reference one period forward or back. Month steps clamp to the
/// last day of the target month (Jan 31 + 1 month = Feb 28/29).
pub fn shift_reference<Tz: TimeZone>(
    period: CalendarPeriod,
    reference: &DateTime<Tz>,
    direction: Direction,
) -> DateTime<Tz> {
    let local = reference.naive_local();
    let shifted = match (period, direction) {
        (CalendarPeriod::Day, Direction::Next) => local + TimeDelta::days(1),
        (CalendarPeriod::Day, Direction::Previous) => local - TimeDelta::days(1),
        (CalendarPeriod::Week, Direction::Next) => local + TimeDelta::days(7),
        (CalendarPeriod::Week, Direction::Previous) => local - TimeDelta::days(7),
        (CalendarPeriod::Month, Direction::Next) => local + Months::new(1),
        (CalendarPeriod::Month, Direction::Previous) => local - Months::new(1),
    };
    local_instant(&reference.timezone(), shifted)
}

pub fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    local_instant(tz, date.and_time(NaiveTime::MIN))
}

pub fn end_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    local_instant(tz, date.and_time(NaiveTime::MIN) + TimeDelta::milliseconds(LAST_MS_OF_DAY))
}

/// Resolve a wall-clock time to an instant. Ambiguous times (DST fall-back)
/// take the earlier instant; non-existent times (DST gap) are read as UTC.
pub fn local_instant<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz.from_utc_datetime(&naive),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<FixedOffset> {
        tz().with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn ms(dt: DateTime<FixedOffset>) -> i64 {
        dt.timestamp_millis()
    }

    #[test]
    fn test_day_range() {
        let range = calculate_range(CalendarPeriod::Day, &local(2024, 3, 13, 15, 30, 0));
        assert_eq!(range.start_ms, ms(local(2024, 3, 13, 0, 0, 0)));
        assert_eq!(range.end_ms, ms(local(2024, 3, 14, 0, 0, 0)) - 1);
    }

    #[test]
    fn test_week_range_from_wednesday() {
        let range = calculate_range(CalendarPeriod::Week, &local(2024, 3, 13, 15, 30, 0));
        assert_eq!(range.start_ms, ms(local(2024, 3, 11, 0, 0, 0)));
        assert_eq!(range.end_ms, ms(local(2024, 3, 17, 23, 59, 59)) + 999);
    }

    #[test]
    fn test_week_range_from_sunday_and_monday() {
        let from_sunday = calculate_range(CalendarPeriod::Week, &local(2024, 3, 17, 23, 0, 0));
        let from_monday = calculate_range(CalendarPeriod::Week, &local(2024, 3, 11, 0, 0, 0));
        assert_eq!(from_sunday, from_monday);
        assert_eq!(from_sunday.start_ms, ms(local(2024, 3, 11, 0, 0, 0)));
    }

    #[test]
    fn test_week_range_across_month_boundary() {
        // Thursday 1 Feb 2024 -> Monday 29 Jan .. Sunday 4 Feb
        let range = calculate_range(CalendarPeriod::Week, &local(2024, 2, 1, 8, 0, 0));
        assert_eq!(range.start_ms, ms(local(2024, 1, 29, 0, 0, 0)));
        assert_eq!(range.end_ms, ms(local(2024, 2, 4, 23, 59, 59)) + 999);
    }

    #[test]
    fn test_month_range_leap_year() {
        let range = calculate_range(CalendarPeriod::Month, &local(2024, 2, 15, 12, 0, 0));
        assert_eq!(range.start_ms, ms(local(2024, 2, 1, 0, 0, 0)));
        assert_eq!(range.end_ms, ms(local(2024, 2, 29, 23, 59, 59)) + 999);

        let range = calculate_range(CalendarPeriod::Month, &local(2023, 2, 15, 12, 0, 0));
        assert_eq!(range.end_ms, ms(local(2023, 2, 28, 23, 59, 59)) + 999);
    }

    #[test]
    fn test_month_range_december() {
        let range = calculate_range(CalendarPeriod::Month, &local(2023, 12, 31, 23, 59, 0));
        assert_eq!(range.start_ms, ms(local(2023, 12, 1, 0, 0, 0)));
        assert_eq!(range.end_ms, ms(local(2023, 12, 31, 23, 59, 59)) + 999);
    }

    #[test]
    fn test_range_uses_local_calendar_day() {
        // 23:30 UTC on the 13th is already the 14th at +02:00
        let utc = Utc.with_ymd_and_hms(2024, 3, 13, 23, 30, 0).unwrap();
        let range = calculate_range(CalendarPeriod::Day, &utc.with_timezone(&tz()));
        assert_eq!(range.start_ms, ms(local(2024, 3, 14, 0, 0, 0)));
    }

    #[test]
    fn test_shift_reference() {
        let reference = local(2024, 1, 31, 10, 0, 0);
        assert_eq!(
            shift_reference(CalendarPeriod::Day, &reference, Direction::Next),
            local(2024, 2, 1, 10, 0, 0)
        );
        assert_eq!(
            shift_reference(CalendarPeriod::Week, &reference, Direction::Previous),
            local(2024, 1, 24, 10, 0, 0)
        );
        assert_eq!(
            shift_reference(CalendarPeriod::Month, &reference, Direction::Next),
            local(2024, 2, 29, 10, 0, 0)
        );
        assert_eq!(
            shift_reference(CalendarPeriod::Month, &reference, Direction::Previous),
            local(2023, 12, 31, 10, 0, 0)
        );
    }

    #[test]
    fn test_calendar_period_of_mode() {
        assert_eq!(SelectorMode::Week.calendar_period(), Some(CalendarPeriod::Week));
        assert_eq!(SelectorMode::Custom.calendar_period(), None);
    }
}
