use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// Named selector for listing todos by the day their deadline falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
    Today,
    NextDay,
    CurrentWeek,
    #[default]
    All,
}

impl From<&str> for ListFilter {
    fn from(raw: &str) -> Self {
        match raw {
            "today" => Self::Today,
            "nextday" => Self::NextDay,
            "currentweek" => Self::CurrentWeek,
            _ => Self::All,
        }
    }
}

/// Half-open `[start, end)` range of deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.start <= *instant && *instant < self.end
    }
}

impl ListFilter {
    /// Window of calendar days in `now`'s time zone, or `None` for `All`.
    pub fn window<Tz: TimeZone>(self, now: &DateTime<Tz>) -> Option<TimeWindow> {
        let today = now.date_naive();
        let (first_day, days) = match self {
            Self::Today => (today, 1),
            Self::NextDay => (today + Days::new(1), 1),
            Self::CurrentWeek => {
                let since_monday = u64::from(today.weekday().num_days_from_monday());
                (today - Days::new(since_monday), 7)
            }
            Self::All => return None,
        };

        let tz = now.timezone();
        Some(TimeWindow {
            start: start_of_day(&tz, first_day),
            end: start_of_day(&tz, first_day + Days::new(days)),
        })
    }
}

// Midnight may be skipped by a DST jump; take the first local time that exists.
fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=16)
        .map(|step| midnight + Duration::minutes(15 * step))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight).with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Weekday};

    use super::*;

    fn cest(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn parses_known_filters_case_sensitively() {
        assert_eq!(ListFilter::from("today"), ListFilter::Today);
        assert_eq!(ListFilter::from("nextday"), ListFilter::NextDay);
        assert_eq!(ListFilter::from("currentweek"), ListFilter::CurrentWeek);
        assert_eq!(ListFilter::from(""), ListFilter::All);
        assert_eq!(ListFilter::from("Today"), ListFilter::All);
        assert_eq!(ListFilter::from("yesterday"), ListFilter::All);
    }

    #[test]
    fn all_has_no_window() {
        assert_eq!(ListFilter::All.window(&cest(2024, 5, 8, 10, 30)), None);
    }

    #[test]
    fn today_spans_local_calendar_day() {
        let window = ListFilter::Today.window(&cest(2024, 5, 8, 10, 30)).unwrap();

        assert_eq!(window.start, utc(2024, 5, 7, 22));
        assert_eq!(window.end, utc(2024, 5, 8, 22));
    }

    #[test]
    fn next_day_spans_tomorrow() {
        let window = ListFilter::NextDay.window(&cest(2024, 5, 8, 23, 59)).unwrap();

        assert_eq!(window.start, utc(2024, 5, 8, 22));
        assert_eq!(window.end, utc(2024, 5, 9, 22));
    }

    #[test]
    fn next_day_crosses_month_end() {
        let window = ListFilter::NextDay.window(&cest(2024, 5, 31, 8, 0)).unwrap();

        assert_eq!(window.start, utc(2024, 5, 31, 22));
        assert_eq!(window.end, utc(2024, 6, 1, 22));
    }

    #[test]
    fn current_week_starts_on_monday() {
        // 2024-05-06 is a Monday.
        for day in 6..=12 {
            let window = ListFilter::CurrentWeek
                .window(&cest(2024, 5, day, 9, 0))
                .unwrap();
            assert_eq!(window.start, utc(2024, 5, 5, 22), "day {day}");
            assert_eq!(window.end, utc(2024, 5, 12, 22), "day {day}");
        }
    }

    #[test]
    fn current_week_always_monday_and_seven_days() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let first = offset.with_ymd_and_hms(2023, 12, 20, 13, 0, 0).unwrap();

        for n in 0..60 {
            let now = first + Duration::days(n);
            let window = ListFilter::CurrentWeek.window(&now).unwrap();
            let start = window.start.with_timezone(&offset);

            assert_eq!(start.weekday(), Weekday::Mon);
            assert_eq!(start.time(), NaiveTime::MIN);
            assert_eq!(window.end - window.start, Duration::days(7));
            assert!(window.contains(&now.with_timezone(&Utc)));
        }
    }

    #[test]
    fn window_is_half_open() {
        let window = ListFilter::Today.window(&cest(2024, 5, 8, 10, 30)).unwrap();

        assert!(window.contains(&window.start));
        assert!(!window.contains(&window.end));
        assert!(window.contains(&(window.end - Duration::seconds(1))));
    }
}
