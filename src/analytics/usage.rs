//! Seven-day AI usage series for the admin dashboard.

use crate::models::parse_timestamp;
use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Number of calendar days in the usage chart, today included.
pub const WINDOW_DAYS: u64 = 7;

/// Requests made on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    /// Abbreviated weekday ("Mon", "Tue", ...).
    pub name: String,
    pub requests: usize,
}

/// First instant included in the window ending on `today`.
pub fn window_start(today: NaiveDate) -> NaiveDateTime {
    let first_day = today
        .checked_sub_days(Days::new(WINDOW_DAYS - 1))
        .unwrap_or(today);
    first_day.and_hms_opt(0, 0, 0).unwrap_or_default()
}

/// Bucket usage timestamps into the seven days ending on `today`.
///
/// The result always has one entry per day, oldest first. Timestamps that
/// cannot be parsed or fall outside the window are ignored.
pub fn weekly_usage<I, S>(timestamps: I, today: NaiveDate) -> Vec<DayBucket>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let first_day = window_start(today).date();
    let mut counts = [0usize; WINDOW_DAYS as usize];

    for raw in timestamps {
        let Some(ts) = parse_timestamp(raw.as_ref()) else {
            continue;
        };
        let offset = (ts.date() - first_day).num_days();
        if (0..WINDOW_DAYS as i64).contains(&offset) {
            counts[offset as usize] += 1;
        }
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, &requests)| {
            let day = first_day + Days::new(i as u64);
            DayBucket {
                name: day.format("%a").to_string(),
                requests,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_start_is_midnight_six_days_back() {
        let start = window_start(date(2026, 10, 16));
        assert_eq!(start.to_string(), "2026-10-10 00:00:00");
    }

    #[test]
    fn test_empty_series_has_seven_labelled_days() {
        // 2026-10-16 is a Friday
        let series = weekly_usage(Vec::<String>::new(), date(2026, 10, 16));
        let names: Vec<&str> = series.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"]);
        assert!(series.iter().all(|b| b.requests == 0));
    }

    #[test]
    fn test_counts_land_on_their_day() {
        let stamps = vec![
            "2026-10-10T00:00:00.000000", // first day, midnight
            "2026-10-16T23:59:59.999999", // today
            "2026-10-16T08:00:00",
            "2026-10-13T12:00:00.5",
            "2026-10-09T23:59:59.999999", // before window
            "2026-10-17T00:00:01.000000", // after window
            "not a timestamp",
        ];

        let series = weekly_usage(stamps, date(2026, 10, 16));
        let counts: Vec<usize> = series.iter().map(|b| b.requests).collect();
        assert_eq!(counts, vec![1, 0, 0, 1, 0, 0, 2]);
    }

    #[test]
    fn test_fractional_timestamp_with_space_separator() {
        let series = weekly_usage(vec!["2026-10-13 12:00:00.25"], date(2026, 10, 16));
        assert_eq!(series[3].requests, 1);
        assert_eq!(series[3].name, "Tue");
    }
}
