//! Admin dashboard analytics.
//!
//! Turns raw rows from the store into the counters and chart series the
//! admin dashboard renders.

pub mod tags;
pub mod usage;

pub use tags::{normalize_tag, parse_tags, tag_histogram, TagCount, TOP_TAGS};
pub use usage::{weekly_usage, window_start, DayBucket, WINDOW_DAYS};

use chrono::NaiveDate;
use serde::Serialize;

/// Headline counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_blogs: usize,
    pub total_users: usize,
    pub ai_requests: usize,
}

/// Everything the admin stats endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub chart_data: Vec<DayBucket>,
    pub category_data: Vec<TagCount>,
}

impl Dashboard {
    /// Build the dashboard from counters, usage timestamps inside the window
    /// and every blog's raw tag column.
    pub fn build<U, T>(stats: DashboardStats, usage: U, tag_rows: T, today: NaiveDate) -> Self
    where
        U: IntoIterator,
        U::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        Self {
            stats,
            chart_data: weekly_usage(usage, today),
            category_data: tag_histogram(tag_rows, TOP_TAGS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_dashboard() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let stats = DashboardStats {
            total_blogs: 2,
            total_users: 1,
            ai_requests: 3,
        };

        let dashboard = Dashboard::build(
            stats,
            vec!["2026-10-16T09:00:00", "2026-10-15T09:00:00"],
            vec![r#"["AI Generated"]"#, "ai generated, tech"],
            today,
        );

        assert_eq!(dashboard.stats.ai_requests, 3);
        assert_eq!(dashboard.chart_data.len(), 7);
        assert_eq!(dashboard.chart_data[6].requests, 1);
        assert_eq!(dashboard.chart_data[5].requests, 1);
        assert_eq!(dashboard.category_data[0].name, "Ai Generated");
        assert_eq!(dashboard.category_data[0].value, 2);
        assert_eq!(dashboard.category_data[1].name, "Tech");
    }
}
