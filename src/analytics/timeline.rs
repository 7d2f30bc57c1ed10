use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use super::issue::Issue;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub created: usize,
    pub resolved: usize,
}

/// Created and resolved counts per day, from the earliest creation through
/// today (UTC).
pub fn aggregate_timeline(issues: &[Issue]) -> Vec<TimelinePoint> {
    aggregate_timeline_until(issues, Utc::now().date_naive())
}

/// Every day in the span gets a point, including days with no activity.
/// Activity after `today` is ignored.
pub fn aggregate_timeline_until(issues: &[Issue], today: NaiveDate) -> Vec<TimelinePoint> {
    let Some(first) = issues.iter().map(Issue::created_date).min() else {
        return Vec::new();
    };

    let mut days: BTreeMap<NaiveDate, TimelinePoint> = first
        .iter_days()
        .take_while(|day| *day <= today)
        .map(|date| {
            (
                date,
                TimelinePoint {
                    date,
                    created: 0,
                    resolved: 0,
                },
            )
        })
        .collect();

    for issue in issues {
        if let Some(point) = days.get_mut(&issue.created_date()) {
            point.created += 1;
        }
        if let Some(point) = issue.resolved_date().and_then(|d| days.get_mut(&d)) {
            point.resolved += 1;
        }
    }

    days.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::{date, issue};
    use pretty_assertions::assert_eq;

    fn point(day: &str, created: usize, resolved: usize) -> TimelinePoint {
        TimelinePoint {
            date: date(day),
            created,
            resolved,
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_timeline_until(&[], date("2024-01-10")).is_empty());
        assert!(aggregate_timeline(&[]).is_empty());
    }

    #[test]
    fn test_every_day_through_today() {
        let issues = vec![
            issue("A-1").created("2024-01-02").updated("2024-01-02").build(),
            issue("A-2").created("2024-01-04").done().updated("2024-01-05").build(),
            issue("A-3").created("2024-01-02").done().updated("2024-01-05").build(),
            issue("A-4").created("2024-01-03").in_progress().updated("2024-01-05").build(),
        ];

        assert_eq!(
            aggregate_timeline_until(&issues, date("2024-01-06")),
            vec![
                point("2024-01-02", 2, 0),
                point("2024-01-03", 1, 0),
                point("2024-01-04", 1, 0),
                point("2024-01-05", 0, 2),
                point("2024-01-06", 0, 0),
            ]
        );
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let issues = vec![
            issue("A-2").created("2024-01-04").build(),
            issue("A-1").created("2024-01-01").build(),
        ];
        let series = aggregate_timeline_until(&issues, date("2024-01-04"));
        assert_eq!(series.len(), 4);
        assert_eq!(series.first().map(|p| p.date), Some(date("2024-01-01")));
        assert_eq!(series.last().map(|p| (p.date, p.created)), Some((date("2024-01-04"), 1)));
    }

    #[test]
    fn test_resolutions_after_today_are_ignored() {
        let issues = vec![issue("A-1").created("2024-01-01").done().updated("2024-02-01").build()];
        let series = aggregate_timeline_until(&issues, date("2024-01-03"));
        assert_eq!(series.iter().map(|p| p.resolved).sum::<usize>(), 0);
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_created_in_future_yields_empty_span() {
        let issues = vec![issue("A-1").created("2024-05-01").build()];
        assert!(aggregate_timeline_until(&issues, date("2024-04-30")).is_empty());
    }
}
