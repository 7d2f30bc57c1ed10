use chrono::{Days, NaiveDate, Utc};
use serde::Serialize;

use super::issue::Issue;

/// Window length used when no end date is given.
pub const DEFAULT_HORIZON_DAYS: u64 = 14;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BurndownPoint {
    pub date: NaiveDate,
    pub remaining: usize,
    pub ideal: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Burndown {
    pub points: Vec<BurndownPoint>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_scope: usize,
}

pub fn compute_burndown(
    issues: &[Issue],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Burndown {
    compute_burndown_at(issues, start, end, Utc::now().date_naive())
}

/// Burndown over `[start, end]` with `today` as the reference date for
/// defaults.
///
/// Scope is the number of issues given. `start` defaults to the earliest
/// creation date and `end` to [`DEFAULT_HORIZON_DAYS`] after `today`. A done
/// issue stops counting as remaining from the day of its last update onwards.
pub fn compute_burndown_at(
    issues: &[Issue],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Burndown {
    let horizon = today
        .checked_add_days(Days::new(DEFAULT_HORIZON_DAYS))
        .unwrap_or(NaiveDate::MAX);
    let end = end.unwrap_or(horizon);

    let earliest = issues.iter().map(Issue::created_date).min();
    let Some(start) = start.or(earliest) else {
        return Burndown {
            points: Vec::new(),
            start: today,
            end,
            total_scope: 0,
        };
    };

    if issues.is_empty() {
        return Burndown {
            points: Vec::new(),
            start,
            end,
            total_scope: 0,
        };
    }

    let total_scope = issues.len();
    let total_days = (end - start).num_days();

    let mut resolved: Vec<NaiveDate> = issues.iter().filter_map(Issue::resolved_date).collect();
    resolved.sort_unstable();

    let points = start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|date| {
            let done_by = resolved.partition_point(|d| *d <= date);
            BurndownPoint {
                date,
                remaining: total_scope.saturating_sub(done_by),
                ideal: ideal_remaining(total_scope, (date - start).num_days(), total_days),
            }
        })
        .collect();

    Burndown {
        points,
        start,
        end,
        total_scope,
    }
}

/// Straight line from `scope` on day 0 to zero on `total_days`.
fn ideal_remaining(scope: usize, elapsed: i64, total_days: i64) -> usize {
    if scope == 0 || total_days <= 0 {
        return 0;
    }
    let scope = scope as f64;
    let ideal = scope - scope * (elapsed as f64 / total_days as f64);
    ideal.max(0.0).round() as usize
}
