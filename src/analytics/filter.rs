use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use super::issue::Issue;

/// Inclusive day range compared against an issue's last update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_bounded(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// `from` counts from the start of its day, `to` through the start of
    /// the following day.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        if let Some(from) = self.from {
            if at < start_of_day(from) {
                return false;
            }
        }
        if let Some(next) = self.to.and_then(|to| to.succ_opt()) {
            if at > start_of_day(next) {
                return false;
            }
        }
        true
    }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Which issues to keep. `None` leaves a dimension unrestricted.
///
/// An empty set behaves like `None`; callers are expected to pass `None`
/// rather than build one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub statuses: Option<BTreeSet<String>>,
    pub types: Option<BTreeSet<String>>,
    /// Effective assignee names, so "Unassigned" selects issues without one.
    pub assignees: Option<BTreeSet<String>>,
    /// Issues without a priority are never removed by this restriction.
    pub priorities: Option<BTreeSet<String>>,
    pub date_range: Option<DateRange>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statuses<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statuses = allowed(values);
        self
    }

    pub fn types<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = allowed(values);
        self
    }

    pub fn assignees<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assignees = allowed(values);
        self
    }

    pub fn priorities<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.priorities = allowed(values);
        self
    }

    pub fn date_range(mut self, range: DateRange) -> Self {
        self.date_range = range.is_bounded().then_some(range);
        self
    }

    /// True when no dimension is restricted.
    pub fn is_unrestricted(&self) -> bool {
        is_open(&self.statuses)
            && is_open(&self.types)
            && is_open(&self.assignees)
            && is_open(&self.priorities)
            && !self.date_range.is_some_and(|r| r.is_bounded())
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        if !permits(&self.statuses, &issue.status.name) {
            return false;
        }
        if !permits(&self.types, &issue.issue_type) {
            return false;
        }
        if !permits(&self.assignees, issue.effective_assignee()) {
            return false;
        }
        if let Some(priority) = &issue.priority {
            if !permits(&self.priorities, priority) {
                return false;
            }
        }
        match &self.date_range {
            Some(range) if range.is_bounded() => range.contains(issue.updated),
            _ => true,
        }
    }
}

/// Collect CLI values into an allowed set; no values means no restriction.
fn allowed<I, S>(values: I) -> Option<BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let set: BTreeSet<String> = values.into_iter().map(Into::into).collect();
    (!set.is_empty()).then_some(set)
}

fn is_open(set: &Option<BTreeSet<String>>) -> bool {
    !matches!(set, Some(s) if !s.is_empty())
}

fn permits(set: &Option<BTreeSet<String>>, value: &str) -> bool {
    match set {
        Some(allowed) if !allowed.is_empty() => allowed.contains(value),
        _ => true,
    }
}

/// Keep the issues matching `criteria`, in their original order.
pub fn filter_issues(issues: &[Issue], criteria: &FilterCriteria) -> Vec<Issue> {
    if issues.is_empty() {
        return Vec::new();
    }

    issues
        .iter()
        .filter(|issue| criteria.matches(issue))
        .cloned()
        .collect()
}
