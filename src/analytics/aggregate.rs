use std::collections::HashMap;
use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

use super::issue::{Issue, StatusCategory};

/// One bar or slice of a category chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSeriesPoint {
    pub name: String,
    pub value: usize,
}

/// Issue attribute a category chart groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Workflow status name
    Status,
    /// Issue type name
    Type,
    /// Assignee display name ("Unassigned" when empty)
    Assignee,
}

impl Dimension {
    pub fn key(self, issue: &Issue) -> &str {
        match self {
            Dimension::Status => &issue.status.name,
            Dimension::Type => &issue.issue_type,
            Dimension::Assignee => issue.effective_assignee(),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Dimension::Status => "Issues by Status",
            Dimension::Type => "Issues by Type",
            Dimension::Assignee => "Issues by Assignee",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Status => write!(f, "status"),
            Dimension::Type => write!(f, "type"),
            Dimension::Assignee => write!(f, "assignee"),
        }
    }
}

/// Count issues per key, largest group first.
///
/// Groups with equal counts keep the order in which their key was first seen.
pub fn aggregate_by<F>(issues: &[Issue], key: F) -> Vec<ChartSeriesPoint>
where
    F: Fn(&Issue) -> &str,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut points: Vec<ChartSeriesPoint> = Vec::new();

    for issue in issues {
        let name = key(issue);
        match index.get(name) {
            Some(&slot) => points[slot].value += 1,
            None => {
                index.insert(name, points.len());
                points.push(ChartSeriesPoint {
                    name: name.to_string(),
                    value: 1,
                });
            }
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    points.sort_by(|a, b| b.value.cmp(&a.value));
    points
}

pub fn aggregate_dimension(issues: &[Issue], dimension: Dimension) -> Vec<ChartSeriesPoint> {
    aggregate_by(issues, |issue| dimension.key(issue))
}

pub fn by_status(issues: &[Issue]) -> Vec<ChartSeriesPoint> {
    aggregate_dimension(issues, Dimension::Status)
}

pub fn by_type(issues: &[Issue]) -> Vec<ChartSeriesPoint> {
    aggregate_dimension(issues, Dimension::Type)
}

pub fn by_assignee(issues: &[Issue]) -> Vec<ChartSeriesPoint> {
    aggregate_dimension(issues, Dimension::Assignee)
}

/// Issues behind one label of a category chart, in input order.
pub fn issues_matching<'a>(issues: &'a [Issue], dimension: Dimension, label: &str) -> Vec<&'a Issue> {
    issues
        .iter()
        .filter(|issue| dimension.key(issue) == label)
        .collect()
}

/// Issue counts per status category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryOverview {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl CategoryOverview {
    /// Share of done issues, 0.0 for an empty set.
    pub fn completion(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.done as f64 / self.total as f64
        }
    }
}

pub fn category_overview(issues: &[Issue]) -> CategoryOverview {
    issues
        .iter()
        .fold(CategoryOverview::default(), |mut overview, issue| {
            overview.total += 1;
            match issue.status.category {
                StatusCategory::New => overview.open += 1,
                StatusCategory::InProgress => overview.in_progress += 1,
                StatusCategory::Done => overview.done += 1,
                StatusCategory::Unknown => {}
            }
            overview
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::{arb_issues, issue};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn point(name: &str, value: usize) -> ChartSeriesPoint {
        ChartSeriesPoint {
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn test_status_counts_descending() {
        let issues = vec![
            issue("A-1").todo().build(),
            issue("A-2").todo().build(),
            issue("A-3").done().build(),
        ];
        assert_eq!(by_status(&issues), vec![point("To Do", 2), point("Done", 1)]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let issues = vec![
            issue("A-1").kind("Story").build(),
            issue("A-2").kind("Bug").build(),
            issue("A-3").kind("Task").build(),
            issue("A-4").kind("Bug").build(),
            issue("A-5").kind("Story").build(),
        ];
        assert_eq!(
            by_type(&issues),
            vec![point("Story", 2), point("Bug", 2), point("Task", 1)]
        );
    }

    #[test]
    fn test_unassigned_bucket() {
        let issues = vec![issue("A-1").build()];
        assert_eq!(by_assignee(&issues), vec![point("Unassigned", 1)]);
    }

    #[test]
    fn test_empty_input_gives_empty_series() {
        assert!(by_status(&[]).is_empty());
        assert!(by_type(&[]).is_empty());
        assert!(by_assignee(&[]).is_empty());
    }

    #[test]
    fn test_issues_matching_each_dimension() {
        let issues = vec![
            issue("A-1").done().kind("Bug").assignee("Jane Smith").build(),
            issue("A-2").todo().kind("Bug").build(),
            issue("A-3").done().kind("Task").build(),
        ];
        let keys = |found: Vec<&Issue>| found.iter().map(|i| i.key.clone()).collect::<Vec<_>>();

        assert_eq!(keys(issues_matching(&issues, Dimension::Status, "Done")), vec!["A-1", "A-3"]);
        assert_eq!(keys(issues_matching(&issues, Dimension::Type, "Bug")), vec!["A-1", "A-2"]);
        assert_eq!(
            keys(issues_matching(&issues, Dimension::Assignee, "Unassigned")),
            vec!["A-2", "A-3"]
        );
        assert!(issues_matching(&issues, Dimension::Status, "Blocked").is_empty());
    }

    #[test]
    fn test_category_overview() {
        let issues = vec![
            issue("A-1").todo().build(),
            issue("A-2").in_progress().build(),
            issue("A-3").status("In Review", StatusCategory::InProgress).build(),
            issue("A-4").done().build(),
            issue("A-5").status("Parked", StatusCategory::Unknown).build(),
        ];
        let overview = category_overview(&issues);
        assert_eq!(
            overview,
            CategoryOverview {
                total: 5,
                open: 1,
                in_progress: 2,
                done: 1,
            }
        );
        assert!((overview.completion() - 0.2).abs() < f64::EPSILON);
        assert_eq!(category_overview(&[]).completion(), 0.0);
    }

    proptest! {
        #[test]
        fn counts_sum_to_input_size(issues in arb_issues()) {
            for dimension in [Dimension::Status, Dimension::Type, Dimension::Assignee] {
                let series = aggregate_dimension(&issues, dimension);
                let total: usize = series.iter().map(|p| p.value).sum();
                prop_assert_eq!(total, issues.len());
                prop_assert!(series.windows(2).all(|w| w[0].value >= w[1].value));
            }
        }
    }
}
