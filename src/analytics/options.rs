use std::collections::BTreeSet;

use serde::Serialize;

use super::issue::Issue;

/// Distinct values offered by each filter, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub statuses: Vec<String>,
    pub types: Vec<String>,
    pub assignees: Vec<String>,
    pub priorities: Vec<String>,
}

/// Derive filter values from the unfiltered issue set, so the choices don't
/// shrink as filters are applied.
pub fn available_filter_options(issues: &[Issue]) -> FilterOptions {
    let mut statuses = BTreeSet::new();
    let mut types = BTreeSet::new();
    let mut assignees = BTreeSet::new();
    let mut priorities = BTreeSet::new();

    for issue in issues {
        statuses.insert(issue.status.name.as_str());
        types.insert(issue.issue_type.as_str());
        assignees.insert(issue.effective_assignee());
        if let Some(priority) = &issue.priority {
            priorities.insert(priority.as_str());
        }
    }

    fn owned(set: BTreeSet<&str>) -> Vec<String> {
        set.into_iter().map(String::from).collect()
    }

    FilterOptions {
        statuses: owned(statuses),
        types: owned(types),
        assignees: owned(assignees),
        priorities: owned(priorities),
    }
}
