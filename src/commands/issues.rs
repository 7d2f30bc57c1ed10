use tabled::Tabled;

use crate::analytics::{filter_issues, Issue};
use crate::cli::AnalyticsArgs;
use crate::error::Result;
use crate::output::{self, format_datetime, status_colored, truncate};
use crate::source::IssueSource;

#[derive(Tabled)]
pub struct IssueRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Summary")]
    summary: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Type")]
    issue_type: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Issue> for IssueRow {
    fn from(issue: &Issue) -> Self {
        Self {
            key: issue.key.clone(),
            summary: truncate(&issue.summary, 50),
            status: status_colored(&issue.status.name, issue.status.category).to_string(),
            issue_type: issue.issue_type.clone(),
            priority: issue.priority.clone().unwrap_or_else(|| "-".to_string()),
            assignee: issue.effective_assignee().to_string(),
            updated: format_datetime(&issue.updated),
        }
    }
}

pub async fn list(source: &IssueSource, args: AnalyticsArgs) -> Result<()> {
    let loaded = source.load(&args.project).await?;
    let issues = filter_issues(&loaded.issues, &args.filters.criteria());

    if issues.is_empty() && !output::is_json_output() {
        output::print_message(&format!(
            "No issues in {} match the filters ({} loaded)",
            loaded.project,
            loaded.issues.len()
        ));
        return Ok(());
    }

    output::print_table(&issues, |i| IssueRow::from(i));

    Ok(())
}
