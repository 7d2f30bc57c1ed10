use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

use crate::analytics::{CategoryOverview, StatusCategory};
use crate::client::JiraClient;
use crate::error::Result;
use crate::output;
use crate::source::{count_issues, validate_project};
use crate::types::Project;

const LIST_PROJECTS_PATH: &str = "/rest/api/3/project";

#[derive(Serialize)]
struct ProjectSummary {
    #[serde(flatten)]
    project: Project,
    #[serde(skip_serializing_if = "Option::is_none")]
    analytics: Option<CategoryOverview>,
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    project_type: String,
}

#[derive(Tabled)]
struct ProjectAnalyticsRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Open")]
    open: usize,
    #[tabled(rename = "In Progress")]
    in_progress: usize,
    #[tabled(rename = "Done")]
    done: usize,
    #[tabled(rename = "Total")]
    total: usize,
}

impl From<&ProjectSummary> for ProjectRow {
    fn from(summary: &ProjectSummary) -> Self {
        Self {
            key: summary.project.key.clone(),
            name: summary.project.name.clone(),
            project_type: summary.project.project_type_key.clone().unwrap_or_default(),
        }
    }
}

impl From<&ProjectSummary> for ProjectAnalyticsRow {
    fn from(summary: &ProjectSummary) -> Self {
        let counts = summary.analytics.unwrap_or_default();
        Self {
            key: summary.project.key.clone(),
            name: summary.project.name.clone(),
            open: counts.open,
            in_progress: counts.in_progress,
            done: counts.done,
            total: counts.total,
        }
    }
}

/// JQL for one project's issues in a status category. Jira's category names
/// match [`StatusCategory::label`].
fn category_jql(key: &str, category: StatusCategory) -> String {
    format!("project = \"{key}\" AND statusCategory = \"{category}\"")
}

/// Counts per status category; a failed count is logged and left at zero.
async fn project_analytics(client: &JiraClient, key: &str) -> CategoryOverview {
    let mut counts = CategoryOverview::default();

    for (category, slot) in [
        (StatusCategory::New, &mut counts.open),
        (StatusCategory::InProgress, &mut counts.in_progress),
        (StatusCategory::Done, &mut counts.done),
    ] {
        match count_issues(client, &category_jql(key, category)).await {
            Ok(n) => *slot = n as usize,
            Err(e) => warn!(project = key, %category, "failed to count issues: {e}"),
        }
    }

    counts.total = counts.open + counts.in_progress + counts.done;
    counts
}

pub async fn list(client: &JiraClient, analytics: bool) -> Result<()> {
    let projects: Vec<Project> = client.get(LIST_PROJECTS_PATH, &[]).await?;

    let mut summaries = Vec::with_capacity(projects.len());
    for project in projects {
        let analytics = if analytics && validate_project(&project.key).is_ok() {
            Some(project_analytics(client, &project.key).await)
        } else {
            None
        };
        summaries.push(ProjectSummary { project, analytics });
    }

    if analytics {
        output::print_table(&summaries, |s| ProjectAnalyticsRow::from(s));
    } else {
        output::print_table(&summaries, |s| ProjectRow::from(s));
    }

    Ok(())
}
