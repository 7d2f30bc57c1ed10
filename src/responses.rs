//! Shared Jira REST response types used across commands.

use serde::{Deserialize, Serialize};

use crate::types::RawIssue;

/// One page of `GET /rest/api/3/search/jql`.
#[derive(Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub issues: Vec<RawIssue>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
    #[serde(rename = "isLast")]
    pub is_last: Option<bool>,
}

impl SearchPage {
    /// Token for the following page, if there is one.
    pub fn next(&self) -> Option<&str> {
        if self.is_last == Some(true) {
            return None;
        }
        self.next_page_token.as_deref()
    }
}

/// Body of `POST /rest/api/3/search/approximate-count`.
#[derive(Serialize)]
pub struct CountRequest<'a> {
    pub jql: &'a str,
}

#[derive(Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Issue files given with `--input`: a bare array or a saved search page.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum IssueFile {
    Issues(Vec<RawIssue>),
    Page { issues: Vec<RawIssue> },
}

impl IssueFile {
    pub fn into_issues(self) -> Vec<RawIssue> {
        match self {
            IssueFile::Issues(issues) | IssueFile::Page { issues } => issues,
        }
    }
}
