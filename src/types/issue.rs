use serde::{Deserialize, Serialize};

/// An issue as returned by the Jira REST `search` endpoint.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RawIssue {
    pub id: String,
    pub key: String,
    pub fields: RawIssueFields,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RawIssueFields {
    #[serde(default)]
    pub summary: String,
    pub status: RawStatus,
    #[serde(rename = "issuetype")]
    pub issue_type: RawIssueType,
    pub assignee: Option<RawAssignee>,
    pub priority: Option<RawPriority>,
    /// Missing or `null` timestamps are rejected during normalization, not here.
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RawStatus {
    pub name: String,
    #[serde(rename = "statusCategory")]
    pub status_category: Option<RawStatusCategory>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RawStatusCategory {
    pub key: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RawIssueType {
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RawAssignee {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RawPriority {
    pub name: String,
}
