//! Normalized issue records.
//!
//! Raw tracker payloads carry optional, loosely-typed fields. Everything in
//! [`crate::analytics`] works on [`Issue`], which has parsed timestamps and an
//! explicit status category.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::types::{RawIssue, RawStatus};

/// Label used for issues with no assignee.
pub const UNASSIGNED: &str = "Unassigned";

/// Jira's coarse status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    /// "new" (To Do)
    New,
    /// "indeterminate" (In Progress)
    InProgress,
    /// "done"
    Done,
    Unknown,
}

impl StatusCategory {
    pub fn from_key(key: &str) -> Self {
        match key {
            "new" => StatusCategory::New,
            "indeterminate" => StatusCategory::InProgress,
            "done" => StatusCategory::Done,
            _ => StatusCategory::Unknown,
        }
    }

    /// Best guess when the tracker omitted the category.
    pub fn infer_from_name(name: &str) -> Self {
        let lower = name.trim().to_lowercase();
        match lower.as_str() {
            "done" | "closed" | "resolved" => StatusCategory::Done,
            _ => StatusCategory::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusCategory::New => "To Do",
            StatusCategory::InProgress => "In Progress",
            StatusCategory::Done => "Done",
            StatusCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub name: String,
    pub category: StatusCategory,
}

impl From<&RawStatus> for Status {
    fn from(raw: &RawStatus) -> Self {
        let category = match &raw.status_category {
            Some(c) => StatusCategory::from_key(&c.key),
            None => StatusCategory::infer_from_name(&raw.name),
        };
        Self {
            name: raw.name.clone(),
            category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub key: String,
    pub summary: String,
    pub status: Status,
    pub issue_type: String,
    pub assignee: Option<String>,
    pub priority: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("issue {key}: invalid {field} timestamp '{value}'")]
    InvalidTimestamp {
        key: String,
        field: &'static str,
        value: String,
    },
}

impl Issue {
    pub fn from_raw(raw: &RawIssue) -> Result<Self, NormalizeError> {
        let fields = &raw.fields;
        let timestamp = |field: &'static str, value: Option<&str>| {
            value
                .and_then(parse_timestamp)
                .ok_or_else(|| NormalizeError::InvalidTimestamp {
                    key: raw.key.clone(),
                    field,
                    value: value.unwrap_or("null").to_string(),
                })
        };

        Ok(Self {
            id: raw.id.clone(),
            key: raw.key.clone(),
            summary: fields.summary.clone(),
            status: Status::from(&fields.status),
            issue_type: fields.issue_type.name.clone(),
            assignee: fields
                .assignee
                .as_ref()
                .and_then(|a| a.display_name.clone())
                .filter(|name| !name.trim().is_empty()),
            priority: fields
                .priority
                .as_ref()
                .map(|p| p.name.clone())
                .filter(|name| !name.trim().is_empty()),
            created: timestamp("created", fields.created.as_deref())?,
            updated: timestamp("updated", fields.updated.as_deref())?,
        })
    }

    /// Assignee display name, or [`UNASSIGNED`].
    pub fn effective_assignee(&self) -> &str {
        self.assignee.as_deref().unwrap_or(UNASSIGNED)
    }

    pub fn is_done(&self) -> bool {
        self.status.category == StatusCategory::Done
    }

    pub fn created_date(&self) -> NaiveDate {
        self.created.date_naive()
    }

    pub fn updated_date(&self) -> NaiveDate {
        self.updated.date_naive()
    }

    /// Date the issue reached a done status, approximated by its last update.
    pub fn resolved_date(&self) -> Option<NaiveDate> {
        self.is_done().then(|| self.updated_date())
    }
}

/// Parse RFC 3339 or Jira's `2024-01-05T10:00:00.000+0000` form.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Normalize a batch, dropping records that cannot be parsed.
pub fn normalize_issues(raw: &[RawIssue]) -> Vec<Issue> {
    raw.iter()
        .filter_map(|r| match Issue::from_raw(r) {
            Ok(issue) => Some(issue),
            Err(e) => {
                warn!("skipping issue: {e}");
                None
            }
        })
        .collect()
}
