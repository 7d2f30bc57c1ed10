//! Issue analytics pipeline.
//!
//! Everything here is a pure function over an in-memory issue collection:
//!
//! - [`issue`] normalizes raw tracker records
//! - [`filter`] narrows a collection by status, type, assignee, priority and
//!   update date
//! - [`aggregate`] counts issues per status / type / assignee and per status
//!   category, and answers drill-down lookups
//! - [`timeline`] buckets created and resolved issues per day
//! - [`burndown`] projects remaining work against an ideal linear line
//! - [`options`] lists the distinct values available to the filters
//!
//! "Resolved" always means: status category is done, resolved on the day of
//! the last update. Day boundaries are UTC.

pub mod aggregate;
pub mod burndown;
pub mod filter;
pub mod issue;
pub mod options;
pub mod timeline;

pub use aggregate::{
    aggregate_dimension, by_assignee, by_status, by_type, category_overview, issues_matching,
    CategoryOverview, ChartSeriesPoint, Dimension,
};
pub use burndown::compute_burndown;
pub use filter::{filter_issues, DateRange, FilterCriteria};
pub use issue::{normalize_issues, Issue, StatusCategory};
pub use options::available_filter_options;
pub use timeline::{aggregate_timeline, TimelinePoint};
