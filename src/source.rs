//! Where commands get their issues from: a `--input` file, the on-disk
//! cache, or the Jira search API.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::analytics::{normalize_issues, Issue};
use crate::cache::Cache;
use crate::cli::ProjectArgs;
use crate::client::JiraClient;
use crate::config::Config;
use crate::error::{PulseError, Result};
use crate::responses::{CountRequest, CountResponse, IssueFile, SearchPage};
use crate::types::RawIssue;

const SEARCH_PATH: &str = "/rest/api/3/search/jql";
const ISSUE_FIELDS: &str = "summary,status,issuetype,assignee,priority,created,updated";
const PAGE_SIZE: u32 = 100;
const MAX_LIMIT: u32 = 1000;

static PROJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[A-Za-z][A-Za-z0-9_]*|[0-9]+)$").unwrap());

/// Issues loaded for one command invocation.
pub struct Loaded {
    /// Project key, or the input file name.
    pub project: String,
    pub issues: Vec<Issue>,
}

pub struct IssueSource {
    config: Config,
    input: Option<PathBuf>,
    refresh: bool,
}

impl IssueSource {
    pub fn new(config: Config, input: Option<PathBuf>, refresh: bool) -> Self {
        Self {
            config,
            input,
            refresh,
        }
    }

    pub fn client(&self) -> Result<JiraClient> {
        JiraClient::from_credentials(self.config.credentials()?)
    }

    pub fn project(&self, explicit: Option<&str>) -> Result<String> {
        let project = self
            .config
            .resolve_project(explicit)
            .ok_or(PulseError::NoProject)?;
        validate_project(&project)?;
        Ok(project)
    }

    pub async fn load(&self, args: &ProjectArgs) -> Result<Loaded> {
        if let Some(path) = &self.input {
            let project = match args.project.as_deref() {
                Some(p) => p.to_string(),
                None => path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "input".to_string()),
            };
            let raw = read_issue_file(path)?;
            return Ok(Loaded {
                project,
                issues: normalize_issues(&raw),
            });
        }

        let project = self.project(args.project.as_deref())?;
        let client = self.client()?;
        let raw = self.fetch_cached(&client, &project, args).await?;
        info!(project = %project, count = raw.len(), "loaded issues");

        Ok(Loaded {
            project,
            issues: normalize_issues(&raw),
        })
    }

    async fn fetch_cached(
        &self,
        client: &JiraClient,
        project: &str,
        args: &ProjectArgs,
    ) -> Result<Vec<RawIssue>> {
        let key = Cache::key(client.site(), project);
        let limit = effective_limit(args);
        let mut cache = Cache::load();

        if !self.refresh {
            if let Some(cached) = cache.get_issues(&key) {
                if limit.is_served_by(cached.issues.len(), cached.complete) {
                    debug!(key = %key, "using cached issues");
                    return Ok(limit.apply(cached.issues));
                }
            }
        }

        let issues = search_issues(client, project, limit).await?;
        let complete = limit.saw_everything(issues.len());
        cache.set_issues(key, issues.clone(), complete);
        cache.save();
        Ok(issues)
    }
}

/// Maximum number of issues to fetch; `None` fetches everything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Limit(Option<usize>);

fn effective_limit(args: &ProjectArgs) -> Limit {
    if args.all {
        Limit(None)
    } else {
        Limit(Some(args.limit.clamp(1, MAX_LIMIT) as usize))
    }
}

impl Limit {
    /// A cached entry answers the request if it holds the whole project or
    /// at least as many issues as asked for.
    fn is_served_by(self, cached: usize, complete: bool) -> bool {
        match self.0 {
            _ if complete => true,
            Some(n) => cached >= n,
            None => false,
        }
    }

    /// A fetch that returned fewer issues than its limit saw the whole project.
    fn saw_everything(self, fetched: usize) -> bool {
        self.0.map_or(true, |n| fetched < n)
    }

    fn apply(self, issues: &[RawIssue]) -> Vec<RawIssue> {
        match self.0 {
            Some(n) => issues.iter().take(n).cloned().collect(),
            None => issues.to_vec(),
        }
    }

    /// Page size for the next request, shrunk to what the limit still allows.
    fn page_size(self, fetched: usize) -> u32 {
        match self.0 {
            Some(n) => n.saturating_sub(fetched).min(PAGE_SIZE as usize) as u32,
            None => PAGE_SIZE,
        }
    }

    fn is_reached(self, fetched: usize) -> bool {
        self.0.is_some_and(|n| fetched >= n)
    }

    fn truncate(self, mut issues: Vec<RawIssue>) -> Vec<RawIssue> {
        if let Some(n) = self.0 {
            issues.truncate(n);
        }
        issues
    }
}

pub fn validate_project(project: &str) -> Result<()> {
    if PROJECT_RE.is_match(project) {
        Ok(())
    } else {
        Err(PulseError::InvalidProject(project.to_string()))
    }
}

pub fn project_jql(project: &str) -> String {
    format!("project = \"{project}\" ORDER BY updated DESC")
}

/// Page through the search API until `limit` issues or the last page.
async fn search_issues(client: &JiraClient, project: &str, limit: Limit) -> Result<Vec<RawIssue>> {
    let jql = project_jql(project);
    let mut issues: Vec<RawIssue> = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let mut query = vec![
            ("jql", jql.clone()),
            ("fields", ISSUE_FIELDS.to_string()),
            ("maxResults", limit.page_size(issues.len()).to_string()),
        ];
        if let Some(t) = &token {
            query.push(("nextPageToken", t.clone()));
        }

        let page: SearchPage = client
            .get(SEARCH_PATH, &query)
            .await
            .map_err(|e| project_not_found(e, project))?;
        debug!(count = page.issues.len(), "fetched page");

        let next = page.next().map(str::to_string);
        let empty = page.issues.is_empty();
        issues.extend(page.issues);

        match continue_after(next, empty, issues.len(), limit) {
            Some(t) => token = Some(t),
            None => break,
        }
    }

    Ok(limit.truncate(issues))
}

/// Token for the next page, or `None` once the last page, an empty page or
/// the limit is reached.
fn continue_after(next: Option<String>, empty: bool, fetched: usize, limit: Limit) -> Option<String> {
    if empty || limit.is_reached(fetched) {
        return None;
    }
    next
}

/// Jira answers a search on an unknown project key with 400 (or 404) and a
/// message naming the project.
fn project_not_found(err: PulseError, project: &str) -> PulseError {
    match err {
        PulseError::ApiError { status: 400 | 404, ref message } if message.contains("project") => {
            PulseError::ProjectNotFound(project.to_string())
        }
        other => other,
    }
}

fn read_issue_file(path: &Path) -> Result<Vec<RawIssue>> {
    let contents = std::fs::read_to_string(path)?;
    let file: IssueFile = serde_json::from_str(&contents).map_err(|e| PulseError::InputParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(file.into_issues())
}

/// Approximate issue count for a JQL query.
pub async fn count_issues(client: &JiraClient, jql: &str) -> Result<u64> {
    let response: CountResponse = client
        .post("/rest/api/3/search/approximate-count", &CountRequest { jql })
        .await?;
    Ok(response.count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(project: Option<&str>, limit: u32, all: bool) -> ProjectArgs {
        ProjectArgs {
            project: project.map(String::from),
            limit,
            all,
        }
    }

    const ISSUES_JSON: &str = r#"[
        {"id": "1", "key": "PROJ-1", "fields": {
            "summary": "Fix login page",
            "status": {"name": "Done", "statusCategory": {"key": "done"}},
            "issuetype": {"name": "Bug"},
            "created": "2024-01-05T10:00:00.000+0000",
            "updated": "2024-01-06T10:00:00.000+0000"}},
        {"id": "2", "key": "PROJ-2", "fields": {
            "summary": "Broken timestamp",
            "status": {"name": "To Do", "statusCategory": {"key": "new"}},
            "issuetype": {"name": "Task"},
            "created": "last week",
            "updated": "2024-01-06T10:00:00.000+0000"}}
    ]"#;

    #[test]
    fn test_validate_project() {
        assert!(validate_project("PROJ").is_ok());
        assert!(validate_project("ab_2").is_ok());
        assert!(validate_project("10001").is_ok());
        assert!(matches!(
            validate_project("PROJ\" OR project = \"X"),
            Err(PulseError::InvalidProject(_))
        ));
        assert!(validate_project("").is_err());
    }

    #[test]
    fn test_project_jql() {
        assert_eq!(project_jql("PROJ"), "project = \"PROJ\" ORDER BY updated DESC");
    }

    #[test]
    fn test_effective_limit() {
        assert_eq!(effective_limit(&args(None, 25, false)), Limit(Some(25)));
        assert_eq!(effective_limit(&args(None, 5000, false)), Limit(Some(1000)));
        assert_eq!(effective_limit(&args(None, 0, false)), Limit(Some(1)));
        assert_eq!(effective_limit(&args(None, 25, true)), Limit(None));
    }

    #[test]
    fn test_cache_coverage() {
        // complete entries serve anything
        assert!(Limit(None).is_served_by(3, true));
        assert!(Limit(Some(50)).is_served_by(3, true));
        // partial entries only serve smaller limits
        assert!(Limit(Some(50)).is_served_by(100, false));
        assert!(!Limit(Some(500)).is_served_by(100, false));
        assert!(!Limit(None).is_served_by(100, false));

        assert!(Limit(Some(100)).saw_everything(40));
        assert!(!Limit(Some(100)).saw_everything(100));
        assert!(Limit(None).saw_everything(100));
    }

    #[tokio::test]
    async fn test_load_from_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprint.json");
        std::fs::write(&path, ISSUES_JSON).unwrap();

        let source = IssueSource::new(Config::default(), Some(path), false);
        let loaded = source.load(&args(None, 250, false)).await.unwrap();

        assert_eq!(loaded.project, "sprint");
        let keys: Vec<&str> = loaded.issues.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["PROJ-1"]);
    }

    #[tokio::test]
    async fn test_load_keeps_batch_when_timestamp_is_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nulls.json");
        std::fs::write(
            &path,
            r#"{"issues": [
                {"id": "1", "key": "PROJ-1", "fields": {
                    "status": {"name": "Done", "statusCategory": {"key": "done", "name": "Done"}},
                    "issuetype": {"name": "Bug", "subtask": false},
                    "assignee": {"displayName": "Jane Smith", "accountId": "5b10a2844c20165700ede21g"},
                    "created": "2024-01-05T10:00:00.000+0000",
                    "updated": "2024-01-06T10:00:00.000+0000"}},
                {"id": "2", "key": "PROJ-2", "fields": {
                    "status": {"name": "To Do", "statusCategory": {"key": "new"}},
                    "issuetype": {"name": "Task"},
                    "created": "2024-01-05T10:00:00.000+0000",
                    "updated": null}},
                {"id": "3", "key": "PROJ-3", "fields": {
                    "status": {"name": "To Do", "statusCategory": {"key": "new"}},
                    "issuetype": {"name": "Task"},
                    "updated": "2024-01-06T10:00:00.000+0000"}}
            ]}"#,
        )
        .unwrap();

        let source = IssueSource::new(Config::default(), Some(path), false);
        let loaded = source.load(&args(Some("PROJ"), 250, false)).await.unwrap();

        let keys: Vec<&str> = loaded.issues.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["PROJ-1"]);
        assert_eq!(loaded.issues[0].effective_assignee(), "Jane Smith");
    }

    #[test]
    fn test_page_size_shrinks_to_remaining_limit() {
        assert_eq!(Limit(None).page_size(0), 100);
        assert_eq!(Limit(None).page_size(900), 100);
        assert_eq!(Limit(Some(250)).page_size(0), 100);
        assert_eq!(Limit(Some(250)).page_size(200), 50);
        assert_eq!(Limit(Some(30)).page_size(0), 30);
    }

    #[test]
    fn test_paging_stops_at_last_page_empty_page_or_limit() {
        let token = || Some("t2".to_string());

        assert_eq!(continue_after(token(), false, 100, Limit(Some(250))), token());
        assert_eq!(continue_after(token(), false, 100, Limit(None)), token());
        // isLast / no token
        assert_eq!(continue_after(None, false, 100, Limit(Some(250))), None);
        // empty page with a dangling token
        assert_eq!(continue_after(token(), true, 100, Limit(None)), None);
        // limit reached
        assert_eq!(continue_after(token(), false, 250, Limit(Some(250))), None);
    }

    #[test]
    fn test_results_truncated_to_limit() {
        let issues: Vec<RawIssue> = serde_json::from_str::<IssueFile>(ISSUES_JSON)
            .unwrap()
            .into_issues();
        assert_eq!(Limit(Some(1)).truncate(issues.clone()).len(), 1);
        assert_eq!(Limit(Some(5)).truncate(issues.clone()).len(), 2);
        assert_eq!(Limit(None).truncate(issues).len(), 2);
    }

    #[test]
    fn test_unknown_project_error_mapping() {
        let api = |status, message: &str| PulseError::ApiError {
            status,
            message: message.to_string(),
        };

        assert!(matches!(
            project_not_found(api(400, "The value 'NOPE' does not exist for the field 'project'."), "NOPE"),
            PulseError::ProjectNotFound(p) if p == "NOPE"
        ));
        assert!(matches!(
            project_not_found(api(404, "No project could be found"), "NOPE"),
            PulseError::ProjectNotFound(_)
        ));
        assert!(matches!(
            project_not_found(api(400, "Unbounded JQL queries are not allowed"), "NOPE"),
            PulseError::ApiError { status: 400, .. }
        ));
        assert!(matches!(
            project_not_found(api(500, "project service down"), "NOPE"),
            PulseError::ApiError { status: 500, .. }
        ));
        assert!(matches!(
            project_not_found(PulseError::Unauthorized { status: 401 }, "NOPE"),
            PulseError::Unauthorized { .. }
        ));
    }

    #[tokio::test]
    async fn test_load_rejects_bad_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"nope\": true}").unwrap();

        let source = IssueSource::new(Config::default(), Some(path.clone()), false);
        match source.load(&args(Some("PROJ"), 250, false)).await {
            Err(PulseError::InputParse { path: p, .. }) => assert_eq!(p, path),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected parse error"),
        }
    }

    #[test]
    fn test_project_requires_default_or_argument() {
        let source = IssueSource::new(Config::default(), None, false);
        assert!(matches!(source.project(None), Err(PulseError::NoProject)));
        assert_eq!(source.project(Some("OPS")).unwrap(), "OPS");
    }
}
