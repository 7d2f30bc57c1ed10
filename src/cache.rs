use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::types::RawIssue;

const CACHE_TTL_SECS: u64 = 300; // 5 minutes

/// Last fetched issues per project, keyed by `site/PROJECT`.
#[derive(Serialize, Deserialize, Default)]
pub struct Cache {
    projects: HashMap<String, CachedIssues>,
}

#[derive(Serialize, Deserialize, Clone)]
struct CachedIssues {
    fetched_at: u64,
    /// The fetch saw every issue of the project, not just the first page(s).
    #[serde(default)]
    complete: bool,
    issues: Vec<RawIssue>,
}

/// A fresh cache entry.
pub struct CachedView<'a> {
    pub issues: &'a [RawIssue],
    pub complete: bool,
}

impl Cache {
    pub fn load() -> Self {
        match Self::cache_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };

        match serde_json::from_str(&contents) {
            Ok(cache) => cache,
            Err(e) => {
                debug!("ignoring unreadable cache at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if let Some(path) = Self::cache_path() {
            self.save_to(&path);
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let contents = match serde_json::to_string(self) {
            Ok(c) => c,
            Err(_) => return,
        };

        if let Err(e) = std::fs::write(path, contents) {
            debug!("failed to write cache at {}: {e}", path.display());
        }
    }

    fn cache_path() -> Option<PathBuf> {
        Config::config_path()
            .ok()
            .map(|p| p.with_file_name("cache.json"))
    }

    pub fn key(site: &str, project: &str) -> String {
        format!("{site}/{}", project.to_uppercase())
    }

    /// Issues for `key` if fetched less than the TTL ago.
    pub fn get_issues(&self, key: &str) -> Option<CachedView<'_>> {
        self.get_issues_at(key, now_secs())
    }

    fn get_issues_at(&self, key: &str, now: u64) -> Option<CachedView<'_>> {
        let entry = self.projects.get(key)?;
        if now.saturating_sub(entry.fetched_at) > CACHE_TTL_SECS {
            debug!(key, "cache entry expired");
            return None;
        }
        Some(CachedView {
            issues: &entry.issues,
            complete: entry.complete,
        })
    }

    pub fn set_issues(&mut self, key: String, issues: Vec<RawIssue>, complete: bool) {
        self.set_issues_at(key, issues, complete, now_secs());
    }

    fn set_issues_at(&mut self, key: String, issues: Vec<RawIssue>, complete: bool, now: u64) {
        self.projects
            .retain(|_, entry| now.saturating_sub(entry.fetched_at) <= CACHE_TTL_SECS);
        self.projects.insert(
            key,
            CachedIssues {
                fetched_at: now,
                complete,
                issues,
            },
        );
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}
