use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PulseError, Result};

const SITE_URL_ENV: &str = "JIRA_SITE_URL";
const EMAIL_ENV: &str = "JIRA_EMAIL";
const API_TOKEN_ENV: &str = "JIRA_API_TOKEN";

#[derive(Deserialize, Serialize, Default, Debug, PartialEq, Eq)]
pub struct Config {
    pub site_url: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
    pub default_project: Option<String>,
}

/// Everything needed to talk to a Jira site.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub site_url: String,
    pub email: String,
    pub api_token: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(config_path).map_err(|e| PulseError::ConfigRead {
                path: config_path.to_path_buf(),
                source: e,
            })?;

        toml::from_str(&contents).map_err(|e| PulseError::ConfigParse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    /// Config for `--input` runs, which never talk to Jira. A broken config
    /// file is logged and replaced by the defaults.
    pub fn load_offline() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_offline_from(&path),
            Err(_) => Self::default(),
        }
    }

    pub fn load_offline_from(config_path: &Path) -> Self {
        Self::load_from(config_path).unwrap_or_else(|e| {
            warn!("ignoring config: {e}");
            Self::default()
        })
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        let write_err = |e| PulseError::ConfigWrite {
            path: config_path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let contents = toml::to_string(self)?;
        std::fs::write(config_path, contents).map_err(write_err)
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "jira-pulse")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(PulseError::NoConfigDir)
    }

    /// Resolve credentials, env vars taking precedence over the config file
    pub fn credentials(&self) -> Result<Credentials> {
        self.credentials_with(|name| std::env::var(name).ok())
    }

    fn credentials_with(&self, env: impl Fn(&str) -> Option<String>) -> Result<Credentials> {
        let pick = |var: &str, file: &Option<String>, what: &'static str| {
            env(var)
                .or_else(|| file.clone())
                .filter(|v| !v.trim().is_empty())
                .ok_or(PulseError::MissingCredentials(what))
        };

        Ok(Credentials {
            site_url: pick(SITE_URL_ENV, &self.site_url, "site URL")?,
            email: pick(EMAIL_ENV, &self.email, "email")?,
            api_token: pick(API_TOKEN_ENV, &self.api_token, "API token")?,
        })
    }

    /// Get project, preferring explicit argument over default
    pub fn resolve_project(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .map(String::from)
            .or_else(|| self.default_project.clone())
    }
}
