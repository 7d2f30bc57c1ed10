use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PulseError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Jira rejected the credentials (status {status}). Check JIRA_EMAIL and JIRA_API_TOKEN")]
    Unauthorized { status: u16 },

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config file at {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error(
        "Missing Jira credentials ({0}). Set JIRA_SITE_URL, JIRA_EMAIL and JIRA_API_TOKEN or run 'jira-pulse init'"
    )]
    MissingCredentials(&'static str),

    #[error("Invalid site URL {url}: {source}")]
    InvalidSiteUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Project not specified and no default_project in config")]
    NoProject,

    #[error("Invalid project key or id: {0}")]
    InvalidProject(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Failed to parse issue file {path}: {source}")]
    InputParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, PulseError>;
