use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::analytics::{DateRange, Dimension, FilterCriteria};

#[derive(Parser)]
#[command(name = "jira-pulse")]
#[command(about = "Project analytics for Jira in the terminal", version)]
#[command(after_help = "EXAMPLES:
    jira-pulse projects --analytics        Projects with open/in progress/done counts
    jira-pulse summary PROJ                Status, type and assignee breakdown
    jira-pulse burndown PROJ --end 2024-06-30
    jira-pulse drilldown status \"In Review\" PROJ
    jira-pulse timeline --input issues.json")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Show detailed error information and info-level logs
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Ignore cached issues and fetch from Jira
    #[arg(long, global = true)]
    pub refresh: bool,

    /// Read issues from a JSON file instead of Jira
    #[arg(long, global = true, value_name = "FILE")]
    pub input: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize configuration file interactively
    #[command(after_help = "EXAMPLES:
    jira-pulse init")]
    Init,
    /// Check that the configured credentials are accepted
    Auth,
    /// List projects
    #[command(after_help = "EXAMPLES:
    jira-pulse projects
    jira-pulse projects --analytics --json")]
    Projects {
        /// Also count issues per status category
        #[arg(long)]
        analytics: bool,
    },
    /// List issues matching the filters
    #[command(after_help = "EXAMPLES:
    jira-pulse issues PROJ --status \"In Progress\" --assignee Unassigned
    jira-pulse issues PROJ --priority High --from 2024-01-01")]
    Issues(AnalyticsArgs),
    /// Status category overview plus status, type and assignee charts
    Summary(AnalyticsArgs),
    /// One distribution chart
    #[command(after_help = "EXAMPLES:
    jira-pulse chart status PROJ
    jira-pulse chart assignee PROJ --type Bug")]
    Chart {
        /// Attribute to group by
        #[arg(value_enum)]
        dimension: Dimension,
        #[command(flatten)]
        args: AnalyticsArgs,
    },
    /// Issues created and resolved per day
    Timeline(AnalyticsArgs),
    /// Remaining issues per day against an ideal linear burndown
    #[command(after_help = "EXAMPLES:
    jira-pulse burndown PROJ
    jira-pulse burndown PROJ --start 2024-03-01 --end 2024-03-14 --type Story")]
    Burndown(BurndownArgs),
    /// Values available to the filter flags
    Filters(ProjectArgs),
    /// Issues behind one label of a chart
    #[command(after_help = "EXAMPLES:
    jira-pulse drilldown status Done PROJ
    jira-pulse drilldown assignee Unassigned PROJ")]
    Drilldown {
        /// Attribute the label belongs to
        #[arg(value_enum)]
        dimension: Dimension,
        /// Status, type or assignee name as shown in the chart
        label: String,
        #[command(flatten)]
        args: AnalyticsArgs,
    },
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    jira-pulse completions bash > ~/.bash_completion.d/jira-pulse
    jira-pulse completions zsh > ~/.zfunc/_jira-pulse")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args, Clone, Debug)]
pub struct ProjectArgs {
    /// Project key or id (uses default_project if omitted)
    pub project: Option<String>,

    /// Maximum number of issues to fetch (default: 250, max: 1000)
    #[arg(long, short, default_value = "250")]
    pub limit: u32,

    /// Fetch all issues (may be slow for large projects)
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// Keep issues in this status (repeatable)
    #[arg(long = "status", value_name = "NAME")]
    pub statuses: Vec<String>,

    /// Keep issues of this type (repeatable)
    #[arg(long = "type", value_name = "NAME")]
    pub types: Vec<String>,

    /// Keep issues assigned to this person, or "Unassigned" (repeatable)
    #[arg(long = "assignee", value_name = "NAME")]
    pub assignees: Vec<String>,

    /// Keep issues with this priority; issues without one are kept (repeatable)
    #[arg(long = "priority", value_name = "NAME")]
    pub priorities: Vec<String>,

    /// Keep issues updated on or after this day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Keep issues updated on or before this day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,
}

impl FilterArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new()
            .statuses(self.statuses.iter().cloned())
            .types(self.types.iter().cloned())
            .assignees(self.assignees.iter().cloned())
            .priorities(self.priorities.iter().cloned())
            .date_range(DateRange::new(self.from, self.to))
    }
}

#[derive(Args, Clone, Debug)]
pub struct AnalyticsArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    #[command(flatten)]
    pub filters: FilterArgs,
}

#[derive(Args, Clone, Debug)]
pub struct BurndownArgs {
    #[command(flatten)]
    pub analytics: AnalyticsArgs,

    /// First day of the window (default: earliest issue creation)
    #[arg(long, value_name = "DATE")]
    pub start: Option<NaiveDate>,

    /// Last day of the window (default: 14 days from today)
    #[arg(long, value_name = "DATE")]
    pub end: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_filter_flags_build_criteria() {
        let cli = Cli::parse_from([
            "jira-pulse", "issues", "PROJ", "--status", "Done", "--status", "In Review",
            "--assignee", "Unassigned", "--from", "2024-01-01",
        ]);
        let Commands::Issues(args) = cli.command else {
            panic!("expected issues command");
        };
        assert_eq!(args.project.project.as_deref(), Some("PROJ"));

        let criteria = args.filters.criteria();
        let statuses: Vec<&str> = criteria.statuses.iter().flatten().map(String::as_str).collect();
        assert_eq!(statuses, vec!["Done", "In Review"]);
        assert!(criteria.types.is_none());
        assert!(criteria.assignees.is_some());
        assert_eq!(
            criteria.date_range,
            Some(DateRange::new(NaiveDate::from_ymd_opt(2024, 1, 1), None))
        );
    }

    #[test]
    fn test_drilldown_positionals() {
        let cli = Cli::parse_from(["jira-pulse", "drilldown", "assignee", "Jane Smith", "PROJ", "--json"]);
        assert!(cli.json);
        let Commands::Drilldown { dimension, label, args } = cli.command else {
            panic!("expected drilldown command");
        };
        assert_eq!(dimension, Dimension::Assignee);
        assert_eq!(label, "Jane Smith");
        assert_eq!(args.project.project.as_deref(), Some("PROJ"));
    }

    #[test]
    fn test_rejects_malformed_date() {
        assert!(Cli::try_parse_from(["jira-pulse", "burndown", "PROJ", "--end", "next friday"]).is_err());
    }
}
