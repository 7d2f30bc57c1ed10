use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::analytics::{
    aggregate_dimension, aggregate_timeline, available_filter_options, by_assignee, by_status,
    by_type, category_overview, compute_burndown, filter_issues, issues_matching,
    CategoryOverview, ChartSeriesPoint, Dimension, FilterCriteria, Issue, StatusCategory,
    TimelinePoint,
};
use crate::cli::{AnalyticsArgs, BurndownArgs, ProjectArgs};
use crate::commands::issues::IssueRow;
use crate::error::Result;
use crate::output::{self, bar, format_day, format_long_date, print_series};
use crate::source::{IssueSource, Loaded};

const BURNDOWN_BAR_WIDTH: usize = 30;

/// Load a project and apply the filter flags.
async fn load_filtered(source: &IssueSource, args: &AnalyticsArgs) -> Result<(Loaded, Vec<Issue>)> {
    let loaded = source.load(&args.project).await?;
    let criteria = args.filters.criteria();
    let filtered = filter_issues(&loaded.issues, &criteria);
    if !criteria.is_unrestricted() {
        tracing::info!(
            total = loaded.issues.len(),
            kept = filtered.len(),
            "applied filters"
        );
    }
    Ok((loaded, filtered))
}

fn print_header(loaded: &Loaded, shown: usize) {
    let scope = if shown == loaded.issues.len() {
        format!("{shown} issues")
    } else {
        format!("{shown} of {} issues", loaded.issues.len())
    };
    println!("{} ({scope})\n", loaded.project.bold());
}

#[derive(Serialize)]
struct Summary {
    project: String,
    total_issues: usize,
    filtered_issues: usize,
    overview: CategoryOverview,
    by_status: Vec<ChartSeriesPoint>,
    by_type: Vec<ChartSeriesPoint>,
    by_assignee: Vec<ChartSeriesPoint>,
}

pub async fn summary(source: &IssueSource, args: AnalyticsArgs) -> Result<()> {
    let (loaded, issues) = load_filtered(source, &args).await?;

    let summary = Summary {
        project: loaded.project.clone(),
        total_issues: loaded.issues.len(),
        filtered_issues: issues.len(),
        overview: category_overview(&issues),
        by_status: by_status(&issues),
        by_type: by_type(&issues),
        by_assignee: by_assignee(&issues),
    };

    output::print_item(&summary, |s| {
        print_header(&loaded, s.filtered_issues);
        let o = &s.overview;
        println!(
            "{}: {}  {}: {}  {}: {}  ({:.0}% complete)\n",
            StatusCategory::New,
            o.open.to_string().bright_black(),
            StatusCategory::InProgress,
            o.in_progress.to_string().blue(),
            StatusCategory::Done,
            o.done.to_string().green(),
            o.completion() * 100.0
        );
        for (dimension, points) in [
            (Dimension::Status, &s.by_status),
            (Dimension::Type, &s.by_type),
            (Dimension::Assignee, &s.by_assignee),
        ] {
            println!("{}", dimension.title().bold());
            println!("{}\n", output::series_table(points));
        }
    });

    Ok(())
}

pub async fn chart(source: &IssueSource, dimension: Dimension, args: AnalyticsArgs) -> Result<()> {
    let (loaded, issues) = load_filtered(source, &args).await?;
    let points = aggregate_dimension(&issues, dimension);

    if !output::is_json_output() {
        print_header(&loaded, issues.len());
    }
    print_series(dimension.title(), &points);

    Ok(())
}

#[derive(Tabled)]
struct TimelineRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Created")]
    created: usize,
    #[tabled(rename = "Resolved")]
    resolved: usize,
}

impl From<&TimelinePoint> for TimelineRow {
    fn from(point: &TimelinePoint) -> Self {
        Self {
            date: format_day(point.date),
            created: point.created,
            resolved: point.resolved,
        }
    }
}

pub async fn timeline(source: &IssueSource, args: AnalyticsArgs) -> Result<()> {
    let (loaded, issues) = load_filtered(source, &args).await?;
    let points = aggregate_timeline(&issues);

    if !output::is_json_output() {
        print_header(&loaded, issues.len());
        if points.is_empty() {
            println!("{}", "No data".bright_black());
            return Ok(());
        }
    }
    output::print_table(&points, |p| TimelineRow::from(p));

    Ok(())
}

#[derive(Tabled)]
struct BurndownRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Remaining")]
    remaining: usize,
    #[tabled(rename = "Ideal")]
    ideal: usize,
    #[tabled(rename = "")]
    bar: String,
}

pub async fn burndown(source: &IssueSource, args: BurndownArgs) -> Result<()> {
    let (loaded, issues) = load_filtered(source, &args.analytics).await?;
    let burndown = compute_burndown(&issues, args.start, args.end);

    output::print_item(&burndown, |b| {
        print_header(&loaded, b.total_scope);
        println!(
            "Scope: {}  Window: {} to {}\n",
            b.total_scope,
            format_long_date(b.start),
            format_long_date(b.end)
        );
        if b.points.is_empty() {
            println!("{}", "No data".bright_black());
            return;
        }

        let rows = b.points.iter().map(|p| {
            let actual = bar(p.remaining, b.total_scope, BURNDOWN_BAR_WIDTH);
            let behind = p.remaining > p.ideal;
            BurndownRow {
                date: format_day(p.date),
                remaining: p.remaining,
                ideal: p.ideal,
                bar: if behind {
                    actual.yellow().to_string()
                } else {
                    actual.green().to_string()
                },
            }
        });
        let table = tabled::Table::new(rows)
            .with(tabled::settings::Style::rounded())
            .to_string();
        println!("{table}");
    });

    Ok(())
}

pub async fn filters(source: &IssueSource, args: ProjectArgs) -> Result<()> {
    let loaded = source.load(&args).await?;
    let options = available_filter_options(&loaded.issues);

    output::print_item(&options, |o| {
        println!("{}\n", loaded.project.bold());
        for (flag, values) in [
            ("--status", &o.statuses),
            ("--type", &o.types),
            ("--assignee", &o.assignees),
            ("--priority", &o.priorities),
        ] {
            let listed = if values.is_empty() {
                "-".bright_black().to_string()
            } else {
                values.join(", ")
            };
            println!("{:<11} {listed}", flag.cyan());
        }
    });

    Ok(())
}

/// Issues behind `label`; the label is matched against the filtered set.
pub fn drilldown_issues<'a>(
    issues: &'a [Issue],
    criteria: &FilterCriteria,
    dimension: Dimension,
    label: &str,
) -> Vec<&'a Issue> {
    issues_matching(issues, dimension, label)
        .into_iter()
        .filter(|issue| criteria.matches(issue))
        .collect()
}

pub async fn drilldown(
    source: &IssueSource,
    dimension: Dimension,
    label: String,
    args: AnalyticsArgs,
) -> Result<()> {
    let loaded = source.load(&args.project).await?;
    let matching = drilldown_issues(&loaded.issues, &args.filters.criteria(), dimension, &label);

    if matching.is_empty() && !output::is_json_output() {
        output::print_message(&format!("No issues with {dimension} '{label}' in {}", loaded.project));
        return Ok(());
    }

    if !output::is_json_output() {
        println!("{} {dimension} = {label} ({} issues)\n", loaded.project.bold(), matching.len());
    }
    output::print_table(&matching, |i| IssueRow::from(*i));

    Ok(())
}
