use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Local, NaiveDate, Utc};
use colored::{ColoredString, Colorize};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::analytics::{ChartSeriesPoint, StatusCategory};

/// Global output format setting
static OUTPUT_JSON: AtomicBool = AtomicBool::new(false);

/// Widest bar drawn for the largest value of a series.
const BAR_WIDTH: usize = 40;

pub fn set_json_output(json: bool) {
    OUTPUT_JSON.store(json, Ordering::Relaxed);
}

pub fn is_json_output() -> bool {
    OUTPUT_JSON.load(Ordering::Relaxed)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Print a table or JSON depending on output mode
pub fn print_table<T, R, F>(items: &[T], to_row: F)
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if is_json_output() {
        print_json(items);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
    }
}

/// Print a single item or JSON depending on output mode
pub fn print_item<T: Serialize>(item: &T, display: impl FnOnce(&T)) {
    if is_json_output() {
        print_json(item);
    } else {
        display(item);
    }
}

/// Print a message (skipped in JSON mode, or prints simple object)
pub fn print_message(message: &str) {
    if is_json_output() {
        print_json(&serde_json::json!({ "message": message }));
    } else {
        println!("{message}");
    }
}

#[derive(Tabled)]
struct SeriesRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Count")]
    value: usize,
    #[tabled(rename = "")]
    bar: String,
}

/// Render a category series as a table with horizontal bars.
pub fn series_table(points: &[ChartSeriesPoint]) -> String {
    if points.is_empty() {
        return "No data".bright_black().to_string();
    }

    let max = points.iter().map(|p| p.value).max().unwrap_or(0);
    let rows = points.iter().map(|p| SeriesRow {
        name: p.name.clone(),
        value: p.value,
        bar: bar(p.value, max, BAR_WIDTH).cyan().to_string(),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print a titled category series, or the bare points in JSON mode.
pub fn print_series(title: &str, points: &[ChartSeriesPoint]) {
    if is_json_output() {
        print_json(points);
    } else {
        println!("{}", title.bold());
        println!("{}", series_table(points));
    }
}

/// Bar of `width` cells for `max`, scaled down for smaller values.
/// Non-zero values always get at least one cell.
pub fn bar(value: usize, max: usize, width: usize) -> String {
    if max == 0 || value == 0 {
        return String::new();
    }
    let cells = (value * width).div_ceil(max).clamp(1, width);
    "█".repeat(cells)
}

/// Format status with color based on its category
pub fn status_colored(status: &str, category: StatusCategory) -> ColoredString {
    match category {
        StatusCategory::Done => status.green(),
        StatusCategory::InProgress => status.blue(),
        StatusCategory::New => status.bright_black(),
        StatusCategory::Unknown => status.normal(),
    }
}

/// Format a timestamp in local time
pub fn format_datetime(at: &DateTime<Utc>) -> String {
    let local: DateTime<Local> = (*at).into();
    local.format("%Y-%m-%d %H:%M").to_string()
}

/// Short chart label, e.g. "Jan 05"
pub fn format_day(day: NaiveDate) -> String {
    day.format("%b %d").to_string()
}

/// Long date, e.g. "Jan 05, 2024"
pub fn format_long_date(day: NaiveDate) -> String {
    day.format("%b %d, %Y").to_string()
}

/// Truncate a string with ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
