//! Table output formatting for CLI commands
//!
//! Renders run reports and case listings with comfy-table. Status cells are
//! colour-coded unless `NO_COLOR` is set or the terminal is dumb, in which
//! case an icon carries the status instead.

use crate::domain::models::{CaseGroup, CaseStatus, RunReport, TestCase};
use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use super::truncate;

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format the outcomes of a run, one row per case
    pub fn format_report(&self, report: &RunReport) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            header("ID"),
            header("Group"),
            header("Check"),
            header("Status"),
            header("Score"),
            header("Time"),
            header("Detail"),
        ]);

        for outcome in &report.outcomes {
            let score = match (outcome.score, outcome.threshold) {
                (Some(score), Some(threshold)) => format!("{score:.3} / {threshold:.2}"),
                (Some(score), None) => format!("{score:.3}"),
                _ => "-".to_string(),
            };
            let detail = outcome.detail.lines().next().unwrap_or_default();

            table.add_row(vec![
                Cell::new(&outcome.id),
                Cell::new(outcome.group),
                Cell::new(outcome.check.as_str()),
                self.status_cell(outcome.status),
                Cell::new(score),
                Cell::new(format!("{:.1}s", outcome.elapsed_ms as f64 / 1000.0)),
                Cell::new(truncate(detail, 60)),
            ]);
        }

        table.to_string()
    }

    /// Format a listing of cases
    pub fn format_cases<'a>(&self, cases: impl IntoIterator<Item = (CaseGroup, &'a TestCase)>) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            header("ID"),
            header("Group"),
            header("Check"),
            header("Tier"),
            header("Name"),
            header("Input"),
        ]);

        for (group, case) in cases {
            table.add_row(vec![
                Cell::new(&case.id),
                Cell::new(group),
                Cell::new(case.effective_check().as_str()),
                Cell::new(case.length.as_str()),
                Cell::new(truncate(&case.name, 40)),
                Cell::new(truncate(&case.input, 40)),
            ]);
        }

        table.to_string()
    }

    fn status_cell(&self, status: CaseStatus) -> Cell {
        if self.use_colors {
            Cell::new(status).fg(status_color(status))
        } else {
            Cell::new(format!("{} {}", status_icon(status), status))
        }
    }

    /// Create a base table with common styling
    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(title: &str) -> Cell {
    Cell::new(title).add_attribute(Attribute::Bold)
}

/// Check if color output is supported
fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

const fn status_color(status: CaseStatus) -> Color {
    match status {
        CaseStatus::Passed => Color::Green,
        CaseStatus::Failed => Color::Red,
        CaseStatus::Errored => Color::Yellow,
    }
}

const fn status_icon(status: CaseStatus) -> &'static str {
    match status {
        CaseStatus::Passed => "✓",
        CaseStatus::Failed => "✗",
        CaseStatus::Errored => "!",
    }
}
