//! Build list → table rows, with the row→build mapping carried in each row.

use crate::app::{Build, BuildResult};
use ratatui::style::Color;

pub const HEADER: [&str; 7] = ["number", "Ago", "Result", "Branch", "Commiter", "Message", "Sha"];

/// Index of the header in the rendered table. Data rows start at 1.
pub const HEADER_ROW: usize = 0;

/// Display color for a build result string. Total over all inputs.
pub fn result_color(result: Option<&str>) -> Color {
    status_color(BuildResult::from_label(result))
}

fn status_color(result: BuildResult) -> Color {
    match result {
        BuildResult::Success => Color::Green,
        BuildResult::Failure => Color::Red,
        BuildResult::Unstable => Color::Yellow,
        BuildResult::Aborted | BuildResult::NotBuilt => Color::DarkGray,
        BuildResult::Unknown => Color::White,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub cells: [String; 7],
    pub color: Color,
    pub number: Option<u64>,
    pub axis_list: Vec<serde_json::Value>,
}

impl HistoryRow {
    pub fn from_build(build: &Build) -> Self {
        let commit = build.commit.clone().unwrap_or_default();
        let text = |s: Option<String>| s.unwrap_or_default();
        Self {
            cells: [
                build.number.map(|n| n.to_string()).unwrap_or_default(),
                text(build.display_time.clone()),
                text(build.result.clone()),
                text(commit.branch),
                text(commit.committer_name),
                first_line(commit.message.as_deref().unwrap_or_default()).to_string(),
                text(commit.short_sha),
            ],
            color: status_color(build.result()),
            number: build.number,
            axis_list: build.axis_list.clone().unwrap_or_default(),
        }
    }
}

/// What the detail screen receives when a row is activated.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub number: u64,
    pub axis_list: Vec<serde_json::Value>,
}

/// Rows of one fetch, immutable once built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryTable {
    rows: Vec<HistoryRow>,
}

impl HistoryTable {
    pub fn from_builds(builds: &[Build]) -> Self {
        Self {
            rows: builds.iter().map(HistoryRow::from_build).collect(),
        }
    }

    /// Rendered row count, header included.
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }

    pub fn data_rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at a rendered-table index; `HEADER_ROW` has no backing build.
    pub fn row(&self, table_row: usize) -> Option<&HistoryRow> {
        let idx = table_row.checked_sub(1)?;
        self.rows.get(idx)
    }

    /// Number of the last selectable table row, or `None` for an empty table.
    pub fn last_row(&self) -> Option<usize> {
        if self.rows.is_empty() {
            None
        } else {
            Some(self.rows.len())
        }
    }

    /// Resolves an activated table row. The header and rows without a build
    /// number are not selectable.
    pub fn selection_at(&self, table_row: usize) -> Option<Selection> {
        let row = self.row(table_row)?;
        let number = row.number?;
        Some(Selection {
            number,
            axis_list: row.axis_list.clone(),
        })
    }
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or_default()
}
