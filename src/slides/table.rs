//! Row extraction from a three-column status table.
//!
//! The table shape is `rows → cells → paragraphs → runs`, the way slide
//! packages store it. Column 0 names the project, column 1 carries the
//! color-coded status text and column 2 lists upcoming events. The first row
//! is a header and never yields data.

use tracing::{debug, warn};

use crate::core::errors::{AppError, AppResult};
use crate::core::types::{Cell, Rgb, Row, TextRun};
use crate::slides::color::classify;

pub const REQUIRED_COLUMNS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRun {
    pub text: String,
    pub color: Option<Rgb>,
}

impl RawRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    pub fn colored(text: impl Into<String>, color: Rgb) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParagraph {
    pub runs: Vec<RawRun>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    pub paragraphs: Vec<RawParagraph>,
}

impl TableCell {
    /// A cell holding one uncolored paragraph per line of `text`.
    pub fn text(text: &str) -> Self {
        Self {
            paragraphs: text
                .lines()
                .map(|line| RawParagraph {
                    runs: vec![RawRun::plain(line)],
                })
                .collect(),
        }
    }

    /// A cell holding a single paragraph made of `runs`.
    pub fn runs(runs: Vec<RawRun>) -> Self {
        Self {
            paragraphs: vec![RawParagraph { runs }],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideTable {
    pub columns: usize,
    pub rows: Vec<TableRow>,
}

impl SlideTable {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, cells: Vec<TableCell>) -> Self {
        self.rows.push(TableRow { cells });
        self
    }
}

pub fn extract_rows(table: &SlideTable) -> AppResult<Vec<Row>> {
    if table.columns < REQUIRED_COLUMNS {
        return Err(AppError::StructuralMismatch(format!(
            "table has {} columns, expected at least {REQUIRED_COLUMNS}",
            table.columns
        )));
    }

    let mut rows = Vec::new();
    for (row_idx, raw_row) in table.rows.iter().enumerate().skip(1) {
        let row = Row {
            name: read_cell(raw_row.cells.first()),
            information: read_cell(raw_row.cells.get(1)),
            events: read_cell(raw_row.cells.get(2)),
        };
        if row.name.is_blank() && row.information.is_blank() {
            debug!(row = row_idx, "skipping row without name or information");
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Rows of every usable table, in order. Tables that do not have the
/// expected shape are skipped with a warning.
pub fn extract_slide_rows(tables: &[SlideTable]) -> Vec<Row> {
    let mut rows = Vec::new();
    for (table_idx, table) in tables.iter().enumerate() {
        match extract_rows(table) {
            Ok(mut table_rows) => {
                debug!(table = table_idx, rows = table_rows.len(), "extracted table rows");
                rows.append(&mut table_rows);
            }
            Err(err) => warn!(table = table_idx, "skipping table: {err}"),
        }
    }
    rows
}

fn read_cell(cell: Option<&TableCell>) -> Cell {
    let Some(cell) = cell else {
        return Cell::default();
    };

    let mut lines: Vec<String> = Vec::new();
    let mut runs: Vec<TextRun> = Vec::new();
    for paragraph in &cell.paragraphs {
        let mut text = String::new();
        let mut paragraph_runs = Vec::new();
        for run in &paragraph.runs {
            if run.text.trim().is_empty() {
                continue;
            }
            text.push_str(&run.text);
            paragraph_runs.push(TextRun {
                text: run.text.clone(),
                color: run.color,
                category: classify(run.color),
            });
        }
        if !text.trim().is_empty() {
            lines.push(text);
            runs.append(&mut paragraph_runs);
        }
    }

    Cell {
        text: lines.join("\n").trim().to_string(),
        runs,
    }
}
