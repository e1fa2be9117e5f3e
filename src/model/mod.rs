use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single cell read from an uploaded table.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Plain text as it appeared in the source.
    Text(String),
    /// Numeric literal. Spreadsheet integers are widened to `f64`.
    Number(f64),
    /// Empty cell, or a cell filled in by the outer join.
    Null,
}

impl CellValue {
    /// Canonical textual form used when comparing values across tables.
    ///
    /// Numbers render through `f64`'s shortest representation, so `5.0` and the
    /// text `"5"` share the form `"5"`. `Null` has no textual form and therefore
    /// never equals a present value.
    pub fn canonical_text(&self) -> Option<String> {
        match self {
            CellValue::Text(value) => Some(value.clone()),
            CellValue::Number(value) => Some(value.to_string()),
            CellValue::Null => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// Identifies which input a problem or a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
    Both,
}

impl Side {
    /// Folds per-side presence flags into the side that is missing something.
    pub fn missing(left_ok: bool, right_ok: bool) -> Option<Side> {
        match (left_ok, right_ok) {
            (true, true) => None,
            (false, true) => Some(Side::Left),
            (true, false) => Some(Side::Right),
            (false, false) => Some(Side::Both),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
            Side::Both => write!(f, "left and right"),
        }
    }
}

/// Shape violations detected while assembling a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("table has no columns")]
    NoColumns,

    #[error("column {0} has a blank header")]
    BlankColumn(usize),

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Ordered, uniquely named columns and rows of cells.
///
/// Every row holds exactly one cell per column; absent values are stored as
/// [`CellValue::Null`].
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Creates an empty table after validating the header.
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::NoColumns);
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            if column.trim().is_empty() {
                return Err(SchemaError::BlankColumn(idx + 1));
            }
            if !seen.insert(column.as_str()) {
                return Err(SchemaError::DuplicateColumn(column.clone()));
            }
        }

        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Appends a row, which must be exactly as wide as the header.
    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<(), SchemaError> {
        if row.len() != self.columns.len() {
            return Err(SchemaError::RowWidth {
                row: self.rows.len() + 1,
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows, whatever its header holds.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Verdict for a single reconciled row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Match,
    Mismatch,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Match => "Match",
            Status::Mismatch => "Mismatch",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which inputs contributed to a reconciled row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Both,
    LeftOnly,
    RightOnly,
}

/// One output row of the outer join.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledRow {
    /// Key value, taken from the left row when one exists.
    pub key: CellValue,
    /// Non-key cells of the left row, in left column order.
    pub left: Vec<CellValue>,
    /// Non-key cells of the right row, in right column order.
    pub right: Vec<CellValue>,
    pub presence: Presence,
    pub status: Status,
}

impl ReconciledRow {
    /// Cells in report column order, with the status rendered as text.
    pub fn cells(&self) -> Vec<CellValue> {
        let mut cells = Vec::with_capacity(self.left.len() + self.right.len() + 2);
        cells.push(self.key.clone());
        cells.extend(self.left.iter().cloned());
        cells.extend(self.right.iter().cloned());
        cells.push(CellValue::Text(self.status.as_str().to_string()));
        cells
    }
}

/// Result of joining and comparing two tables.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledTable {
    pub columns: Vec<String>,
    pub rows: Vec<ReconciledRow>,
}

impl ReconciledTable {
    /// Flattens the reconciled rows into a plain [`Table`] with the same
    /// column order the report uses.
    pub fn to_table(&self) -> Result<Table, SchemaError> {
        let mut table = Table::new(self.columns.clone())?;
        for row in &self.rows {
            table.push_row(row.cells())?;
        }
        Ok(table)
    }

    pub fn summary(&self) -> ReconSummary {
        let mut summary = ReconSummary::default();
        for row in &self.rows {
            match row.status {
                Status::Match => summary.matched += 1,
                Status::Mismatch => summary.mismatched += 1,
            }
            match row.presence {
                Presence::Both => {}
                Presence::LeftOnly => summary.left_only += 1,
                Presence::RightOnly => summary.right_only += 1,
            }
        }
        summary
    }
}

/// Row counts describing a reconciliation outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconSummary {
    pub matched: usize,
    pub mismatched: usize,
    pub left_only: usize,
    pub right_only: usize,
}

impl ReconSummary {
    pub fn total(&self) -> usize {
        self.matched + self.mismatched
    }
}
