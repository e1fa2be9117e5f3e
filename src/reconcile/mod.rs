//! Full outer join of two tables on a key column with a per-row verdict on a
//! compare column.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::config::ReconConfig;
use crate::error::{ReconError, Result};
use crate::model::{CellValue, Presence, ReconciledRow, ReconciledTable, Side, Status, Table};

/// Joins `left` and `right` on `key` and compares `compare_column`, using the
/// default suffixes and status column.
pub fn reconcile(
    left: &Table,
    right: &Table,
    key: &str,
    compare_column: &str,
) -> Result<ReconciledTable> {
    reconcile_with(left, right, &ReconConfig::new(key, compare_column))
}

/// Joins and compares two tables according to `config`.
///
/// Rows come out in left order, each paired with its right counterpart,
/// followed by the right-only rows in right order.
#[instrument(
    level = "debug",
    skip_all,
    fields(key = %config.key_column, compare = %config.compare_column)
)]
pub fn reconcile_with(
    left: &Table,
    right: &Table,
    config: &ReconConfig,
) -> Result<ReconciledTable> {
    config.validate()?;
    let key = config.key_column.as_str();
    let compare = config.compare_column.as_str();

    let (left_key, right_key) =
        locate(left, right, key).map_err(|side| ReconError::MissingKeyColumn {
            side,
            column: key.to_string(),
        })?;
    let (left_cmp, right_cmp) =
        locate(left, right, compare).map_err(|side| ReconError::MissingCompareColumn {
            side,
            column: compare.to_string(),
        })?;
    if let Some(side) = Side::missing(!left.is_empty(), !right.is_empty()) {
        return Err(ReconError::EmptyInput { side });
    }

    let left_keys = key_texts(left, left_key, Side::Left, key)?;
    let right_keys = key_texts(right, right_key, Side::Right, key)?;

    let left_layout = SideLayout::new(left, left_key, left_cmp);
    let right_layout = SideLayout::new(right, right_key, right_cmp);

    let right_lookup: HashMap<&str, usize> = right_keys
        .iter()
        .enumerate()
        .map(|(idx, text)| (text.as_str(), idx))
        .collect();
    let mut right_matched = vec![false; right.len()];
    let mut rows = Vec::with_capacity(left.len() + right.len());

    for (left_idx, key_text) in left_keys.iter().enumerate() {
        let left_row = &left.rows()[left_idx];
        let left_cells = left_layout.non_key_cells(left_row);
        let (right_cells, presence) = match right_lookup.get(key_text.as_str()) {
            Some(&right_idx) => {
                right_matched[right_idx] = true;
                (
                    right_layout.non_key_cells(&right.rows()[right_idx]),
                    Presence::Both,
                )
            }
            None => (right_layout.null_cells(), Presence::LeftOnly),
        };
        rows.push(build_row(
            left_row[left_key].clone(),
            left_cells,
            right_cells,
            presence,
            &left_layout,
            &right_layout,
        ));
    }

    for (right_idx, right_row) in right.rows().iter().enumerate() {
        if right_matched[right_idx] {
            continue;
        }
        rows.push(build_row(
            right_row[right_key].clone(),
            left_layout.null_cells(),
            right_layout.non_key_cells(right_row),
            Presence::RightOnly,
            &left_layout,
            &right_layout,
        ));
    }

    let mut columns = Vec::with_capacity(left.width() + right.width());
    columns.push(key.to_string());
    columns.extend(left_layout.names.iter().map(|name| config.left_column(name)));
    columns.extend(right_layout.names.iter().map(|name| config.right_column(name)));
    columns.push(config.status_column.clone());

    let table = ReconciledTable { columns, rows };
    debug!(rows = table.rows.len(), "joined tables");
    Ok(table)
}

/// Textual-equality rule: two cells agree iff their canonical text forms do.
pub fn compare_cells(left: &CellValue, right: &CellValue) -> Status {
    if left.canonical_text() == right.canonical_text() {
        Status::Match
    } else {
        Status::Mismatch
    }
}

/// Finds `column` in both tables, or reports which side lacks it.
fn locate(
    left: &Table,
    right: &Table,
    column: &str,
) -> std::result::Result<(usize, usize), Side> {
    match (left.column_index(column), right.column_index(column)) {
        (Some(l), Some(r)) => Ok((l, r)),
        (None, Some(_)) => Err(Side::Left),
        (Some(_), None) => Err(Side::Right),
        (None, None) => Err(Side::Both),
    }
}

/// Canonical key text per row, rejecting blank and repeated keys.
fn key_texts(table: &Table, key_idx: usize, side: Side, column: &str) -> Result<Vec<String>> {
    let mut seen = HashSet::with_capacity(table.len());
    let mut keys = Vec::with_capacity(table.len());

    for (row_idx, row) in table.rows().iter().enumerate() {
        let text = row[key_idx]
            .canonical_text()
            .ok_or_else(|| ReconError::BlankKey {
                side,
                row: row_idx + 1,
                column: column.to_string(),
            })?;
        if !seen.insert(text.clone()) {
            return Err(ReconError::DuplicateKey {
                side,
                column: column.to_string(),
                key: text,
            });
        }
        keys.push(text);
    }

    Ok(keys)
}

/// Non-key columns of one input and where its compare column sits among them.
struct SideLayout {
    positions: Vec<usize>,
    names: Vec<String>,
    compare_offset: usize,
}

impl SideLayout {
    fn new(table: &Table, key_idx: usize, compare_idx: usize) -> Self {
        let positions: Vec<usize> = (0..table.width()).filter(|idx| *idx != key_idx).collect();
        let names = positions
            .iter()
            .map(|idx| table.columns()[*idx].clone())
            .collect();
        // Validated configs never use the key column as the compare column.
        let compare_offset = positions
            .iter()
            .position(|idx| *idx == compare_idx)
            .unwrap_or_default();
        Self {
            positions,
            names,
            compare_offset,
        }
    }

    fn non_key_cells(&self, row: &[CellValue]) -> Vec<CellValue> {
        self.positions.iter().map(|idx| row[*idx].clone()).collect()
    }

    fn null_cells(&self) -> Vec<CellValue> {
        vec![CellValue::Null; self.positions.len()]
    }
}

fn build_row(
    key: CellValue,
    left: Vec<CellValue>,
    right: Vec<CellValue>,
    presence: Presence,
    left_layout: &SideLayout,
    right_layout: &SideLayout,
) -> ReconciledRow {
    let status = compare_cells(
        &left[left_layout.compare_offset],
        &right[right_layout.compare_offset],
    );
    ReconciledRow {
        key,
        left,
        right,
        presence,
        status,
    }
}
