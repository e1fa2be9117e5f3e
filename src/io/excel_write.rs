use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::error::Result;
use crate::model::{CellValue, ReconciledTable};

/// Serialises the reconciled table into a single-sheet `.xlsx` workbook held
/// in memory.
pub fn write_report(table: &ReconciledTable, sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    let header_format = Format::new().set_bold();
    for (col_idx, header) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, excel_col(col_idx)?, header, &header_format)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        for (col_idx, cell) in row.cells().iter().enumerate() {
            write_cell(worksheet, excel_row, excel_col(col_idx)?, cell)?;
        }
    }

    let col_end = excel_col(table.columns.len().saturating_sub(1))?;
    let row_end = table.rows.len() as u32;
    worksheet.autofilter(0, 0, row_end, col_end)?;
    worksheet.set_freeze_panes(1, 0)?;

    Ok(workbook.save_to_buffer()?)
}

/// Converts a zero-based column position, failing instead of wrapping when it
/// does not fit the writer's column type.
fn excel_col(col_idx: usize) -> Result<u16> {
    u16::try_from(col_idx).map_err(|_| XlsxError::RowColumnLimitError.into())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &CellValue) -> Result<()> {
    match cell {
        CellValue::Text(value) => {
            worksheet.write_string(row, col, value)?;
        }
        CellValue::Number(value) => {
            worksheet.write_number(row, col, *value)?;
        }
        CellValue::Null => {}
    }
    Ok(())
}
