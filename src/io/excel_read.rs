use std::fmt::Display;
use std::io::Cursor;

use calamine::{DataType, Range, Reader, Xls, Xlsx};
use chrono::Timelike;

use crate::error::{ReconError, Result};
use crate::model::{CellValue, Table};

/// Reads the first worksheet of an Office Open XML workbook.
pub fn read_xlsx(filename: &str, bytes: &[u8]) -> Result<Table> {
    let range = first_sheet::<Xlsx<Cursor<&[u8]>>>(bytes)
        .map_err(|cause| ReconError::parse(filename, cause))?;
    range_to_table(filename, &range)
}

/// Reads the first worksheet of a legacy BIFF (`.xls`) workbook.
pub fn read_xls(filename: &str, bytes: &[u8]) -> Result<Table> {
    let range = first_sheet::<Xls<Cursor<&[u8]>>>(bytes)
        .map_err(|cause| ReconError::parse(filename, cause))?;
    range_to_table(filename, &range)
}

fn first_sheet<'a, R>(bytes: &'a [u8]) -> std::result::Result<Range<DataType>, String>
where
    R: Reader<Cursor<&'a [u8]>>,
    R::Error: Display,
{
    let mut workbook = R::new(Cursor::new(bytes)).map_err(|err| err.to_string())?;
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| "workbook contains no worksheets".to_string())?
        .map_err(|err| err.to_string())
}

/// Converts a worksheet range into a table, treating the first row as the header.
fn range_to_table(filename: &str, range: &Range<DataType>) -> Result<Table> {
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(first_row) => first_row.iter().map(cell_to_header).collect(),
        None => return Err(ReconError::parse(filename, "worksheet is empty")),
    };

    let mut table = Table::new(headers).map_err(|err| ReconError::parse(filename, err))?;

    for row in rows {
        let cells = row.iter().map(cell_to_value).collect();
        table
            .push_row(cells)
            .map_err(|err| ReconError::parse(filename, err))?;
    }

    Ok(table)
}

fn cell_to_header(cell: &DataType) -> String {
    match cell {
        DataType::String(value) => value.trim().to_string(),
        DataType::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

fn cell_to_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::Empty => CellValue::Null,
        DataType::String(value) if value.is_empty() => CellValue::Null,
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(value) => {
            CellValue::Text(if *value { "TRUE" } else { "FALSE" }.to_string())
        }
        DataType::DateTime(_) | DataType::DateTimeIso(_) => match cell.as_datetime() {
            Some(moment) => CellValue::Text(iso_date_text(moment)),
            None => CellValue::Text(cell.to_string()),
        },
        other => CellValue::Text(other.to_string()),
    }
}

/// ISO-8601 text for a spreadsheet date, dropping the time when it is midnight.
fn iso_date_text(moment: chrono::NaiveDateTime) -> String {
    if moment.num_seconds_from_midnight() == 0 && moment.nanosecond() == 0 {
        moment.format("%Y-%m-%d").to_string()
    } else {
        moment.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}
