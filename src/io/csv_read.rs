use crate::error::{ReconError, Result};
use crate::model::{CellValue, Table};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
/// 2^53: integers at or above this magnitude are no longer exact in an `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Reads comma-separated text whose first record is the header.
pub fn read_csv(filename: &str, bytes: &[u8]) -> Result<Table> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| ReconError::parse(filename, err))?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();
    if headers.iter().all(|header| header.is_empty()) {
        return Err(ReconError::parse(filename, "missing header row"));
    }

    let mut table = Table::new(headers).map_err(|err| ReconError::parse(filename, err))?;

    for record in reader.records() {
        let record = record.map_err(|err| ReconError::parse(filename, err))?;
        let row = record.iter().map(field_to_cell).collect();
        table
            .push_row(row)
            .map_err(|err| ReconError::parse(filename, err))?;
    }

    Ok(table)
}

/// Numeric-looking fields become numbers unless the conversion would lose
/// digits, in which case the field is kept verbatim as text.
fn field_to_cell(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Null;
    }
    let trimmed = field.trim();
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() && !loses_integer_digits(trimmed, number) => {
            CellValue::Number(number)
        }
        _ => CellValue::Text(field.to_string()),
    }
}

fn loses_integer_digits(literal: &str, number: f64) -> bool {
    let digits = literal.strip_prefix(['+', '-']).unwrap_or(literal);
    !digits.is_empty()
        && digits.bytes().all(|byte| byte.is_ascii_digit())
        && number.abs() >= MAX_EXACT_INTEGER
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn reads_quoted_fields_and_types_cells() {
        let source = "\u{feff}ID,Name,Amount\n1,\"Smith, J\",5\n2,,12.50\n";
        let table = read_csv("ledger.csv", source.as_bytes()).expect("csv parsed");

        assert_eq!(table.columns(), ["ID", "Name", "Amount"]);
        assert_eq!(
            table.rows()[0],
            vec![
                CellValue::Number(1.0),
                CellValue::from("Smith, J"),
                CellValue::Number(5.0)
            ]
        );
        assert_eq!(table.rows()[1][1], CellValue::Null);
        assert_eq!(table.rows()[1][2], CellValue::Number(12.5));
    }

    #[test]
    fn non_finite_words_stay_text() {
        assert_eq!(field_to_cell("NaN"), CellValue::from("NaN"));
        assert_eq!(field_to_cell("inf"), CellValue::from("inf"));
        assert_eq!(field_to_cell(" 7 "), CellValue::Number(7.0));
    }

    #[test]
    fn long_integers_keep_every_digit() {
        assert_eq!(
            field_to_cell("12345678901234567"),
            CellValue::from("12345678901234567")
        );
        assert_eq!(
            field_to_cell("-98765432109876543210"),
            CellValue::from("-98765432109876543210")
        );
        assert_eq!(
            field_to_cell("9007199254740991"),
            CellValue::Number(9_007_199_254_740_991.0)
        );
        assert_eq!(field_to_cell("1.5e20"), CellValue::Number(1.5e20));
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let table = read_csv("empty.csv", b"ID,Amount\n").expect("csv parsed");
        assert!(table.is_empty());
        assert_eq!(table.width(), 2);
    }

    #[test]
    fn rejects_duplicate_headers() {
        let err = read_csv("dup.csv", b"ID,Amount,Amount\n1,2,3\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseError);
        assert!(err.to_string().contains("duplicate column name 'Amount'"));
    }

    #[test]
    fn rejects_ragged_records_and_empty_files() {
        let err = read_csv("ragged.csv", b"ID,Amount\n1,2,3\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseError);

        let err = read_csv("blank.csv", b"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseError);
    }
}
