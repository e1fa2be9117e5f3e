use rust_xlsxwriter::Workbook;
use tabrecon::io::{self, excel_write};
use tabrecon::reconcile::reconcile;
use tabrecon::{CellValue, ErrorKind, Status};

const LEDGER_CSV: &str = "ID,Customer,Amount\n\
1,Acme,100\n\
2,\"Globex, Inc\",250.5\n\
3,Initech,75\n\
5,Umbrella,30\n";

fn bank_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "ID").expect("header");
    sheet.write_string(0, 1, "Amount").expect("header");
    sheet.write_string(0, 2, "Reference").expect("header");

    let rows: [(f64, Option<&str>, &str); 4] = [
        (2.0, Some("250.5"), "TX-2"),
        (1.0, Some("100"), "TX-1"),
        (3.0, Some("80"), "TX-3"),
        (4.0, Some("12"), "TX-4"),
    ];
    for (idx, (id, amount, reference)) in rows.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_number(row, 0, *id).expect("id");
        if let Some(amount) = amount {
            sheet.write_string(row, 1, *amount).expect("amount");
        }
        sheet.write_string(row, 2, *reference).expect("reference");
    }
    workbook.save_to_buffer().expect("workbook serialised")
}

#[test]
fn csv_and_workbook_reconcile_into_report_that_reparses() {
    let ledger = io::parse("ledger.csv", LEDGER_CSV.as_bytes()).expect("csv parsed");
    let bank = io::parse("BANK.XLSX", &bank_workbook()).expect("workbook parsed");

    let reconciled = reconcile(&ledger, &bank, "ID", "Amount").expect("reconciled");
    assert_eq!(
        reconciled.columns,
        [
            "ID",
            "Customer_A",
            "Amount_A",
            "Amount_B",
            "Reference_B",
            "Status"
        ]
    );

    let statuses: Vec<(String, Status)> = reconciled
        .rows
        .iter()
        .map(|row| (row.key.canonical_text().unwrap_or_default(), row.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("1".to_string(), Status::Match),
            ("2".to_string(), Status::Match),
            ("3".to_string(), Status::Mismatch),
            ("5".to_string(), Status::Mismatch),
            ("4".to_string(), Status::Mismatch),
        ]
    );

    let bytes = excel_write::write_report(&reconciled, "Reconciliation").expect("written");
    let reparsed = io::parse("report.xlsx", &bytes).expect("report parsed");
    assert_eq!(reparsed, reconciled.to_table().expect("flattened"));
}

#[test]
fn one_sided_null_compare_value_still_mismatches_against_a_value() {
    let left = io::parse("l.csv", b"ID,Amount\n1,\n").expect("left");
    let right = io::parse("r.csv", b"ID,Amount\n1,0\n").expect("right");

    let reconciled = reconcile(&left, &right, "ID", "Amount").expect("reconciled");
    assert_eq!(reconciled.rows[0].left, vec![CellValue::Null]);
    assert_eq!(reconciled.rows[0].status, Status::Mismatch);
}

#[test]
fn header_only_csv_is_rejected_as_empty_input() {
    let left = io::parse("left.csv", b"ID,Amount\n").expect("left parsed");
    let right = io::parse("right.csv", b"ID,Amount\n1,5\n").expect("right parsed");

    let err = reconcile(&left, &right, "ID", "Amount").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyInput);
    assert_eq!(err.to_string(), "left input has no data rows");
}

#[test]
fn table_without_id_column_is_missing_key() {
    let left = io::parse("left.csv", b"Ref,Amount\n1,5\n").expect("left parsed");
    let right = io::parse("right.csv", b"ID,Amount\n1,5\n").expect("right parsed");

    let err = reconcile(&left, &right, "ID", "Amount").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingKeyColumn);
}

#[test]
fn long_numeric_ids_stay_distinct_and_unchanged() {
    let left = io::parse(
        "accounts.csv",
        b"ID,Amount\n12345678901234567,10\n12345678901234568,20\n",
    )
    .expect("left parsed");
    let right = io::parse("statement.csv", b"ID,Amount\n12345678901234567,10\n")
        .expect("right parsed");

    let reconciled = reconcile(&left, &right, "ID", "Amount").expect("reconciled");
    let keys: Vec<(CellValue, Status)> = reconciled
        .rows
        .iter()
        .map(|row| (row.key.clone(), row.status))
        .collect();
    assert_eq!(
        keys,
        vec![
            (CellValue::from("12345678901234567"), Status::Match),
            (CellValue::from("12345678901234568"), Status::Mismatch),
        ]
    );

    let bytes = excel_write::write_report(&reconciled, "Reconciliation").expect("written");
    let reparsed = io::parse("report.xlsx", &bytes).expect("report parsed");
    assert_eq!(reparsed.rows()[0][0], CellValue::from("12345678901234567"));
    assert_eq!(reparsed.rows()[1][0], CellValue::from("12345678901234568"));
}

#[test]
fn legacy_xls_workbook_reads_first_sheet() {
    let bytes = include_bytes!("fixtures/ledger.xls");
    let table = io::parse("ledger.xls", bytes).expect("xls parsed");

    assert_eq!(table.columns(), ["ID", "Amount"]);
    assert_eq!(
        table.rows(),
        [
            vec![CellValue::Number(1.0), CellValue::Number(5.0)],
            vec![CellValue::Number(2.0), CellValue::Number(7.5)],
        ]
    );

    let right = io::parse("bank.csv", b"ID,Amount\n1,5\n2,7.25\n").expect("csv parsed");
    let reconciled = reconcile(&table, &right, "ID", "Amount").expect("reconciled");
    let statuses: Vec<Status> = reconciled.rows.iter().map(|row| row.status).collect();
    assert_eq!(statuses, vec![Status::Match, Status::Mismatch]);
}
