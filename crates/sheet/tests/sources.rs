use bookclub_sheet::{CellValue, CsvDirSource, RowSource, SheetError, XlsxSource};
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

// ===== CSV directory source =====

#[test]
fn test_csv_dir_fetch_and_normalize() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("Main.csv"),
        "Number,Title,Score\n1,Dune,8.2\n2,,\n3\n",
    )
    .unwrap();

    let source = CsvDirSource::new(dir.path());
    let table = source.fetch("Main").unwrap().normalized().unwrap();

    assert_eq!(table.headers(), ["Number", "Title", "Score"]);
    assert_eq!(table.row_count(), 3);
    assert!(table.rows().iter().all(|row| row.len() == 3));
    assert!(table.rows()[1][1].is_null());
    assert_eq!(table.rows()[2], vec![CellValue::from("3"), CellValue::Null, CellValue::Null]);
}

#[test]
fn test_csv_dir_missing_sheet() {
    let dir = tempdir().unwrap();
    let source = CsvDirSource::new(dir.path());

    let err = source.fetch("Authors").unwrap_err();
    assert!(matches!(err, SheetError::SheetNotFound { name } if name == "Authors"));
}

#[test]
fn test_csv_dir_wide_row_is_invariant_violation() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("Main.csv"), "A,B\n1,2,3\n").unwrap();

    let source = CsvDirSource::new(dir.path());
    let err = source.fetch("Main").unwrap().normalized().unwrap_err();
    assert!(matches!(
        err,
        SheetError::InvariantViolation {
            row: 0,
            width: 3,
            expected: 2
        }
    ));
}

#[test]
fn test_csv_dir_sheet_names() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("Resources.csv"), "Resource\n").unwrap();
    std::fs::write(dir.path().join("Main.csv"), "Title\n").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let source = CsvDirSource::new(dir.path());
    assert_eq!(source.sheet_names().unwrap(), vec!["Main", "Resources"]);
}

// ===== XLSX workbook source =====

#[test]
fn test_xlsx_fetch_named_sheet() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bookclub.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Main").unwrap();
    worksheet.write_string(0, 0, "Title").unwrap();
    worksheet.write_string(0, 1, "Year").unwrap();
    worksheet.write_string(0, 2, "Score").unwrap();
    worksheet.write_string(1, 0, "Dune").unwrap();
    worksheet.write_number(1, 1, 2021.0).unwrap();
    worksheet.write_string(2, 0, "Emma").unwrap();
    worksheet.write_number(2, 1, 2022.0).unwrap();
    worksheet.write_number(2, 2, 7.5).unwrap();
    workbook.save(&path).unwrap();

    let source = XlsxSource::new(&path);
    assert_eq!(source.sheet_names().unwrap(), vec!["Main"]);

    let table = source.fetch("Main").unwrap();
    assert_eq!(table.headers(), ["Title", "Year", "Score"]);
    // Trailing empty cell trimmed like the spreadsheet API does
    assert_eq!(table.rows()[0].len(), 2);
    assert_eq!(table.rows()[0][1].as_int(), Some(2021));

    let table = table.normalized().unwrap();
    assert!(table.rows()[0][2].is_null());
    assert_eq!(table.rows()[1][2].as_float(), Some(7.5));

    assert!(matches!(
        source.fetch("Suggestions"),
        Err(SheetError::SheetNotFound { .. })
    ));
}
