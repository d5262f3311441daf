use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::raw::RawTable;
use crate::source::RowSource;
use calamine::{open_workbook, Data, Reader, Xlsx, XlsxError};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        // Excel stores dates as days since 1899-12-30
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

fn workbook_error(e: XlsxError) -> SheetError {
    SheetError::Workbook(e.to_string())
}

/// Drop trailing blank cells so a worksheet range looks like the ragged
/// rows a spreadsheet API returns.
fn trim_trailing_blanks(row: &mut Vec<CellValue>) {
    while row.last().is_some_and(CellValue::is_blank) {
        row.pop();
    }
}

/// An `.xlsx` workbook whose worksheets are the logical sheets.
#[derive(Debug, Clone)]
pub struct XlsxSource {
    path: PathBuf,
}

impl XlsxSource {
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        XlsxSource {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Xlsx<BufReader<File>>> {
        open_workbook(&self.path).map_err(workbook_error)
    }
}

impl RowSource for XlsxSource {
    fn fetch(&self, sheet_name: &str) -> Result<RawTable> {
        let mut workbook = self.open()?;
        if !workbook.sheet_names().iter().any(|n| n == sheet_name) {
            return Err(SheetError::SheetNotFound {
                name: sheet_name.to_string(),
            });
        }

        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(workbook_error)?;

        let grid: Vec<Vec<CellValue>> = range
            .rows()
            .map(|row| {
                let mut cells: Vec<CellValue> = row.iter().map(data_to_cell_value).collect();
                trim_trailing_blanks(&mut cells);
                cells
            })
            .collect();

        debug!(
            sheet = sheet_name,
            path = %self.path.display(),
            rows = grid.len().saturating_sub(1),
            "read workbook sheet"
        );
        RawTable::from_grid(grid)
    }

    fn sheet_names(&self) -> Result<Vec<String>> {
        Ok(self.open()?.sheet_names().to_vec())
    }
}
