use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use std::collections::HashSet;
use tracing::debug;

/// Header row plus possibly-ragged data rows, exactly as a row source
/// delivered them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Build a raw table, rejecting repeated header names.
    ///
    /// Blank header cells are allowed (lookup sheets leave them empty) and
    /// are never considered duplicates of each other.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for name in headers.iter().filter(|h| !h.is_empty()) {
            if !seen.insert(name.as_str()) {
                return Err(SheetError::DuplicateHeader { name: name.clone() });
            }
        }
        Ok(RawTable { headers, rows })
    }

    /// Build a raw table from a header row and literal data, as tests and
    /// in-memory callers do.
    pub fn from_data<H, T>(headers: Vec<H>, data: Vec<Vec<T>>) -> Result<Self>
    where
        H: Into<String>,
        T: Into<CellValue>,
    {
        let headers = headers.into_iter().map(Into::into).collect();
        let rows = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        Self::new(headers, rows)
    }

    /// Split a full grid into header row and data rows.
    ///
    /// An entirely empty grid is a sheet with no headers and no rows.
    pub fn from_grid(mut grid: Vec<Vec<CellValue>>) -> Result<Self> {
        if grid.is_empty() {
            return Ok(RawTable::default());
        }
        let rows = grid.split_off(1);
        let headers = grid
            .into_iter()
            .next()
            .unwrap_or_default()
            .iter()
            .map(CellValue::as_str)
            .collect();
        Self::new(headers, rows)
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Declared row width, i.e. the header count.
    #[must_use]
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of data rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a header by exact name.
    #[must_use]
    pub fn header_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Pad every row to the header width and turn empty strings into nulls.
    pub fn normalized(self) -> Result<Self> {
        let width = self.width();
        let rows = pad_data(self.rows, width)?;
        debug!(rows = rows.len(), width, "normalized raw table");
        Ok(RawTable {
            headers: self.headers,
            rows,
        })
    }

    /// True when every row already has the header width and no cell is an
    /// empty string.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        self.rows.iter().all(|row| {
            row.len() == self.width()
                && !row
                    .iter()
                    .any(|c| matches!(c, CellValue::String(s) if s.is_empty()))
        })
    }

    /// Consume the table into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<CellValue>>) {
        (self.headers, self.rows)
    }
}

/// Right-pad each row with nulls to `width` cells, rewriting empty-string
/// cells to null on the way.
///
/// Rows are never truncated: a row wider than `width` is reported as
/// [`SheetError::InvariantViolation`] with its zero-based data row index.
pub fn pad_data(rows: Vec<Vec<CellValue>>, width: usize) -> Result<Vec<Vec<CellValue>>> {
    rows.into_iter()
        .enumerate()
        .map(|(row_idx, row)| {
            if row.len() > width {
                return Err(SheetError::InvariantViolation {
                    row: row_idx,
                    width: row.len(),
                    expected: width,
                });
            }
            let mut padded: Vec<CellValue> = row
                .into_iter()
                .map(|cell| match cell {
                    CellValue::String(s) if s.is_empty() => CellValue::Null,
                    other => other,
                })
                .collect();
            padded.resize(width, CellValue::Null);
            Ok(padded)
        })
        .collect()
}
