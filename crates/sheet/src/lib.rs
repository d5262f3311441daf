//! Raw sheet layer for bookclub
//!
//! Turns whatever a spreadsheet backend hands back (a header row plus ragged,
//! loosely-typed data rows) into a rectangular [`RawTable`] where every row
//! has the header width and blank cells are explicit nulls.
//!
//! # Examples
//!
//! ## Padding ragged rows
//!
//! ```
//! use bookclub_sheet::{pad_data, CellValue};
//!
//! let padded = pad_data(vec![vec![CellValue::from("a"), CellValue::from("")]], 3).unwrap();
//! assert_eq!(padded[0], vec![CellValue::from("a"), CellValue::Null, CellValue::Null]);
//! ```
//!
//! ## Fetching from a source
//!
//! ```
//! use bookclub_sheet::{MemorySource, RawTable, RowSource};
//!
//! let source = MemorySource::new().with_sheet(
//!     "Resources",
//!     RawTable::from_data(vec!["Resource", "Description", "URL"], vec![vec!["Meetup Page"]]).unwrap(),
//! );
//!
//! let table = source.fetch("Resources").unwrap().normalized().unwrap();
//! assert_eq!(table.rows()[0].len(), 3);
//! ```
//!
//! ## Loading from a directory of CSV exports
//!
//! ```no_run
//! use bookclub_sheet::{CsvDirSource, RowSource};
//!
//! let source = CsvDirSource::new("data");
//! let main = source.fetch("Main").unwrap();
//! ```

mod cell;
mod csv;
mod error;
mod raw;
mod source;
#[cfg(not(target_arch = "wasm32"))]
mod xlsx;

/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export CSV reading.
pub use csv::{read_csv, read_csv_str, CsvDirSource, CsvOptions};
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export the raw table and normalizer.
pub use raw::{pad_data, RawTable};
/// Re-export the row source contract.
pub use source::{MemorySource, RowSource};
#[cfg(not(target_arch = "wasm32"))]
/// Re-export the workbook source (non-WASM only).
pub use xlsx::XlsxSource;
