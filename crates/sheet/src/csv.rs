use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::raw::RawTable;
use crate::source::RowSource;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV reader options
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            quote: b'"',
        }
    }
}

impl CsvOptions {
    /// Create options for TSV (tab-separated values)
    #[must_use]
    pub fn tsv() -> Self {
        CsvOptions {
            delimiter: b'\t',
            ..Default::default()
        }
    }

    /// Set the delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Read a whole CSV document into a raw table. The first record is the
/// header row; later records may be shorter or longer than it.
///
/// Cells are kept as strings; typing is the schema coercer's job.
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> Result<RawTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .has_headers(false) // We handle headers ourselves
        .flexible(true)
        .from_reader(reader);

    let mut grid: Vec<Vec<CellValue>> = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        grid.push(
            record
                .iter()
                .map(|field| CellValue::String(field.to_string()))
                .collect(),
        );
    }

    RawTable::from_grid(grid)
}

/// Read a CSV string into a raw table.
pub fn read_csv_str(content: &str, options: &CsvOptions) -> Result<RawTable> {
    read_csv(content.as_bytes(), options)
}

/// A directory of `<sheet>.csv` files, one per logical sheet.
#[derive(Debug, Clone)]
pub struct CsvDirSource {
    dir: PathBuf,
    options: CsvOptions,
    extension: &'static str,
}

impl CsvDirSource {
    #[must_use]
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self::with_options(dir, CsvOptions::default())
    }

    #[must_use]
    pub fn with_options<P: AsRef<Path>>(dir: P, options: CsvOptions) -> Self {
        let extension = if options.delimiter == b'\t' { "tsv" } else { "csv" };
        CsvDirSource {
            dir: dir.as_ref().to_path_buf(),
            options,
            extension,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn sheet_path(&self, sheet_name: &str) -> PathBuf {
        self.dir.join(format!("{sheet_name}.{}", self.extension))
    }
}

impl RowSource for CsvDirSource {
    fn fetch(&self, sheet_name: &str) -> Result<RawTable> {
        let path = self.sheet_path(sheet_name);
        if !path.is_file() {
            return Err(SheetError::SheetNotFound {
                name: sheet_name.to_string(),
            });
        }
        let file = File::open(&path)?;
        let table = read_csv(BufReader::new(file), &self.options)?;
        debug!(
            sheet = sheet_name,
            path = %path.display(),
            rows = table.row_count(),
            "read csv sheet"
        );
        Ok(table)
    }

    fn sheet_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let file_path = entry?.path();
            if file_path.extension().is_some_and(|ext| ext == self.extension) {
                if let Some(stem) = file_path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
