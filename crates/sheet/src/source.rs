use crate::error::{Result, SheetError};
use crate::raw::RawTable;
use indexmap::IndexMap;

/// Anything that can hand back the header row and data rows of a named
/// sheet.
///
/// Implementations must return headers before rows and must not fail for a
/// sheet with zero data rows. Rows may be ragged; padding happens later.
pub trait RowSource {
    /// Fetch a sheet by its logical name.
    fn fetch(&self, sheet_name: &str) -> Result<RawTable>;

    /// Names of the sheets this source can serve, in source order.
    fn sheet_names(&self) -> Result<Vec<String>>;
}

/// In-memory source (preserves insertion order)
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sheets: IndexMap<String, RawTable>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a sheet.
    pub fn insert(&mut self, name: &str, table: RawTable) {
        self.sheets.insert(name.to_string(), table);
    }

    /// Builder-style variant of [`MemorySource::insert`].
    #[must_use]
    pub fn with_sheet(mut self, name: &str, table: RawTable) -> Self {
        self.insert(name, table);
        self
    }
}

impl RowSource for MemorySource {
    fn fetch(&self, sheet_name: &str) -> Result<RawTable> {
        self.sheets
            .get(sheet_name)
            .cloned()
            .ok_or_else(|| SheetError::SheetNotFound {
                name: sheet_name.to_string(),
            })
    }

    fn sheet_names(&self) -> Result<Vec<String>> {
        Ok(self.sheets.keys().cloned().collect())
    }
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    fn fetch(&self, sheet_name: &str) -> Result<RawTable> {
        (**self).fetch(sheet_name)
    }

    fn sheet_names(&self) -> Result<Vec<String>> {
        (**self).sheet_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_roundtrip() {
        let table = RawTable::from_data(vec!["Resource", "URL"], vec![vec!["Meetup Page"]]).unwrap();
        let source = MemorySource::new().with_sheet("Resources", table.clone());

        assert_eq!(source.fetch("Resources").unwrap(), table);
        assert_eq!(source.sheet_names().unwrap(), vec!["Resources".to_string()]);
    }

    #[test]
    fn test_memory_source_missing_sheet() {
        let source = MemorySource::new();
        let err = source.fetch("Main").unwrap_err();
        assert!(matches!(err, SheetError::SheetNotFound { name } if name == "Main"));
    }

    #[test]
    fn test_boxed_source() {
        let source: Box<dyn RowSource> = Box::new(
            MemorySource::new().with_sheet("Main", RawTable::default()),
        );
        assert!(source.fetch("Main").unwrap().is_empty());
    }
}
