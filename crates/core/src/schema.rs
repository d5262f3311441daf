//! Column type declarations and the schemas of the bookclub workbook.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared semantic type of a schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

impl ColumnType {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Integer => "Integer",
            ColumnType::Float => "Float",
            ColumnType::Text => "Text",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered mapping from column name to declared type.
///
/// Declaration order is the column order of every table loaded with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    columns: IndexMap<String, ColumnType>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column, replacing the type of an existing one in place.
    #[must_use]
    pub fn with_column(mut self, name: &str, column_type: ColumnType) -> Self {
        self.columns.insert(name.to_string(), column_type);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<ColumnType> {
        self.columns.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnType)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// True when every column is named `column_<index>` in order, i.e. the
    /// schema addresses columns by position rather than by header.
    #[must_use]
    pub fn is_positional(&self) -> bool {
        !self.is_empty()
            && self
                .names()
                .enumerate()
                .all(|(i, name)| name == format!("column_{i}"))
    }
}

impl<S: Into<String>> FromIterator<(S, ColumnType)> for Schema {
    fn from_iter<I: IntoIterator<Item = (S, ColumnType)>>(iter: I) -> Self {
        Schema {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Sheet names used by the dashboard.
pub mod sheets {
    pub const MAIN: &str = "Main";
    pub const RESOURCES: &str = "Resources";
    pub const AUTHORS: &str = "Authors";
    pub const DATA: &str = "Data";
}

/// The books-read sheet.
#[must_use]
pub fn main_schema() -> Schema {
    use ColumnType::{Float, Integer, Text};
    [
        ("Number", Integer),
        ("ISBN", Text),
        ("Month", Text),
        ("Year", Integer),
        ("Title", Text),
        ("Score", Float),
        ("Author", Text),
        ("Publisher", Text),
        ("Pages", Integer),
        ("Author gender", Text),
        ("Pub year", Integer),
        ("Goodreads score", Float),
        ("Our score conversion", Float),
        ("variance", Float),
        ("Debut?", Text),
        ("Translated?", Text),
        ("Topics", Text),
    ]
    .into_iter()
    .collect()
}

#[must_use]
pub fn resources_schema() -> Schema {
    ["Resource", "Description", "URL"]
        .into_iter()
        .map(|name| (name, ColumnType::Text))
        .collect()
}

/// Author biographies. Years are kept as text because the sheet holds
/// entries like "c. 1650" and "present".
#[must_use]
pub fn authors_schema() -> Schema {
    [
        "Forename",
        "Surname",
        "Author Name",
        "Gender",
        "Country of Birth",
        "Year of Birth",
        "Year of death",
        "Books since last bookclub pick",
        "Book title",
    ]
    .into_iter()
    .map(|name| (name, ColumnType::Text))
    .collect()
}

/// Lookup sheet with unnamed columns, addressed by position.
#[must_use]
pub fn data_schema() -> Schema {
    (0..7)
        .map(|i| (format!("column_{i}"), ColumnType::Text))
        .collect()
}
