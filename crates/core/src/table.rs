//! Strongly typed, immutable-by-convention tables.

use crate::error::{CoreError, CoreResult};
use crate::schema::ColumnType;
use crate::value::Value;
use chrono::NaiveDate;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Storage for one column. Every cell is either a value of the column's
/// type or `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Date(Vec<Option<NaiveDate>>),
}

impl ColumnData {
    /// Empty storage for a declared schema type.
    #[must_use]
    pub fn for_type(column_type: ColumnType, capacity: usize) -> Self {
        match column_type {
            ColumnType::Integer => Self::Integer(Vec::with_capacity(capacity)),
            ColumnType::Float => Self::Float(Vec::with_capacity(capacity)),
            ColumnType::Text => Self::Text(Vec::with_capacity(capacity)),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Integer(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Text(v) => v.len(),
            Self::Date(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "Integer",
            Self::Float(_) => "Float",
            Self::Text(_) => "Text",
            Self::Date(_) => "Date",
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Float(_))
    }

    /// Read one cell. Out-of-range reads are null.
    #[must_use]
    pub fn get(&self, row: usize) -> Value {
        match self {
            Self::Integer(v) => v.get(row).copied().flatten().into(),
            Self::Float(v) => v.get(row).copied().flatten().into(),
            Self::Text(v) => v.get(row).cloned().flatten().into(),
            Self::Date(v) => v.get(row).copied().flatten().into(),
        }
    }

    /// Numeric view of one cell, `None` for nulls and non-numeric columns.
    #[must_use]
    pub fn get_f64(&self, row: usize) -> Option<f64> {
        match self {
            Self::Integer(v) => v.get(row).copied().flatten().map(|n| n as f64),
            Self::Float(v) => v.get(row).copied().flatten(),
            Self::Text(_) | Self::Date(_) => None,
        }
    }

    #[must_use]
    pub fn is_null(&self, row: usize) -> bool {
        match self {
            Self::Integer(v) => v.get(row).map_or(true, Option::is_none),
            Self::Float(v) => v.get(row).map_or(true, Option::is_none),
            Self::Text(v) => v.get(row).map_or(true, Option::is_none),
            Self::Date(v) => v.get(row).map_or(true, Option::is_none),
        }
    }

    #[must_use]
    pub fn null_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_null(i)).count()
    }

    /// Gather rows by index, in the order given. Indices may repeat.
    #[must_use]
    pub fn take(&self, indices: &[usize]) -> Self {
        fn gather<T: Clone>(v: &[Option<T>], indices: &[usize]) -> Vec<Option<T>> {
            indices
                .iter()
                .map(|&i| v.get(i).cloned().flatten())
                .collect()
        }
        match self {
            Self::Integer(v) => Self::Integer(gather(v, indices)),
            Self::Float(v) => Self::Float(gather(v, indices)),
            Self::Text(v) => Self::Text(gather(v, indices)),
            Self::Date(v) => Self::Date(gather(v, indices)),
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    #[must_use]
    pub fn new(name: &str, data: ColumnData) -> Self {
        Column {
            name: name.to_string(),
            data,
        }
    }

    #[must_use]
    pub fn integer(name: &str, values: Vec<Option<i64>>) -> Self {
        Self::new(name, ColumnData::Integer(values))
    }

    #[must_use]
    pub fn float(name: &str, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Float(values))
    }

    #[must_use]
    pub fn text<S: Into<String>>(name: &str, values: Vec<Option<S>>) -> Self {
        Self::new(
            name,
            ColumnData::Text(values.into_iter().map(|v| v.map(Into::into)).collect()),
        )
    }

    #[must_use]
    pub fn date(name: &str, values: Vec<Option<NaiveDate>>) -> Self {
        Self::new(name, ColumnData::Date(values))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn get(&self, row: usize) -> Value {
        self.data.get(row)
    }

    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).map(move |i| self.data.get(i))
    }

    /// Borrow the text cells, failing for non-text columns.
    pub fn as_text(&self) -> CoreResult<&[Option<String>]> {
        match &self.data {
            ColumnData::Text(v) => Ok(v),
            other => Err(CoreError::type_mismatch(&self.name, "Text", other.type_name())),
        }
    }

    /// Borrow the integer cells, failing for non-integer columns.
    pub fn as_integer(&self) -> CoreResult<&[Option<i64>]> {
        match &self.data {
            ColumnData::Integer(v) => Ok(v),
            other => Err(CoreError::type_mismatch(&self.name, "Integer", other.type_name())),
        }
    }

    /// Numeric cells of an integer or float column as `f64`.
    pub fn to_f64(&self) -> CoreResult<Vec<Option<f64>>> {
        if !self.data.is_numeric() {
            return Err(CoreError::type_mismatch(
                &self.name,
                "numeric",
                self.data.type_name(),
            ));
        }
        Ok((0..self.len()).map(|i| self.data.get_f64(i)).collect())
    }

    fn take(&self, indices: &[usize]) -> Self {
        Column {
            name: self.name.clone(),
            data: self.data.take(indices),
        }
    }
}

/// Ordered, equal-length, uniquely named typed columns.
///
/// Aggregation results use the same shape, so anything that can render a
/// `TypedTable` can render an aggregate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedTable {
    columns: Vec<Column>,
}

/// Summary tables share the typed table representation.
pub type AggregateTable = TypedTable;

impl TypedTable {
    /// Build a table, checking equal column lengths and unique names.
    pub fn new(columns: Vec<Column>) -> CoreResult<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(CoreError::InvalidArgument(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }
        if let Some(first) = columns.first() {
            if let Some(bad) = columns.iter().find(|c| c.len() != first.len()) {
                return Err(CoreError::InvalidArgument(format!(
                    "column '{}' has {} rows, expected {}",
                    bad.name,
                    bad.len(),
                    first.len()
                )));
            }
        }
        Ok(TypedTable { columns })
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> CoreResult<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| CoreError::MissingColumn(name.to_string()))
    }

    /// Read one cell by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> CoreResult<Value> {
        Ok(self.column(column)?.get(row))
    }

    /// All cells of one row, in column order.
    #[must_use]
    pub fn row(&self, row: usize) -> Vec<Value> {
        self.columns.iter().map(|c| c.get(row)).collect()
    }

    /// Return a copy with `column` appended, or replacing the column of the
    /// same name in place.
    pub fn with_column(&self, column: Column) -> CoreResult<Self> {
        if !self.columns.is_empty() && column.len() != self.row_count() {
            return Err(CoreError::InvalidArgument(format!(
                "column '{}' has {} rows, expected {}",
                column.name,
                column.len(),
                self.row_count()
            )));
        }
        let mut columns = self.columns.clone();
        match columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => columns.push(column),
        }
        Ok(TypedTable { columns })
    }

    /// Keep only the named columns, in the order given.
    pub fn select(&self, names: &[&str]) -> CoreResult<Self> {
        let columns = names
            .iter()
            .map(|name| self.column(name).cloned())
            .collect::<CoreResult<Vec<_>>>()?;
        TypedTable::new(columns)
    }

    /// Gather rows by index.
    #[must_use]
    pub fn take(&self, indices: &[usize]) -> Self {
        TypedTable {
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
        }
    }

    /// Keep the rows whose value in `column` satisfies `predicate`.
    pub fn filter_by<F>(&self, column: &str, predicate: F) -> CoreResult<Self>
    where
        F: Fn(&Value) -> bool,
    {
        let col = self.column(column)?;
        let keep: Vec<usize> = (0..self.row_count())
            .filter(|&i| predicate(&col.get(i)))
            .collect();
        Ok(self.take(&keep))
    }

    /// Row indices ordered by `column` (stable, nulls last in both
    /// directions).
    pub fn sorted_indices(&self, column: &str, descending: bool) -> CoreResult<Vec<usize>> {
        let col = self.column(column)?;
        let keys: Vec<Value> = col.values().collect();
        let mut indices: Vec<usize> = (0..keys.len()).collect();
        indices.sort_by(|&a, &b| {
            let (ka, kb) = (&keys[a], &keys[b]);
            match (ka.is_null(), kb.is_null()) {
                (false, false) if descending => kb.total_cmp(ka),
                _ => ka.total_cmp(kb),
            }
        });
        Ok(indices)
    }

    /// Stable sort on one column, nulls last.
    pub fn sort_by(&self, column: &str, descending: bool) -> CoreResult<Self> {
        let indices = self.sorted_indices(column, descending)?;
        Ok(self.take(&indices))
    }

    /// Distinct non-null values of a column, ascending.
    pub fn unique_sorted(&self, column: &str) -> CoreResult<Vec<Value>> {
        let mut seen = HashSet::new();
        let mut values: Vec<Value> = self
            .column(column)?
            .values()
            .filter(|v| !v.is_null() && seen.insert(v.clone()))
            .collect();
        values.sort_by(Value::total_cmp);
        Ok(values)
    }

    /// Rows as ordered name → value maps, ready for JSON output.
    #[must_use]
    pub fn to_records(&self) -> Vec<IndexMap<String, Value>> {
        (0..self.row_count())
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| (c.name.clone(), c.get(row)))
                    .collect()
            })
            .collect()
    }
}
