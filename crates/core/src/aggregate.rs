//! Grouping and summary queries over typed tables.
//!
//! Every function here is pure: it reads a table and returns a fresh
//! [`AggregateTable`] or scalar. An empty input gives an empty result.

use crate::error::{CoreError, CoreResult};
use crate::table::{AggregateTable, Column, ColumnData, TypedTable};
use crate::value::Value;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Name of the row-count column in grouped outputs.
pub const COUNT_COLUMN: &str = "Count";

/// Which end of the ordering [`top_k`] keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Largest,
    Smallest,
}

/// Row indices of each distinct key, in first-appearance order.
fn group_indices(column: &Column) -> IndexMap<Value, Vec<usize>> {
    let mut groups: IndexMap<Value, Vec<usize>> = IndexMap::new();
    for (row, key) in column.values().enumerate() {
        groups.entry(key).or_default().push(row);
    }
    groups
}

/// Key column of a grouped output: the first row of every group, keeping
/// the key's original type.
fn key_column(column: &Column, groups: &IndexMap<Value, Vec<usize>>) -> Column {
    let firsts: Vec<usize> = groups.values().map(|rows| rows[0]).collect();
    Column::new(column.name(), column.data().take(&firsts))
}

/// Per-group mean of `value` and row count, grouped by `key`.
///
/// Output columns: `key`, `value` (mean as Float), `Count`. Nulls are left
/// out of the mean; a group with no non-null values has a null mean. The
/// count is of rows, nulls included.
pub fn group_mean_count(table: &TypedTable, key: &str, value: &str) -> CoreResult<AggregateTable> {
    let key_col = table.column(key)?;
    let values = table.column(value)?.to_f64()?;
    if key == value {
        return Err(CoreError::InvalidArgument(format!(
            "cannot group '{key}' by itself"
        )));
    }

    let groups = group_indices(key_col);
    let mut means = Vec::with_capacity(groups.len());
    let mut counts = Vec::with_capacity(groups.len());
    for rows in groups.values() {
        let present: Vec<f64> = rows.iter().filter_map(|&r| values[r]).collect();
        means.push(if present.is_empty() {
            None
        } else {
            Some(present.iter().sum::<f64>() / present.len() as f64)
        });
        counts.push(Some(rows.len() as i64));
    }

    TypedTable::new(vec![
        key_column(key_col, &groups),
        Column::float(value, means),
        Column::integer(COUNT_COLUMN, counts),
    ])
}

/// Rows per distinct value of `column`, ascending by count then by value.
///
/// Output columns: `column`, `Count`.
pub fn count_by(table: &TypedTable, column: &str) -> CoreResult<AggregateTable> {
    let key_col = table.column(column)?;
    let groups = group_indices(key_col);
    let counts: Vec<Option<i64>> = groups.values().map(|rows| Some(rows.len() as i64)).collect();

    TypedTable::new(vec![
        key_column(key_col, &groups),
        Column::integer(COUNT_COLUMN, counts),
    ])?
    .sort_by(column, false)?
    .sort_by(COUNT_COLUMN, false)
}

/// Count rows per (`row_key`, `pivot_key`) pair and spread `pivot_key` into
/// one integer column per distinct value.
///
/// The result is dense: every row key appears once (first-appearance
/// order) and every pivot column exists, with missing pairs as 0. Pivot
/// columns are sorted by value, a null pivot value last as `"null"`. A
/// label already taken by an earlier column gets a ` (2)`, ` (3)`, ...
/// suffix.
pub fn crosstab(table: &TypedTable, row_key: &str, pivot_key: &str) -> CoreResult<AggregateTable> {
    let row_col = table.column(row_key)?;
    let pivot_col = table.column(pivot_key)?;

    let row_groups = group_indices(row_col);
    let mut pivot_values: Vec<Value> = {
        let mut seen = HashSet::new();
        pivot_col
            .values()
            .filter(|v| seen.insert(v.clone()))
            .collect()
    };
    pivot_values.sort_by(Value::total_cmp);

    let mut columns = vec![key_column(row_col, &row_groups)];
    let mut taken: HashSet<String> = HashSet::from([row_key.to_string()]);
    for pivot in &pivot_values {
        let counts: Vec<Option<i64>> = row_groups
            .values()
            .map(|rows| {
                let n = rows.iter().filter(|&&r| pivot_col.get(r) == *pivot).count();
                Some(n as i64)
            })
            .collect();
        columns.push(Column::integer(&unique_label(pivot.to_string(), &mut taken), counts));
    }

    TypedTable::new(columns)
}

fn unique_label(label: String, taken: &mut HashSet<String>) -> String {
    let mut candidate = label.clone();
    let mut n = 2;
    while taken.contains(&candidate) {
        candidate = format!("{label} ({n})");
        n += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

/// The `k` rows with the largest (or smallest) values of `column`.
///
/// Ties keep their original row order; null keys rank after every value.
pub fn top_k(
    table: &TypedTable,
    column: &str,
    k: usize,
    direction: Direction,
) -> CoreResult<TypedTable> {
    let mut indices = table.sorted_indices(column, direction == Direction::Largest)?;
    indices.truncate(k);
    Ok(table.take(&indices))
}

/// Number of distinct non-null values in `column`.
pub fn unique_count(table: &TypedTable, column: &str) -> CoreResult<usize> {
    let distinct: HashSet<Value> = table
        .column(column)?
        .values()
        .filter(|v| !v.is_null())
        .collect();
    Ok(distinct.len())
}

/// Number of non-null cells in `column`.
pub fn count_non_null(table: &TypedTable, column: &str) -> CoreResult<usize> {
    let col = table.column(column)?;
    Ok(col.len() - col.data().null_count())
}

/// Sum of the non-null cells of a numeric column: `Int` for integer
/// columns, `Float` for float columns. An empty column sums to zero.
pub fn sum(table: &TypedTable, column: &str) -> CoreResult<Value> {
    let col = table.column(column)?;
    match col.data() {
        ColumnData::Integer(v) => v
            .iter()
            .flatten()
            .try_fold(0i64, |acc, &n| acc.checked_add(n))
            .map(Value::Int)
            .ok_or_else(|| CoreError::InvalidArgument(format!("sum of '{column}' overflows"))),
        ColumnData::Float(v) => Ok(Value::Float(v.iter().flatten().sum())),
        other => Err(CoreError::type_mismatch(column, "numeric", other.type_name())),
    }
}
