//! Schema coercion: raw, normalized rows in; typed columns out.

use crate::error::{CoreError, CoreResult};
use crate::schema::Schema;
use crate::table::{Column, ColumnData, TypedTable};
use bookclub_sheet::{CellValue, RawTable, RowSource};
use tracing::{debug, warn};

/// How to treat a present cell that cannot be parsed as its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoercionMode {
    /// Replace the cell with null and keep going.
    #[default]
    Lenient,
    /// Fail the whole load on the first bad cell.
    Strict,
}

/// Options for [`load_table`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    pub mode: CoercionMode,
}

impl LoadOptions {
    #[must_use]
    pub fn strict() -> Self {
        LoadOptions {
            mode: CoercionMode::Strict,
        }
    }
}

/// Fetch a sheet, pad it to its header width and coerce it to `schema`.
pub fn load_table<S>(
    source: &S,
    sheet_name: &str,
    schema: &Schema,
    options: LoadOptions,
) -> CoreResult<TypedTable>
where
    S: RowSource + ?Sized,
{
    let raw = source.fetch(sheet_name)?.normalized()?;
    debug!(
        sheet = sheet_name,
        rows = raw.row_count(),
        width = raw.width(),
        "fetched sheet"
    );
    coerce(&raw, schema, options.mode)
}

/// Resolve schema columns to raw column positions.
///
/// Named schemas look headers up by name, so header order does not matter.
/// Positional schemas (`column_0`, `column_1`, ...) fall back to position
/// when the header row does not carry those names.
fn resolve_positions(raw: &RawTable, schema: &Schema) -> CoreResult<Vec<usize>> {
    let positional = schema.is_positional();
    schema
        .names()
        .enumerate()
        .map(|(i, name)| match raw.header_index(name) {
            Some(idx) => Ok(idx),
            None if positional && i < raw.width() => Ok(i),
            None => Err(CoreError::MissingColumn(name.to_string())),
        })
        .collect()
}

/// Coerce a normalized raw table into a typed table with the schema's
/// column order.
///
/// Absent cells are null in both modes; only present cells that fail to
/// parse are subject to `mode`.
pub fn coerce(raw: &RawTable, schema: &Schema, mode: CoercionMode) -> CoreResult<TypedTable> {
    let positions = resolve_positions(raw, schema)?;
    let mut columns = Vec::with_capacity(schema.len());

    for ((name, column_type), &idx) in schema.iter().zip(&positions) {
        let mut data = ColumnData::for_type(column_type, raw.row_count());
        let mut failures = 0usize;

        for (row_idx, row) in raw.rows().iter().enumerate() {
            let cell = row.get(idx).unwrap_or(&CellValue::Null);
            let ok = push_cell(&mut data, cell);
            if !ok {
                if mode == CoercionMode::Strict {
                    return Err(CoreError::Coercion {
                        column: name.to_string(),
                        row: row_idx,
                        value: cell.as_str(),
                        expected: column_type.name(),
                    });
                }
                failures += 1;
            }
        }

        if failures > 0 {
            warn!(
                column = name,
                failures,
                expected = column_type.name(),
                "cells could not be coerced and were set to null"
            );
        }
        columns.push(Column::new(name, data));
    }

    TypedTable::new(columns)
}

/// Append one cell to typed storage. Returns false when a present cell
/// failed to parse (a null is pushed in its place).
fn push_cell(data: &mut ColumnData, cell: &CellValue) -> bool {
    if cell.is_blank() {
        match data {
            ColumnData::Integer(v) => v.push(None),
            ColumnData::Float(v) => v.push(None),
            ColumnData::Text(v) => v.push(None),
            ColumnData::Date(v) => v.push(None),
        }
        return true;
    }

    match data {
        ColumnData::Integer(v) => {
            let parsed = cell.as_int();
            v.push(parsed);
            parsed.is_some()
        }
        ColumnData::Float(v) => {
            let parsed = cell.as_float();
            v.push(parsed);
            parsed.is_some()
        }
        ColumnData::Text(v) => {
            v.push(cell.as_text());
            true
        }
        // Schemas never declare dates; they are derived later.
        ColumnData::Date(v) => {
            v.push(None);
            false
        }
    }
}
