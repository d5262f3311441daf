//! Derived columns: month number, first-of-month date, exploded topics.

use crate::error::{CoreError, CoreResult};
use crate::table::{Column, ColumnData, TypedTable};
use chrono::NaiveDate;

pub const MONTH_COLUMN: &str = "Month";
pub const YEAR_COLUMN: &str = "Year";
pub const MONTH_NUM_COLUMN: &str = "Month Num";
pub const DATE_COLUMN: &str = "Date";
pub const TOPICS_COLUMN: &str = "Topics";

/// Separator between entries of a topic list cell.
pub const TOPIC_DELIMITER: &str = ", ";

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// 1-based month index of an English month name. Matching is exact and
/// case-sensitive.
pub fn month_number(name: &str) -> CoreResult<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| *m == name)
        .map(|i| i as u32 + 1)
        .ok_or_else(|| CoreError::UnknownMonthName(name.to_string()))
}

/// Add "Month Num" (1-12) and "Date" (first day of that month) columns.
///
/// A null month or year gives null derived cells; a month that is present
/// but not a month name fails the whole call.
pub fn with_month_and_date(table: &TypedTable) -> CoreResult<TypedTable> {
    let months = table.column(MONTH_COLUMN)?.as_text()?;
    let years = table.column(YEAR_COLUMN)?.as_integer()?;

    let month_nums = months
        .iter()
        .map(|m| m.as_deref().map(month_number).transpose())
        .collect::<CoreResult<Vec<Option<u32>>>>()?;

    let dates: Vec<Option<NaiveDate>> = years
        .iter()
        .zip(&month_nums)
        .map(|(year, month)| match (year, month) {
            (Some(y), Some(m)) => i32::try_from(*y)
                .ok()
                .and_then(|y| NaiveDate::from_ymd_opt(y, *m, 1)),
            _ => None,
        })
        .collect();

    table
        .with_column(Column::integer(
            MONTH_NUM_COLUMN,
            month_nums.iter().map(|m| m.map(i64::from)).collect(),
        ))?
        .with_column(Column::date(DATE_COLUMN, dates))
}

/// One output row per entry of a delimiter-joined list in `column`, with
/// every other column repeated.
///
/// A null or empty cell produces a single row with a null entry, so
/// per-row counts taken after the explode still see every input row.
pub fn explode(table: &TypedTable, column: &str, delimiter: &str) -> CoreResult<TypedTable> {
    let cells = table.column(column)?.as_text()?;

    let mut indices = Vec::with_capacity(cells.len());
    let mut tokens: Vec<Option<String>> = Vec::with_capacity(cells.len());
    for (row, cell) in cells.iter().enumerate() {
        match cell.as_deref() {
            Some(list) if !list.is_empty() => {
                for token in list.split(delimiter) {
                    indices.push(row);
                    tokens.push(Some(token.to_string()));
                }
            }
            _ => {
                indices.push(row);
                tokens.push(None);
            }
        }
    }

    let columns = table
        .columns()
        .iter()
        .map(|c| {
            if c.name() == column {
                Column::new(column, ColumnData::Text(tokens.clone()))
            } else {
                Column::new(c.name(), c.data().take(&indices))
            }
        })
        .collect();
    TypedTable::new(columns)
}

/// [`explode`] over the "Topics" column with the ", " delimiter.
pub fn explode_topics(table: &TypedTable) -> CoreResult<TypedTable> {
    explode(table, TOPICS_COLUMN, TOPIC_DELIMITER)
}
