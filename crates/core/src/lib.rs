//! # bookclub-core
//!
//! Typed tables for the bookclub dashboard.
//!
//! This crate provides:
//! - Schemas for the workbook's sheets
//! - Coercion of normalized raw sheets into typed tables
//! - Derived month/date columns and topic explosion
//! - Group, pivot, top-k and distinct-count queries
//! - Pearson correlation and its description
//!
//! ```
//! use bookclub_core::{load_table, main_schema, LoadOptions};
//! use bookclub_sheet::{MemorySource, RawTable};
//!
//! let headers = main_schema().names().map(str::to_string).collect::<Vec<_>>();
//! let source = MemorySource::new().with_sheet("Main", RawTable::from_data(headers, Vec::<Vec<&str>>::new()).unwrap());
//!
//! let table = load_table(&source, "Main", &main_schema(), LoadOptions::default()).unwrap();
//! assert_eq!(table.column_count(), 17);
//! assert!(table.is_empty());
//! ```

/// Grouping and summary queries.
pub mod aggregate;
/// Arrow record batch conversion.
pub mod batch;
/// Schema coercion and sheet loading.
pub mod coerce;
/// Correlation coefficient and its description.
pub mod correlation;
/// Queries behind the dashboard panels.
pub mod dashboard;
/// Derived columns.
pub mod derive;
/// Error types and result aliases.
pub mod error;
/// Column types and sheet schemas.
pub mod schema;
/// Typed tables.
pub mod table;
/// Typed cell values.
pub mod value;

pub use aggregate::{count_by, count_non_null, crosstab, group_mean_count, sum, top_k, unique_count, Direction};
pub use coerce::{coerce, load_table, CoercionMode, LoadOptions};
pub use correlation::{correlate, describe_pearsons_r, describe_value, pearson_r, round_to, CorrelationReport};
pub use dashboard::Overview;
pub use derive::{explode, explode_topics, month_number, with_month_and_date};
pub use error::{CoreError, CoreResult};
pub use schema::{authors_schema, data_schema, main_schema, resources_schema, ColumnType, Schema};
pub use table::{AggregateTable, Column, ColumnData, TypedTable};
pub use value::Value;
