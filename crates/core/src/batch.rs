//! Arrow conversion so any Arrow-aware renderer can draw a table.

use crate::error::CoreResult;
use crate::table::{ColumnData, TypedTable};
use arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use arrow::datatypes::{DataType, Field, Schema as ArrowSchema};
use chrono::{Datelike, NaiveDate};
use std::sync::Arc;

/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn date32(d: NaiveDate) -> i32 {
    d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

impl TypedTable {
    /// Convert to a single Arrow record batch. Every field is nullable.
    pub fn to_record_batch(&self) -> CoreResult<RecordBatch> {
        let mut fields = Vec::with_capacity(self.column_count());
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(self.column_count());

        for column in self.columns() {
            let (data_type, array): (DataType, ArrayRef) = match column.data() {
                ColumnData::Integer(v) => (DataType::Int64, Arc::new(Int64Array::from(v.clone()))),
                ColumnData::Float(v) => (DataType::Float64, Arc::new(Float64Array::from(v.clone()))),
                ColumnData::Text(v) => (DataType::Utf8, Arc::new(StringArray::from(v.clone()))),
                ColumnData::Date(v) => (
                    DataType::Date32,
                    Arc::new(Date32Array::from(
                        v.iter().map(|d| d.map(date32)).collect::<Vec<_>>(),
                    )),
                ),
            };
            fields.push(Field::new(column.name(), data_type, true));
            arrays.push(array);
        }

        let options = RecordBatchOptions::new().with_row_count(Some(self.row_count()));
        Ok(RecordBatch::try_new_with_options(
            Arc::new(ArrowSchema::new(fields)),
            arrays,
            &options,
        )?)
    }
}
