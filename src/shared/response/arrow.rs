use std::sync::Arc;

use arrow_array::builder::{
    BinaryBuilder, BooleanBuilder, Float32Builder, Float64Builder, Int32Builder, Int64Builder,
};
use arrow_array::{ArrayRef, RecordBatch};
use arrow_schema::{ArrowError, DataType as ArrowType, Field, Schema};

use crate::engine::core::read::ResultTable;
use crate::engine::types::{DataType, Value};

type ArrowResult<T> = Result<T, ArrowError>;

pub const TIME_COLUMN: &str = "time";

/// Fills one nullable column. Cells of any other kind are appended as null,
/// which cannot happen for a decoded table.
macro_rules! build_column {
    ($builder:expr, $table:expr, $idx:expr, $variant:ident) => {{
        let mut builder = $builder;
        for row in $table.rows() {
            match &row.values[$idx] {
                Some(Value::$variant(v)) => builder.append_value(v.clone()),
                _ => builder.append_null(),
            }
        }
        Arc::new(builder.finish()) as ArrayRef
    }};
}

pub fn schema_for(table: &ResultTable) -> Schema {
    let mut fields = Vec::with_capacity(table.paths().len() + 1);
    fields.push(Field::new(TIME_COLUMN, ArrowType::Int64, false));
    for (path, data_type) in table.paths().iter().zip(table.data_types()) {
        fields.push(Field::new(path, data_type.to_arrow_data_type(), true));
    }
    Schema::new(fields)
}

/// Converts a decoded table into an Arrow record batch: a non-null `time`
/// column followed by one nullable column per series.
pub fn to_record_batch(table: &ResultTable) -> ArrowResult<RecordBatch> {
    let rows = table.len();
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(table.paths().len() + 1);

    let mut time = Int64Builder::with_capacity(rows);
    for ts in table.timestamps() {
        time.append_value(ts);
    }
    columns.push(Arc::new(time.finish()));

    for (idx, data_type) in table.data_types().iter().enumerate() {
        let array = match data_type {
            DataType::Binary => {
                build_column!(BinaryBuilder::with_capacity(rows, rows * 8), table, idx, Binary)
            }
            DataType::Integer => build_column!(Int32Builder::with_capacity(rows), table, idx, Integer),
            DataType::Long => build_column!(Int64Builder::with_capacity(rows), table, idx, Long),
            DataType::Float => build_column!(Float32Builder::with_capacity(rows), table, idx, Float),
            DataType::Double => build_column!(Float64Builder::with_capacity(rows), table, idx, Double),
            DataType::Boolean => {
                build_column!(BooleanBuilder::with_capacity(rows), table, idx, Boolean)
            }
        };
        columns.push(array);
    }

    RecordBatch::try_new(Arc::new(schema_for(table)), columns)
}

impl ResultTable {
    pub fn to_record_batch(&self) -> ArrowResult<RecordBatch> {
        to_record_batch(self)
    }
}
