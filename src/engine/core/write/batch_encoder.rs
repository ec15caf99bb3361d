use tracing::debug;

use crate::engine::core::write::batch::{
    ColumnBatch, EncodedBatch, EncodedSlice, InsertShape, InsertValues, Layout, RowBatch,
};
use crate::engine::errors::ClientError;
use crate::engine::types::{Cell, DataType, validate};
use crate::shared::path::check_selection;

/// Encodes caller cells into a wire batch of the requested shape.
///
/// Every check runs before anything is produced: selection, type list length,
/// timestamp ordering, row/column dimensions and per-cell types. Entirely
/// absent rows or columns are kept and encode to an all-zero bitmap.
pub fn encode<P: AsRef<str>>(
    shape: InsertShape,
    paths: &[P],
    timestamps: &[i64],
    values: InsertValues,
    types: &[DataType],
) -> Result<EncodedBatch, ClientError> {
    let paths = check_selection(paths)?;
    if types.len() != paths.len() {
        return Err(ClientError::ShapeMismatch(format!(
            "{} data types supplied for {} paths",
            types.len(),
            paths.len()
        )));
    }
    check_timestamps(timestamps)?;

    if values.layout() != shape.layout {
        return Err(ClientError::ShapeMismatch(format!(
            "{:?} insert given {:?}-major values",
            shape.layout,
            values.layout()
        )));
    }

    let batch = match values {
        InsertValues::Rows(rows) => {
            EncodedBatch::Rows(encode_rows(shape, paths, timestamps, rows, types)?)
        }
        InsertValues::Columns(columns) => {
            EncodedBatch::Columns(encode_columns(shape, paths, timestamps, columns, types)?)
        }
    };

    debug!(
        target: "tsdb_session::encode",
        layout = ?shape.layout,
        alignment = ?shape.alignment,
        series = batch.paths().len(),
        timestamps = batch.timestamps().len(),
        present = batch.present_count(),
        "Encoded insert batch"
    );
    Ok(batch)
}

pub fn encode_row_aligned<P: AsRef<str>>(
    paths: &[P],
    timestamps: &[i64],
    rows: Vec<Vec<Cell>>,
    types: &[DataType],
) -> Result<RowBatch, ClientError> {
    into_rows(encode(
        InsertShape::ROW_ALIGNED,
        paths,
        timestamps,
        InsertValues::Rows(rows),
        types,
    )?)
}

pub fn encode_row_non_aligned<P: AsRef<str>>(
    paths: &[P],
    timestamps: &[i64],
    rows: Vec<Vec<Cell>>,
    types: &[DataType],
) -> Result<RowBatch, ClientError> {
    into_rows(encode(
        InsertShape::ROW_NON_ALIGNED,
        paths,
        timestamps,
        InsertValues::Rows(rows),
        types,
    )?)
}

pub fn encode_column_aligned<P: AsRef<str>>(
    paths: &[P],
    timestamps: &[i64],
    columns: Vec<Vec<Cell>>,
    types: &[DataType],
) -> Result<ColumnBatch, ClientError> {
    into_columns(encode(
        InsertShape::COLUMN_ALIGNED,
        paths,
        timestamps,
        InsertValues::Columns(columns),
        types,
    )?)
}

pub fn encode_column_non_aligned<P: AsRef<str>>(
    paths: &[P],
    timestamps: &[i64],
    columns: Vec<Vec<Cell>>,
    types: &[DataType],
) -> Result<ColumnBatch, ClientError> {
    into_columns(encode(
        InsertShape::COLUMN_NON_ALIGNED,
        paths,
        timestamps,
        InsertValues::Columns(columns),
        types,
    )?)
}

fn encode_rows(
    shape: InsertShape,
    paths: Vec<String>,
    timestamps: &[i64],
    rows: Vec<Vec<Cell>>,
    types: &[DataType],
) -> Result<RowBatch, ClientError> {
    if rows.len() != timestamps.len() {
        return Err(ClientError::ShapeMismatch(format!(
            "{} rows supplied for {} timestamps",
            rows.len(),
            timestamps.len()
        )));
    }

    let mut encoded = Vec::with_capacity(rows.len());
    for (row_idx, row) in rows.into_iter().enumerate() {
        if row.len() != paths.len() {
            return Err(ClientError::ShapeMismatch(format!(
                "row {} has {} cells, expected {}",
                row_idx,
                row.len(),
                paths.len()
            )));
        }
        for ((cell, path), ty) in row.iter().zip(&paths).zip(types) {
            validate(path, cell, *ty)?;
        }
        encoded.push(EncodedSlice::encode(row));
    }

    Ok(RowBatch {
        paths,
        data_types: types.to_vec(),
        timestamps: timestamps.to_vec(),
        rows: encoded,
        alignment: shape.alignment,
    })
}

fn encode_columns(
    shape: InsertShape,
    paths: Vec<String>,
    timestamps: &[i64],
    columns: Vec<Vec<Cell>>,
    types: &[DataType],
) -> Result<ColumnBatch, ClientError> {
    if columns.len() != paths.len() {
        return Err(ClientError::ShapeMismatch(format!(
            "{} columns supplied for {} paths",
            columns.len(),
            paths.len()
        )));
    }

    let mut encoded = Vec::with_capacity(columns.len());
    for ((column, path), ty) in columns.into_iter().zip(&paths).zip(types) {
        if column.len() != timestamps.len() {
            return Err(ClientError::ShapeMismatch(format!(
                "column '{}' has {} cells, expected {}",
                path,
                column.len(),
                timestamps.len()
            )));
        }
        for cell in &column {
            validate(path, cell, *ty)?;
        }
        encoded.push(EncodedSlice::encode(column));
    }

    Ok(ColumnBatch {
        paths,
        data_types: types.to_vec(),
        timestamps: timestamps.to_vec(),
        columns: encoded,
        alignment: shape.alignment,
    })
}

fn check_timestamps(timestamps: &[i64]) -> Result<(), ClientError> {
    if let Some(pos) = timestamps.windows(2).position(|w| w[0] >= w[1]) {
        return Err(ClientError::InvalidArgument(format!(
            "timestamps must be strictly increasing: {} then {} at index {}",
            timestamps[pos],
            timestamps[pos + 1],
            pos + 1
        )));
    }
    Ok(())
}

fn into_rows(batch: EncodedBatch) -> Result<RowBatch, ClientError> {
    match batch {
        EncodedBatch::Rows(rows) => Ok(rows),
        EncodedBatch::Columns(_) => Err(ClientError::ShapeMismatch(format!(
            "expected a {:?}-major batch",
            Layout::Row
        ))),
    }
}

fn into_columns(batch: EncodedBatch) -> Result<ColumnBatch, ClientError> {
    match batch {
        EncodedBatch::Columns(columns) => Ok(columns),
        EncodedBatch::Rows(_) => Err(ClientError::ShapeMismatch(format!(
            "expected a {:?}-major batch",
            Layout::Column
        ))),
    }
}
