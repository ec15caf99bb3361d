use std::collections::HashSet;

use tracing::{debug, warn};

use crate::engine::core::read::result_table::{ExpectedTypes, ResultRow, ResultTable};
use crate::engine::core::write::batch::{ColumnBatch, EncodedBatch, EncodedSlice, RowBatch};
use crate::engine::errors::ClientError;
use crate::engine::types::{Cell, DataType};

/// A batch as returned by the server; same structure as an insert batch.
pub type RawBatch = EncodedBatch;

/// Rebuilds a typed, null-aware table from a response batch.
///
/// Fails with `MalformedResponse` on any structural drift: header lengths,
/// slice counts, bitmap lengths, bitmap/value counts, value kinds that disagree
/// with the declared series type, declared types that disagree with
/// `expected`, or a repeated timestamp.
pub fn decode(raw: RawBatch, expected: &ExpectedTypes) -> Result<ResultTable, ClientError> {
    check_header(raw.paths(), raw.data_types(), expected)?;

    let table = match raw {
        EncodedBatch::Rows(batch) => decode_rows(batch)?,
        EncodedBatch::Columns(batch) => decode_columns(batch)?,
    };

    debug!(
        target: "tsdb_session::decode",
        series = table.paths().len(),
        rows = table.len(),
        "Decoded result batch"
    );
    Ok(table)
}

fn check_header(
    paths: &[String],
    data_types: &[DataType],
    expected: &ExpectedTypes,
) -> Result<(), ClientError> {
    if paths.len() != data_types.len() {
        return Err(malformed(format!(
            "{} paths but {} data types",
            paths.len(),
            data_types.len()
        )));
    }

    let mut seen = HashSet::with_capacity(paths.len());
    for (path, declared) in paths.iter().zip(data_types) {
        if !seen.insert(path.as_str()) {
            return Err(malformed(format!("series '{}' returned twice", path)));
        }
        if let Some(wanted) = expected.get(path) {
            if wanted != *declared {
                return Err(malformed(format!(
                    "series '{}' returned as {} but {} was requested",
                    path, declared, wanted
                )));
            }
        }
    }
    Ok(())
}

fn decode_rows(batch: RowBatch) -> Result<ResultTable, ClientError> {
    let RowBatch {
        paths,
        data_types,
        timestamps,
        rows,
        ..
    } = batch;

    if rows.len() != timestamps.len() {
        return Err(malformed(format!(
            "{} rows for {} timestamps",
            rows.len(),
            timestamps.len()
        )));
    }

    let mut out = Vec::with_capacity(rows.len());
    for (timestamp, slice) in timestamps.into_iter().zip(rows) {
        if slice.bitmap.len() != paths.len() {
            return Err(malformed(format!(
                "row at {} masks {} series, expected {}",
                timestamp,
                slice.bitmap.len(),
                paths.len()
            )));
        }
        let values = expand(slice)?;
        for ((cell, path), declared) in values.iter().zip(&paths).zip(&data_types) {
            check_cell(path, cell, *declared)?;
        }
        out.push(ResultRow { timestamp, values });
    }

    finish(paths, data_types, out)
}

fn decode_columns(batch: ColumnBatch) -> Result<ResultTable, ClientError> {
    let ColumnBatch {
        paths,
        data_types,
        timestamps,
        columns,
        ..
    } = batch;

    if columns.len() != paths.len() {
        return Err(malformed(format!(
            "{} columns for {} series",
            columns.len(),
            paths.len()
        )));
    }

    let mut out: Vec<ResultRow> = timestamps
        .iter()
        .map(|&timestamp| ResultRow {
            timestamp,
            values: Vec::with_capacity(paths.len()),
        })
        .collect();

    for ((slice, path), declared) in columns.into_iter().zip(&paths).zip(&data_types) {
        if slice.bitmap.len() != timestamps.len() {
            return Err(malformed(format!(
                "column '{}' masks {} timestamps, expected {}",
                path,
                slice.bitmap.len(),
                timestamps.len()
            )));
        }
        let cells = expand(slice)?;
        for (row, cell) in out.iter_mut().zip(cells) {
            check_cell(path, &cell, *declared)?;
            row.values.push(cell);
        }
    }

    finish(paths, data_types, out)
}

fn expand(slice: EncodedSlice) -> Result<Vec<Cell>, ClientError> {
    if !slice.is_consistent() {
        return Err(malformed(format!(
            "bitmap marks {} present cells but {} values were sent",
            slice.bitmap.count_present(),
            slice.values.len()
        )));
    }
    slice.bitmap.apply(slice.values)
}

fn check_cell(path: &str, cell: &Cell, declared: DataType) -> Result<(), ClientError> {
    match cell {
        Some(value) if value.data_type() != declared => Err(malformed(format!(
            "series '{}' declared {} but carries a {} value",
            path,
            declared,
            value.data_type()
        ))),
        _ => Ok(()),
    }
}

fn finish(
    paths: Vec<String>,
    data_types: Vec<DataType>,
    mut rows: Vec<ResultRow>,
) -> Result<ResultTable, ClientError> {
    rows.sort_by_key(|r| r.timestamp);
    if let Some(dup) = rows.windows(2).find(|w| w[0].timestamp == w[1].timestamp) {
        return Err(malformed(format!(
            "timestamp {} appears more than once",
            dup[0].timestamp
        )));
    }
    Ok(ResultTable::new(paths, data_types, rows))
}

fn malformed(reason: String) -> ClientError {
    warn!(target: "tsdb_session::decode", "Rejecting response batch: {}", reason);
    ClientError::MalformedResponse(reason)
}
