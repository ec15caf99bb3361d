use tracing::{debug, info, warn};

use crate::command::builder::{aggregate, downsample, filtered_range, last_value, plain_range};
use crate::command::types::{AggregateKind, QueryShape, QuerySpec};
use crate::engine::core::read::{ExpectedTypes, ResultTable, decode};
use crate::engine::core::write::{InsertShape, InsertValues, encode};
use crate::engine::errors::ClientError;
use crate::engine::types::{Cell, DataType};
use crate::frontend::protocol::{Request, decode_response, encode_request};
use crate::frontend::transport::{SessionHandle, Transport};
use crate::session::metadata::{ClusterInfo, SeriesDescriptor};
use crate::shared::config::ConnectionConfig;
use crate::shared::path::is_selected;
use crate::shared::response::ResponseBody;

/// An authenticated session over a transport.
///
/// Every request is validated and encoded locally before the transport sees
/// it, so a local error never produces network traffic. Methods take
/// `&mut self`: one request is in flight at a time.
pub struct Session<T: Transport> {
    transport: T,
    handle: SessionHandle,
}

impl<T: Transport> Session<T> {
    pub fn open(mut transport: T, config: &ConnectionConfig) -> Result<Self, ClientError> {
        let endpoint = config.endpoint();
        let handle = transport
            .open(&endpoint, &config.credentials())
            .inspect_err(|e| e.log_error())?;
        info!(
            target: "tsdb_session::session",
            session = handle.id(),
            "Session opened to {}", endpoint
        );
        Ok(Self { transport, handle })
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn close(self) -> Result<(), ClientError> {
        let Session {
            mut transport,
            handle,
        } = self;
        let id = handle.id();
        transport.close(handle).inspect_err(|e| e.log_error())?;
        info!(target: "tsdb_session::session", session = id, "Session closed");
        Ok(())
    }

    /// Encodes and sends one batch in any of the four insertion shapes.
    pub fn insert<P: AsRef<str>>(
        &mut self,
        shape: InsertShape,
        paths: &[P],
        timestamps: &[i64],
        values: InsertValues,
        types: &[DataType],
    ) -> Result<(), ClientError> {
        let batch =
            encode(shape, paths, timestamps, values, types).inspect_err(|e| e.log_error())?;
        let present = batch.present_count();
        match self.call(Request::Insert(batch))? {
            ResponseBody::Empty => {
                debug!(
                    target: "tsdb_session::session",
                    rows = timestamps.len(),
                    present,
                    "Insert acknowledged"
                );
                Ok(())
            }
            other => Err(unexpected("insert", &other)),
        }
    }

    pub fn insert_row_records<P: AsRef<str>>(
        &mut self,
        paths: &[P],
        timestamps: &[i64],
        rows: Vec<Vec<Cell>>,
        types: &[DataType],
    ) -> Result<(), ClientError> {
        self.insert(
            InsertShape::ROW_ALIGNED,
            paths,
            timestamps,
            InsertValues::Rows(rows),
            types,
        )
    }

    pub fn insert_non_aligned_row_records<P: AsRef<str>>(
        &mut self,
        paths: &[P],
        timestamps: &[i64],
        rows: Vec<Vec<Cell>>,
        types: &[DataType],
    ) -> Result<(), ClientError> {
        self.insert(
            InsertShape::ROW_NON_ALIGNED,
            paths,
            timestamps,
            InsertValues::Rows(rows),
            types,
        )
    }

    pub fn insert_column_records<P: AsRef<str>>(
        &mut self,
        paths: &[P],
        timestamps: &[i64],
        columns: Vec<Vec<Cell>>,
        types: &[DataType],
    ) -> Result<(), ClientError> {
        self.insert(
            InsertShape::COLUMN_ALIGNED,
            paths,
            timestamps,
            InsertValues::Columns(columns),
            types,
        )
    }

    pub fn insert_non_aligned_column_records<P: AsRef<str>>(
        &mut self,
        paths: &[P],
        timestamps: &[i64],
        columns: Vec<Vec<Cell>>,
        types: &[DataType],
    ) -> Result<(), ClientError> {
        self.insert(
            InsertShape::COLUMN_NON_ALIGNED,
            paths,
            timestamps,
            InsertValues::Columns(columns),
            types,
        )
    }

    /// Sends a prepared query and decodes its result set.
    pub fn execute_query(
        &mut self,
        spec: &QuerySpec,
        expected: &ExpectedTypes,
    ) -> Result<ResultTable, ClientError> {
        let raw = match self.call(Request::Query(spec.clone()))? {
            ResponseBody::DataSet(raw) => raw,
            other => return Err(unexpected("query", &other)),
        };
        let table = decode(raw, expected).inspect_err(|e| e.log_error())?;
        check_result(spec, &table).inspect_err(|e| e.log_error())?;
        debug!(
            target: "tsdb_session::session",
            shape = spec.shape().name(),
            rows = table.len(),
            series = table.paths().len(),
            "Query decoded"
        );
        Ok(table)
    }

    pub fn query<P: AsRef<str>>(
        &mut self,
        paths: &[P],
        start: i64,
        end: i64,
    ) -> Result<ResultTable, ClientError> {
        let spec = plain_range(paths, start, end).inspect_err(|e| e.log_error())?;
        self.execute_query(&spec, &ExpectedTypes::any())
    }

    pub fn value_filter_query<P: AsRef<str>>(
        &mut self,
        paths: &[P],
        start: i64,
        end: i64,
        filter: &str,
    ) -> Result<ResultTable, ClientError> {
        let spec = filtered_range(paths, start, end, filter).inspect_err(|e| e.log_error())?;
        self.execute_query(&spec, &ExpectedTypes::any())
    }

    pub fn aggregate_query<P: AsRef<str>>(
        &mut self,
        paths: &[P],
        start: i64,
        end: i64,
        kind: AggregateKind,
    ) -> Result<ResultTable, ClientError> {
        let spec = aggregate(paths, start, end, kind).inspect_err(|e| e.log_error())?;
        self.execute_query(&spec, &ExpectedTypes::any())
    }

    pub fn downsample_query<P: AsRef<str>>(
        &mut self,
        paths: &[P],
        start: i64,
        end: i64,
        kind: AggregateKind,
        interval: i64,
    ) -> Result<ResultTable, ClientError> {
        let spec =
            downsample(paths, start, end, kind, interval).inspect_err(|e| e.log_error())?;
        self.execute_query(&spec, &ExpectedTypes::any())
    }

    pub fn last_query<P: AsRef<str>>(
        &mut self,
        paths: &[P],
        limit: i64,
    ) -> Result<ResultTable, ClientError> {
        let spec = last_value(paths, limit).inspect_err(|e| e.log_error())?;
        self.execute_query(&spec, &ExpectedTypes::any())
    }

    pub fn list_time_series(&mut self) -> Result<Vec<SeriesDescriptor>, ClientError> {
        match self.call(Request::ListSeries)? {
            ResponseBody::Series(series) => Ok(series),
            other => Err(unexpected("list_series", &other)),
        }
    }

    pub fn replica_num(&mut self) -> Result<u32, ClientError> {
        match self.call(Request::ReplicaNum)? {
            ResponseBody::ReplicaNum(n) => Ok(n),
            other => Err(unexpected("replica_num", &other)),
        }
    }

    pub fn cluster_info(&mut self) -> Result<ClusterInfo, ClientError> {
        match self.call(Request::ClusterInfo)? {
            ResponseBody::ClusterInfo(info) => Ok(info),
            other => Err(unexpected("cluster_info", &other)),
        }
    }

    fn call(&mut self, request: Request) -> Result<ResponseBody, ClientError> {
        let name = request.name();
        let bytes = encode_request(self.handle.id(), &request)?;
        debug!(
            target: "tsdb_session::session",
            session = self.handle.id(),
            request = name,
            bytes = bytes.len(),
            "Dispatching request"
        );
        self.transport
            .send(&self.handle, bytes)
            .and_then(|reply| decode_response(&reply))
            .and_then(|response| response.into_body())
            .inspect_err(|e| e.log_error())
    }
}

fn unexpected(request: &str, body: &ResponseBody) -> ClientError {
    warn!(
        target: "tsdb_session::session",
        "Unexpected {} body in reply to {}", body.kind(), request
    );
    ClientError::MalformedResponse(format!(
        "unexpected {} body in reply to {}",
        body.kind(),
        request
    ))
}

/// Cross-checks a decoded table against the query that produced it.
fn check_result(spec: &QuerySpec, table: &ResultTable) -> Result<(), ClientError> {
    if let Some(path) = table.paths().iter().find(|p| !is_selected(spec.paths(), p)) {
        return Err(ClientError::MalformedResponse(format!(
            "series '{path}' was not selected"
        )));
    }

    match spec.shape() {
        QueryShape::Range { start, end } | QueryShape::Filtered { start, end, .. } => {
            if let Some(ts) = table.timestamps().find(|ts| ts < start || ts >= end) {
                return Err(ClientError::MalformedResponse(format!(
                    "timestamp {ts} outside [{start}, {end})"
                )));
            }
        }
        QueryShape::Aggregate { .. } | QueryShape::Downsample { .. } => {
            let count = table.len() as u64;
            if count > spec.bucket_count() {
                return Err(ClientError::MalformedResponse(format!(
                    "{count} rows for {} buckets",
                    spec.bucket_count()
                )));
            }
        }
        QueryShape::Last { limit } => {
            for (idx, path) in table.paths().iter().enumerate() {
                let present = table
                    .rows()
                    .iter()
                    .filter(|row| row.values[idx].is_some())
                    .count() as i64;
                if present > *limit {
                    return Err(ClientError::MalformedResponse(format!(
                        "{present} samples for '{path}' exceed limit {limit}"
                    )));
                }
            }
        }
    }
    Ok(())
}
