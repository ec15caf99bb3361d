use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

use crate::command::types::QuerySpec;
use crate::engine::core::write::EncodedBatch;
use crate::engine::errors::ClientError;
use crate::shared::response::Response;

/// Upper bound on a single frame unless configured otherwise.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 64 * 1024 * 1024;

/// Session id carried by requests sent before a session exists.
pub const NO_SESSION: u64 = 0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Request {
    Open { username: String, password: String },
    Close,
    Insert(EncodedBatch),
    Query(QuerySpec),
    ListSeries,
    ReplicaNum,
    ClusterInfo,
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::Open { .. } => "open",
            Request::Close => "close",
            Request::Insert(_) => "insert",
            Request::Query(_) => "query",
            Request::ListSeries => "list_series",
            Request::ReplicaNum => "replica_num",
            Request::ClusterInfo => "cluster_info",
        }
    }
}

/// A request tagged with the session it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestFrame {
    pub session_id: u64,
    pub request: Request,
}

pub fn encode_request(session_id: u64, request: &Request) -> Result<Vec<u8>, ClientError> {
    bincode::serialize(&RequestFrame {
        session_id,
        request: request.clone(),
    })
    .map_err(|e| ClientError::InvalidArgument(format!("failed to encode request: {e}")))
}

pub fn decode_request(bytes: &[u8]) -> Result<RequestFrame, ClientError> {
    bincode::deserialize(bytes)
        .map_err(|e| ClientError::InvalidArgument(format!("undecodable request: {e}")))
}

pub fn encode_response(response: &Response) -> Result<Vec<u8>, ClientError> {
    bincode::serialize(response)
        .map_err(|e| ClientError::InvalidArgument(format!("failed to encode response: {e}")))
}

pub fn decode_response(bytes: &[u8]) -> Result<Response, ClientError> {
    bincode::deserialize(bytes).map_err(|e| {
        warn!(target: "tsdb_session::protocol", "Undecodable response: {}", e);
        ClientError::MalformedResponse(format!("undecodable response: {e}"))
    })
}

/// Writes `payload` behind a big-endian u32 length prefix.
pub async fn write_frame<W>(
    writer: &mut W,
    payload: &[u8],
    max_frame_bytes: usize,
) -> Result<(), ClientError>
where
    W: AsyncWrite + Unpin,
{
    if payload.len() > max_frame_bytes || payload.len() > u32::MAX as usize {
        return Err(ClientError::TransportError(format!(
            "frame of {} bytes exceeds limit of {} bytes",
            payload.len(),
            max_frame_bytes
        )));
    }
    writer.write_all(&(payload.len() as u32).to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one length-prefixed frame. A clean end of stream before the prefix
/// yields `None`; a stream cut inside a frame is a transport error.
pub async fn read_frame<R>(
    reader: &mut R,
    max_frame_bytes: usize,
) -> Result<Option<Vec<u8>>, ClientError>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_be_bytes(len_buf) as usize;
    if len > max_frame_bytes {
        warn!(
            target: "tsdb_session::protocol",
            "Refusing frame of {} bytes (limit {})", len, max_frame_bytes
        );
        return Err(ClientError::TransportError(format!(
            "frame of {len} bytes exceeds limit of {max_frame_bytes} bytes"
        )));
    }

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).await?;
    Ok(Some(buf))
}
