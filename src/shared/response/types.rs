use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::core::read::RawBatch;
use crate::engine::errors::ClientError;
use crate::session::metadata::{ClusterInfo, SeriesDescriptor};

/// HTTP-style status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    Ok,
    BadRequest,
    Unauthorized,
    NotFound,
    InternalError,
}

impl StatusCode {
    pub fn code(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Unauthorized => 401,
            StatusCode::NotFound => 404,
            StatusCode::InternalError => 500,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Unauthorized => "Unauthorized",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalError => "Internal Error",
        }
    }

    pub fn from_code(code: u16) -> Self {
        match code {
            200 => StatusCode::Ok,
            400 => StatusCode::BadRequest,
            401 | 403 => StatusCode::Unauthorized,
            404 => StatusCode::NotFound,
            _ => StatusCode::InternalError,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResponseBody {
    Empty,
    DataSet(RawBatch),
    Series(Vec<SeriesDescriptor>),
    ReplicaNum(u32),
    ClusterInfo(ClusterInfo),
    Session(u64),
}

impl ResponseBody {
    pub fn kind(&self) -> &'static str {
        match self {
            ResponseBody::Empty => "empty",
            ResponseBody::DataSet(_) => "data set",
            ResponseBody::Series(_) => "series list",
            ResponseBody::ReplicaNum(_) => "replica count",
            ResponseBody::ClusterInfo(_) => "cluster info",
            ResponseBody::Session(_) => "session",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: StatusCode,
    pub message: String,
    pub body: ResponseBody,
}

impl Response {
    pub fn ok(body: ResponseBody) -> Self {
        Self {
            status: StatusCode::Ok,
            message: "OK".to_string(),
            body,
        }
    }

    pub fn error(code: StatusCode, message: impl ToString) -> Self {
        Self {
            status: code,
            message: message.to_string(),
            body: ResponseBody::Empty,
        }
    }

    /// Unwraps the body of a successful response; any other status becomes
    /// the matching `ClientError`.
    pub fn into_body(self) -> Result<ResponseBody, ClientError> {
        match self.status {
            StatusCode::Ok => Ok(self.body),
            StatusCode::Unauthorized => Err(ClientError::AuthError(self.message)),
            status => Err(ClientError::Rejected {
                code: status.code(),
                message: self.message,
            }),
        }
    }
}
