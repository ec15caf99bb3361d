use std::fmt;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

use crate::engine::errors::ClientError;
use crate::frontend::protocol::{
    NO_SESSION, Request, decode_response, encode_request, read_frame, write_frame,
};
use crate::shared::config::Settings;
use crate::shared::response::ResponseBody;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Token for an authenticated session. Only the transport that issued it
/// accepts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    id: u64,
    endpoint: Endpoint,
}

impl SessionHandle {
    pub fn new(id: u64, endpoint: Endpoint) -> Self {
        Self { id, endpoint }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

/// Moves opaque request bytes to a server and returns the reply bytes.
///
/// Implementations own connection management and authentication. The session
/// layer never looks below this trait.
pub trait Transport {
    fn open(
        &mut self,
        endpoint: &Endpoint,
        credentials: &Credentials,
    ) -> Result<SessionHandle, ClientError>;

    fn send(&mut self, handle: &SessionHandle, request: Vec<u8>) -> Result<Vec<u8>, ClientError>;

    fn close(&mut self, handle: SessionHandle) -> Result<(), ClientError>;
}

/// Blocking TCP transport. Each call drives a private single-threaded tokio
/// runtime to completion.
pub struct TcpTransport {
    runtime: Runtime,
    stream: Option<TcpStream>,
    session_id: Option<u64>,
    timeout: Duration,
    max_frame_bytes: usize,
}

impl TcpTransport {
    pub fn new(timeout: Duration, max_frame_bytes: usize) -> Result<Self, ClientError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            runtime,
            stream: None,
            session_id: None,
            timeout,
            max_frame_bytes,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ClientError> {
        Self::new(
            settings.connection.timeout(),
            settings.protocol.max_frame_bytes,
        )
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn round_trip(&mut self, payload: &[u8]) -> Result<Vec<u8>, ClientError> {
        let timeout = self.timeout;
        let max = self.max_frame_bytes;
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| ClientError::TransportError("not connected".into()))?;

        let result = self.runtime.block_on(async move {
            tokio::time::timeout(timeout, async {
                write_frame(stream, payload, max).await?;
                read_frame(stream, max).await?.ok_or_else(|| {
                    ClientError::TransportError("connection closed by server".into())
                })
            })
            .await
            .map_err(|_| ClientError::TransportError(format!("timed out after {:?}", timeout)))?
        });

        if let Err(e) = &result {
            // The stream position is unknown after a failed exchange.
            warn!(target: "tsdb_session::transport", "Dropping connection: {}", e);
            self.stream = None;
            self.session_id = None;
        }
        result
    }

    fn check_handle(&self, handle: &SessionHandle) -> Result<(), ClientError> {
        match self.session_id {
            Some(id) if id == handle.id() => Ok(()),
            Some(_) => Err(ClientError::InvalidArgument(
                "session handle was not issued by this transport".into(),
            )),
            None => Err(ClientError::TransportError("not connected".into())),
        }
    }
}

impl Transport for TcpTransport {
    fn open(
        &mut self,
        endpoint: &Endpoint,
        credentials: &Credentials,
    ) -> Result<SessionHandle, ClientError> {
        let timeout = self.timeout;
        let addr = (endpoint.host.clone(), endpoint.port);
        let stream = self
            .runtime
            .block_on(async { tokio::time::timeout(timeout, TcpStream::connect(addr)).await })
            .map_err(|_| {
                ClientError::TransportError(format!("connect to {endpoint} timed out"))
            })?
            .map_err(|e| ClientError::TransportError(format!("connect to {endpoint}: {e}")))?;
        stream.set_nodelay(true)?;
        self.stream = Some(stream);

        let hello = encode_request(
            NO_SESSION,
            &Request::Open {
                username: credentials.username.clone(),
                password: credentials.password.clone(),
            },
        )?;
        let reply = self.round_trip(&hello)?;
        match decode_response(&reply).and_then(|response| response.into_body()) {
            Ok(ResponseBody::Session(id)) => {
                self.session_id = Some(id);
                info!(target: "tsdb_session::transport", "Connected to {} as session {}", endpoint, id);
                Ok(SessionHandle::new(id, endpoint.clone()))
            }
            Ok(other) => {
                self.stream = None;
                Err(ClientError::MalformedResponse(format!(
                    "expected a session id, got {}",
                    other.kind()
                )))
            }
            Err(e) => {
                self.stream = None;
                Err(e)
            }
        }
    }

    fn send(&mut self, handle: &SessionHandle, request: Vec<u8>) -> Result<Vec<u8>, ClientError> {
        self.check_handle(handle)?;
        debug!(
            target: "tsdb_session::transport",
            session = handle.id(),
            bytes = request.len(),
            "Sending request"
        );
        self.round_trip(&request)
    }

    fn close(&mut self, handle: SessionHandle) -> Result<(), ClientError> {
        self.check_handle(&handle)?;
        let bye = encode_request(handle.id(), &Request::Close)?;
        let reply = self.round_trip(&bye);

        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = self.runtime.block_on(stream.shutdown()) {
                debug!(target: "tsdb_session::transport", "Shutdown after close failed: {}", e);
            }
        }
        self.session_id = None;

        decode_response(&reply?)?.into_body().map(|_| ())
    }
}
