use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::engine::errors::ClientError;
use crate::frontend::protocol::{RequestFrame, decode_request, encode_response};
use crate::frontend::transport::{Credentials, Endpoint, SessionHandle, Transport};
use crate::shared::response::Response;

/// Shared view of what a `ScriptedTransport` saw, readable after the
/// transport has moved into a session.
#[derive(Clone, Default)]
pub struct TransportLog {
    inner: Arc<Mutex<LogState>>,
}

#[derive(Default)]
struct LogState {
    sent: Vec<RequestFrame>,
    credentials: Option<Credentials>,
    closed: bool,
}

impl TransportLog {
    pub fn sent(&self) -> Vec<RequestFrame> {
        self.inner.lock().unwrap().sent.clone()
    }

    pub fn sent_count(&self) -> usize {
        self.inner.lock().unwrap().sent.len()
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.inner.lock().unwrap().credentials.clone()
    }

    pub fn closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }
}

/// In-memory transport replaying canned responses in order.
pub struct ScriptedTransport {
    session_id: u64,
    open_error: Option<ClientError>,
    replies: VecDeque<Result<Vec<u8>, ClientError>>,
    log: TransportLog,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            session_id: 7,
            open_error: None,
            replies: VecDeque::new(),
            log: TransportLog::default(),
        }
    }

    pub fn with_session_id(mut self, id: u64) -> Self {
        self.session_id = id;
        self
    }

    pub fn failing_open(mut self, err: ClientError) -> Self {
        self.open_error = Some(err);
        self
    }

    pub fn reply(mut self, response: Response) -> Self {
        let bytes = encode_response(&response).expect("encode scripted response");
        self.replies.push_back(Ok(bytes));
        self
    }

    pub fn reply_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.replies.push_back(Ok(bytes));
        self
    }

    pub fn fail_send(mut self, err: ClientError) -> Self {
        self.replies.push_back(Err(err));
        self
    }

    pub fn log(&self) -> TransportLog {
        self.log.clone()
    }
}

impl Transport for ScriptedTransport {
    fn open(
        &mut self,
        endpoint: &Endpoint,
        credentials: &Credentials,
    ) -> Result<SessionHandle, ClientError> {
        self.log.inner.lock().unwrap().credentials = Some(credentials.clone());
        match self.open_error.take() {
            Some(err) => Err(err),
            None => Ok(SessionHandle::new(self.session_id, endpoint.clone())),
        }
    }

    fn send(&mut self, handle: &SessionHandle, request: Vec<u8>) -> Result<Vec<u8>, ClientError> {
        let frame = decode_request(&request)?;
        assert_eq!(frame.session_id, handle.id(), "frame tagged with foreign session");
        self.log.inner.lock().unwrap().sent.push(frame);
        self.replies
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::TransportError("no scripted reply".into())))
    }

    fn close(&mut self, _handle: SessionHandle) -> Result<(), ClientError> {
        self.log.inner.lock().unwrap().closed = true;
        Ok(())
    }
}
