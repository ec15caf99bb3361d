pub mod protocol;
pub mod transport;

pub use protocol::{Request, RequestFrame};
pub use transport::{Credentials, Endpoint, SessionHandle, TcpTransport, Transport};

#[cfg(test)]
mod transport_test;
