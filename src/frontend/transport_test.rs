use std::net::TcpListener;
use std::time::Duration;

use crate::engine::errors::ClientError;
use crate::frontend::protocol::DEFAULT_MAX_FRAME_BYTES;
use crate::frontend::transport::{Credentials, Endpoint, SessionHandle, TcpTransport, Transport};

#[test]
fn credentials_debug_hides_password() {
    let creds = Credentials::new("root", "s3cret");
    let rendered = format!("{creds:?}");
    assert!(rendered.contains("root"));
    assert!(!rendered.contains("s3cret"));
}

#[test]
fn endpoint_displays_as_host_port() {
    assert_eq!(Endpoint::new("127.0.0.1", 6888).to_string(), "127.0.0.1:6888");
}

#[test]
fn send_without_open_is_a_transport_error() {
    let mut transport = TcpTransport::new(Duration::from_millis(100), DEFAULT_MAX_FRAME_BYTES).unwrap();
    let handle = SessionHandle::new(1, Endpoint::new("127.0.0.1", 1));
    assert!(matches!(
        transport.send(&handle, vec![1, 2, 3]),
        Err(ClientError::TransportError(_))
    ));
}

#[test]
fn refused_connection_is_a_transport_error() {
    // Bind then drop to find a port nobody listens on.
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let mut transport = TcpTransport::new(Duration::from_millis(500), DEFAULT_MAX_FRAME_BYTES).unwrap();
    let err = transport
        .open(&Endpoint::new("127.0.0.1", port), &Credentials::new("root", "root"))
        .unwrap_err();
    assert!(matches!(err, ClientError::TransportError(_)));
    assert!(!transport.is_connected());
}

#[test]
fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        std::thread::sleep(Duration::from_millis(400));
        drop(stream);
    });

    let mut transport = TcpTransport::new(Duration::from_millis(100), DEFAULT_MAX_FRAME_BYTES).unwrap();
    let err = transport
        .open(&Endpoint::new("127.0.0.1", port), &Credentials::new("root", "root"))
        .unwrap_err();
    match err {
        ClientError::TransportError(msg) => assert!(msg.contains("timed out"), "{msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!transport.is_connected());
    server.join().unwrap();
}

#[test]
fn undecodable_open_reply_drops_the_connection() {
    use std::io::{Read, Write};

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut len = [0u8; 4];
        stream.read_exact(&mut len).unwrap();
        let mut hello = vec![0u8; u32::from_be_bytes(len) as usize];
        stream.read_exact(&mut hello).unwrap();
        stream.write_all(&[0, 0, 0, 2, 1, 2]).unwrap();
        stream.flush().unwrap();
    });

    let mut transport = TcpTransport::new(Duration::from_millis(500), DEFAULT_MAX_FRAME_BYTES).unwrap();
    let err = transport
        .open(&Endpoint::new("127.0.0.1", port), &Credentials::new("root", "root"))
        .unwrap_err();
    assert!(matches!(err, ClientError::MalformedResponse(_)));
    assert!(!transport.is_connected());
    server.join().unwrap();
}
