//! Transport Tests
//!
//! These tests verify:
//! - The connection lifecycle shared by every client
//! - TCP and UDP transports over loopback

#[path = "../common/mod.rs"]
mod common;

use std::io::{Read, Write};
use std::net::{TcpListener, UdpSocket};
use std::thread;

use mcwire::transport::{
    write_request, DatagramTransport, Link, TcpTransport, Transport, UdpTransport,
};
use mcwire::{ClientConfig, McError};

use common::ScriptedStream;

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_link_starts_unconnected() {
    let mut link: Link<ScriptedStream> = Link::default();
    assert!(!link.is_connected());
    assert!(matches!(link.get(), Err(McError::NotConnected)));
}

#[test]
fn test_link_establish_twice_fails() {
    let mut link = Link::Unconnected;
    link.establish(ScriptedStream::new(vec![])).unwrap();
    assert!(link.is_connected());

    let err = link.establish(ScriptedStream::new(vec![])).unwrap_err();
    assert!(matches!(err, McError::AlreadyConnected));
    assert!(err.is_connection());
}

#[test]
fn test_link_release_closes_transport() {
    let stream = ScriptedStream::new(vec![]);
    let closed = stream.closed();

    let mut link = Link::Unconnected;
    link.establish(stream).unwrap();
    link.release().unwrap();

    assert!(*closed.lock());
    assert!(!link.is_connected());
}

#[test]
fn test_link_second_release_reports_not_connected() {
    let mut link = Link::Unconnected;
    link.establish(ScriptedStream::new(vec![])).unwrap();
    link.release().unwrap();

    assert!(matches!(link.release().unwrap_err(), McError::NotConnected));
    assert!(matches!(link, Link::Disconnected));
}

#[test]
fn test_link_release_before_connect_keeps_unconnected() {
    let mut link: Link<ScriptedStream> = Link::Unconnected;
    assert!(matches!(link.release().unwrap_err(), McError::NotConnected));
    assert!(matches!(link, Link::Unconnected));

    // still usable
    link.establish(ScriptedStream::new(vec![])).unwrap();
}

#[test]
fn test_link_is_terminal_after_disconnect() {
    let mut link = Link::Unconnected;
    link.establish(ScriptedStream::new(vec![])).unwrap();
    link.release().unwrap();

    let err = link.establish(ScriptedStream::new(vec![])).unwrap_err();
    assert!(matches!(err, McError::ConnectionTerminated));
    assert!(link.ensure_unconnected().is_err());
}

// =============================================================================
// Loopback Tests
// =============================================================================

#[test]
fn test_tcp_transport_roundtrip() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        let mut buf = [0u8; 4];
        socket.read_exact(&mut buf).unwrap();
        socket.write_all(&buf.map(|b| b + 1)).unwrap();
    });

    let mut transport = TcpTransport::dial("127.0.0.1", port, &ClientConfig::default()).unwrap();
    assert!(transport.peer_addr().starts_with("127.0.0.1"));

    write_request(&mut transport, &[1, 2, 3, 4]).unwrap();
    let mut reply = [0u8; 4];
    transport.read_exact(&mut reply).unwrap();
    assert_eq!(reply, [2, 3, 4, 5]);

    transport.close().unwrap();
    server.join().unwrap();
}

#[test]
fn test_tcp_dial_refused_is_transport_error() {
    // Grab a free port, then release it so nothing listens there
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let config = ClientConfig::builder().dial_timeout_ms(1000).build();
    match TcpTransport::dial("127.0.0.1", port, &config) {
        Err(err) => assert!(err.is_transport()),
        Ok(_) => panic!("Expected dial to fail"),
    }
}

#[test]
fn test_udp_transport_single_datagram_exchange() {
    let server = UdpSocket::bind("127.0.0.1:0").unwrap();
    let port = server.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let mut buf = [0u8; 64];
        let (n, peer) = server.recv_from(&mut buf).unwrap();
        let mut reply = buf[..n].to_vec();
        reply.reverse();
        server.send_to(&reply, peer).unwrap();
    });

    let mut transport = UdpTransport::dial("127.0.0.1", port, &ClientConfig::default()).unwrap();
    let reply = transport.exchange(b"abc").unwrap();
    assert_eq!(reply, b"cba");

    handle.join().unwrap();
}
