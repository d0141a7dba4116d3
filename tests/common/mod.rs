//! Scripted transports shared by the protocol tests
//!
//! Responses are queued up front; everything the client writes is captured
//! behind a shared mutex so the test can inspect it after the transport has
//! been moved into a client.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{self, Cursor, Read, Write};
use std::sync::Arc;
use std::time::Duration;

use mcwire::transport::{DatagramTransport, Transport};
use parking_lot::Mutex;

/// Stream transport replaying canned bytes
pub struct ScriptedStream {
    input: Cursor<Vec<u8>>,
    written: Arc<Mutex<Vec<u8>>>,
    closed: Arc<Mutex<bool>>,
    /// Max bytes returned per read, to exercise partial reads
    chunk: usize,
}

impl ScriptedStream {
    pub fn new(input: Vec<u8>) -> Self {
        Self {
            input: Cursor::new(input),
            written: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(Mutex::new(false)),
            chunk: usize::MAX,
        }
    }

    /// Return at most `chunk` bytes per read call
    pub fn chunked(mut self, chunk: usize) -> Self {
        self.chunk = chunk;
        self
    }

    pub fn written(&self) -> Arc<Mutex<Vec<u8>>> {
        self.written.clone()
    }

    pub fn closed(&self) -> Arc<Mutex<bool>> {
        self.closed.clone()
    }
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let limit = buf.len().min(self.chunk);
        self.input.read(&mut buf[..limit])
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for ScriptedStream {
    fn set_read_timeout(&mut self, _timeout: Option<Duration>) -> io::Result<()> {
        Ok(())
    }

    fn set_write_timeout(&mut self, _timeout: Option<Duration>) -> io::Result<()> {
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        *self.closed.lock() = true;
        Ok(())
    }
}

/// Datagram transport answering each exchange with the next queued datagram
pub struct ScriptedDatagram {
    responses: VecDeque<Vec<u8>>,
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl ScriptedDatagram {
    pub fn new(responses: Vec<Vec<u8>>) -> Self {
        Self {
            responses: responses.into(),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn sent(&self) -> Arc<Mutex<Vec<Vec<u8>>>> {
        self.sent.clone()
    }
}

impl DatagramTransport for ScriptedDatagram {
    fn exchange(&mut self, request: &[u8]) -> io::Result<Vec<u8>> {
        self.sent.lock().push(request.to_vec());
        self.responses
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::TimedOut, "no scripted response"))
    }
}

impl Transport for ScriptedDatagram {
    fn set_read_timeout(&mut self, _timeout: Option<Duration>) -> io::Result<()> {
        Ok(())
    }

    fn set_write_timeout(&mut self, _timeout: Option<Duration>) -> io::Result<()> {
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// Byte builders
// =============================================================================

pub fn uvarint(mut value: u64) -> Vec<u8> {
    let mut out = Vec::new();
    while value >= 0x80 {
        out.push((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
    out
}

/// Modern ping frame: length, packet id, body
pub fn mc_frame(packet_id: u64, body: &[u8]) -> Vec<u8> {
    let mut payload = uvarint(packet_id);
    payload.extend_from_slice(body);
    let mut out = uvarint(payload.len() as u64);
    out.extend_from_slice(&payload);
    out
}

/// Modern status frame carrying `json`
pub fn status_frame(json: &str) -> Vec<u8> {
    let mut body = uvarint(json.len() as u64);
    body.extend_from_slice(json.as_bytes());
    mc_frame(0, &body)
}

/// RCON packet as sent by a server
pub fn rcon_packet(request_id: i32, packet_type: i32, payload: &str) -> Vec<u8> {
    rcon_packet_bytes(request_id, packet_type, payload.as_bytes())
}

/// RCON packet with an arbitrary payload, not necessarily valid UTF-8
pub fn rcon_packet_bytes(request_id: i32, packet_type: i32, payload: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&request_id.to_le_bytes());
    body.extend_from_slice(&packet_type.to_le_bytes());
    body.extend_from_slice(payload);
    body.extend_from_slice(&[0, 0]);
    let mut out = (body.len() as u32).to_le_bytes().to_vec();
    out.extend_from_slice(&body);
    out
}

pub fn utf16_be(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(u16::to_be_bytes).collect()
}
