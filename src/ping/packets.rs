//! Modern ping frames
//!
//! Request encoders, frame reader and the raw records decoded from responses.

use std::io::Read;

use bytes::{BufMut, BytesMut};
use serde::Serialize;
use serde_json::{Map, Value};

use super::info::ServerInfo;
use crate::codec::{WireRead, WireWrite};
use crate::error::{McError, Result};

/// Handshake and status packets share id 0
pub const HANDSHAKE_PACKET_ID: u64 = 0;

/// Ping and pong packets
pub const PING_PACKET_ID: u64 = 1;

/// Protocol version sent when the client doesn't know the server's
pub const UNKNOWN_PROTOCOL_VERSION: i32 = -1;

/// Next state requested by the handshake (1 = status)
const STATUS_NEXT_STATE: u64 = 1;

/// Largest frame the game itself accepts (3-byte varint length)
pub const MAX_FRAME_LEN: usize = (1 << 21) - 1;

// =============================================================================
// Raw records
// =============================================================================

/// One length-prefixed frame split into packet id and body
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Declared length (packet id + body)
    pub length: usize,
    pub packet_id: u64,
    pub body: Vec<u8>,
}

/// Status response (packet 0)
#[derive(Debug, Clone)]
pub struct HandshakeResponse {
    pub length: usize,
    pub packet_id: u64,
    pub properties: Map<String, Value>,
}

impl HandshakeResponse {
    pub fn handshake(self) -> Handshake {
        Handshake {
            properties: self.properties,
        }
    }
}

/// Pong response (packet 1)
#[derive(Debug, Clone, Copy)]
pub struct PongResponse {
    pub length: usize,
    pub packet_id: u64,
    /// Timestamp echoed from the ping request (unix millis)
    pub payload: i64,
}

/// Status properties as sent by the server, unknown keys included
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Handshake {
    pub properties: Map<String, Value>,
}

impl Handshake {
    /// Usual fields extracted from the property tree
    pub fn server_info(&self) -> ServerInfo {
        ServerInfo::from_properties(&self.properties)
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Prefix `payload` with its length
fn frame(payload: &[u8]) -> BytesMut {
    let mut out = BytesMut::with_capacity(payload.len() + 3);
    out.put_uvarint(payload.len() as u64);
    out.put_slice(payload);
    out
}

/// Handshake frame immediately followed by the empty status request frame
pub fn encode_handshake_request(hostname: &str, port: u16) -> BytesMut {
    let mut handshake = BytesMut::new();
    handshake.put_uvarint(HANDSHAKE_PACKET_ID);
    handshake.put_varint(UNKNOWN_PROTOCOL_VERSION);
    handshake.put_prefixed_str(hostname);
    handshake.put_u16(port);
    handshake.put_uvarint(STATUS_NEXT_STATE);

    let mut status_request = BytesMut::new();
    status_request.put_uvarint(HANDSHAKE_PACKET_ID);

    let mut out = frame(&handshake);
    out.extend_from_slice(&frame(&status_request));
    out
}

/// Ping frame carrying `timestamp_ms`
pub fn encode_ping_request(timestamp_ms: i64) -> BytesMut {
    let mut ping = BytesMut::with_capacity(9);
    ping.put_uvarint(PING_PACKET_ID);
    ping.put_i64(timestamp_ms);
    frame(&ping)
}

// =============================================================================
// Decoding
// =============================================================================

/// Read one whole frame
pub fn read_frame<R: Read + ?Sized>(reader: &mut R) -> Result<RawFrame> {
    let length = reader.read_uvarint()? as usize;
    if length > MAX_FRAME_LEN {
        return Err(McError::FrameTooLarge {
            size: length,
            max: MAX_FRAME_LEN,
        });
    }

    let data = reader.read_bytes(length)?;
    let mut cursor = data.as_slice();
    let packet_id = cursor.read_uvarint()?;
    tracing::trace!("read frame: id={} length={}", packet_id, length);

    Ok(RawFrame {
        length,
        packet_id,
        body: cursor.to_vec(),
    })
}

fn expect_packet_id(frame: &RawFrame, expected: u64) -> Result<()> {
    if frame.packet_id != expected {
        return Err(McError::InvalidPacketType {
            expected: expected as i64,
            actual: frame.packet_id as i64,
        });
    }
    Ok(())
}

/// Status response: length-prefixed JSON object
pub fn decode_handshake_response<R: Read + ?Sized>(reader: &mut R) -> Result<HandshakeResponse> {
    let frame = read_frame(reader)?;
    expect_packet_id(&frame, HANDSHAKE_PACKET_ID)?;

    let mut body = frame.body.as_slice();
    let json_len = body.read_uvarint()? as usize;
    let json = body.read_bytes(json_len)?;
    let properties: Map<String, Value> = serde_json::from_slice(&json)?;

    Ok(HandshakeResponse {
        length: frame.length,
        packet_id: frame.packet_id,
        properties,
    })
}

/// Pong response: echoed timestamp
pub fn decode_pong_response<R: Read + ?Sized>(reader: &mut R) -> Result<PongResponse> {
    let frame = read_frame(reader)?;
    expect_packet_id(&frame, PING_PACKET_ID)?;

    let payload = frame.body.as_slice().read_u64_be()? as i64;
    Ok(PongResponse {
        length: frame.length,
        packet_id: frame.packet_id,
        payload,
    })
}
