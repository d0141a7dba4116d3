//! RCON packets

use std::io::Read;

use bytes::{BufMut, BytesMut};

use crate::codec::{WireRead, WireWrite};
use crate::error::{McError, Result};

pub const LOGIN_REQUEST_TYPE: i32 = 3;
pub const COMMAND_REQUEST_TYPE: i32 = 2;
pub const RESPONSE_VALUE_TYPE: i32 = 0;
pub const INVALID_REQUEST_TYPE: i32 = 4;

/// Longest command the server accepts
pub const MAX_COMMAND_LEN: usize = 1446;

/// Payloads this long may continue in following packets
pub const FRAGMENT_THRESHOLD: usize = 4096;

/// Reply to a type 4 request, marks the end of a fragmented response
pub const UNKNOWN_REQUEST_REPLY: &str = "Unknown request 4";

/// Cap on the declared packet length
pub const MAX_PACKET_LEN: usize = 1 << 20;

// request id + type + payload terminator + pad
const MIN_PACKET_LEN: usize = 10;

/// One RCON packet, padding included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RconPacket {
    pub length: u32,
    pub request_id: i32,
    pub packet_type: i32,
    /// Raw payload bytes, fragments of one response may split a UTF-8 sequence
    pub payload: Vec<u8>,
    pub padding: u8,
}

/// Length-prefixed packet with a null-terminated payload and a pad byte
pub fn encode_packet(request_id: i32, packet_type: i32, payload: &str) -> BytesMut {
    let mut body = BytesMut::with_capacity(payload.len() + MIN_PACKET_LEN);
    body.put_i32_le(request_id);
    body.put_i32_le(packet_type);
    body.put_cstring(payload);
    body.put_u8(0);

    let mut out = BytesMut::with_capacity(body.len() + 4);
    out.put_u32_le(body.len() as u32);
    out.put_slice(&body);
    out
}

pub fn decode_packet<R: Read + ?Sized>(reader: &mut R) -> Result<RconPacket> {
    let length = reader.read_u32_le()?;
    let len = length as usize;
    if len > MAX_PACKET_LEN {
        return Err(McError::FrameTooLarge {
            size: len,
            max: MAX_PACKET_LEN,
        });
    }
    if len < MIN_PACKET_LEN {
        return Err(McError::MalformedPacket(format!(
            "rcon packet of {} bytes is shorter than {}",
            len, MIN_PACKET_LEN
        )));
    }

    let body = reader.read_bytes(len)?;
    let mut cursor = body.as_slice();
    let request_id = cursor.read_i32_le()?;
    let packet_type = cursor.read_i32_le()?;
    let payload = cursor.read_cstring_bytes()?;
    let padding = cursor.read_u8()?;

    Ok(RconPacket {
        length,
        request_id,
        packet_type,
        payload,
        padding,
    })
}
