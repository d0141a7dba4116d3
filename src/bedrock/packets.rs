//! Unconnected ping/pong datagrams

use std::io::Read;
use std::str::FromStr;

use bytes::{BufMut, BytesMut};
use serde::Serialize;

use crate::codec::WireRead;
use crate::error::{McError, Result};

pub const UNCONNECTED_PING_ID: u8 = 0x01;
pub const UNCONNECTED_PONG_ID: u8 = 0x1C;

/// Offline message magic
pub const RAKNET_MAGIC: [u8; 16] = [
    0x00, 0xFF, 0xFF, 0x00, 0xFE, 0xFE, 0xFE, 0xFE, 0xFD, 0xFD, 0xFD, 0xFD, 0x12, 0x34, 0x56,
    0x78,
];

/// Client GUID sent by the stat variant (2, little-endian)
pub const STAT_CLIENT_GUID: [u8; 8] = 2u64.to_le_bytes();

/// Request/response framing variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BedrockVariant {
    /// Random client GUID, BE16-length status string
    Ping,
    /// Fixed client GUID, varint-length status string
    Stat,
}

/// Decoded unconnected pong
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnconnectedPongResponse {
    pub packet_id: u8,
    /// Echo of the request timestamp
    pub timestamp: u64,
    pub server_guid: u64,
    pub magic: [u8; 16],
    pub status: String,
}

/// Server status. Fields missing from a short status string keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BedrockPong {
    /// `MCPE` or `MCEE`
    pub edition: String,
    pub motd: String,
    pub protocol_version: i32,
    pub game_version: String,
    pub online_players: i32,
    pub max_players: i32,
    pub server_id: String,
    pub level_name: String,
    pub game_mode: String,
    pub game_mode_numeric: i32,
    pub ipv4_port: u16,
    pub ipv6_port: u16,
    /// Trailing field some servers append, meaning unknown
    pub extra: String,
}

// =============================================================================
// Encoding / Decoding
// =============================================================================

pub fn encode_unconnected_ping(timestamp: u64, client_guid: [u8; 8]) -> BytesMut {
    let mut out = BytesMut::with_capacity(33);
    out.put_u8(UNCONNECTED_PING_ID);
    out.put_u64(timestamp);
    out.put_slice(&RAKNET_MAGIC);
    out.put_slice(&client_guid);
    out
}

pub fn decode_unconnected_pong<R: Read + ?Sized>(
    reader: &mut R,
    variant: BedrockVariant,
) -> Result<UnconnectedPongResponse> {
    let packet_id = reader.read_u8()?;
    if packet_id != UNCONNECTED_PONG_ID {
        return Err(McError::InvalidPacketType {
            expected: i64::from(UNCONNECTED_PONG_ID),
            actual: i64::from(packet_id),
        });
    }

    let timestamp = reader.read_u64_be()?;
    let server_guid = reader.read_u64_be()?;
    let magic = reader.read_array::<16>()?;
    if magic != RAKNET_MAGIC {
        return Err(McError::BadMagic);
    }

    let status_bytes = match variant {
        BedrockVariant::Ping => {
            let len = reader.read_u16_be()?;
            reader.read_bytes(usize::from(len))?
        }
        BedrockVariant::Stat => {
            // one framing byte precedes the varint length
            reader.read_u8()?;
            let len = reader.read_uvarint()? as usize;
            reader.read_bytes(len)?
        }
    };

    Ok(UnconnectedPongResponse {
        packet_id,
        timestamp,
        server_guid,
        magic,
        status: String::from_utf8_lossy(&status_bytes).into_owned(),
    })
}

fn lenient<T: FromStr + Default>(field: &str, name: &str) -> T {
    if field.is_empty() {
        return T::default();
    }
    field.parse().unwrap_or_else(|_| {
        tracing::debug!("ignoring unparsable bedrock {} {:?}", name, field);
        T::default()
    })
}

/// Map the `;`-separated status string onto its positional fields
pub fn parse_status(status: &str) -> BedrockPong {
    let fields: Vec<&str> = status.split(';').collect();
    let field = |i: usize| fields.get(i).copied().unwrap_or_default();

    BedrockPong {
        edition: field(0).to_string(),
        motd: field(1).to_string(),
        protocol_version: lenient(field(2), "protocol version"),
        game_version: field(3).to_string(),
        online_players: lenient(field(4), "online players"),
        max_players: lenient(field(5), "max players"),
        server_id: field(6).to_string(),
        level_name: field(7).to_string(),
        game_mode: field(8).to_string(),
        game_mode_numeric: lenient(field(9), "game mode id"),
        ipv4_port: lenient(field(10), "ipv4 port"),
        ipv6_port: lenient(field(11), "ipv6 port"),
        extra: field(12).to_string(),
    }
}

impl UnconnectedPongResponse {
    pub fn pong(&self) -> BedrockPong {
        parse_status(&self.status)
    }
}
