//! Query datagrams

use std::io::Read;

use bytes::{BufMut, BytesMut};
use indexmap::IndexMap;
use serde::Serialize;

use crate::codec::WireRead;
use crate::error::{McError, Result};

/// Magic opening every request
pub const QUERY_MAGIC: u16 = 0xFEFD;

const HANDSHAKE_TYPE: u8 = 9;
const STAT_TYPE: u8 = 0;

const FULL_STAT_REQUEST_PADDING: [u8; 4] = [0; 4];

/// `splitnum\0\x80\0`
pub const KV_SECTION_MARKER: [u8; 11] = *b"splitnum\x00\x80\x00";

/// `\x01player_\0\0`
pub const PLAYER_SECTION_MARKER: [u8; 10] = *b"\x01player_\x00\x00";

// =============================================================================
// Raw records
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryHandshakeResponse {
    pub packet_type: u8,
    pub session_id: u32,
    pub challenge_token: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicStatResponse {
    pub packet_type: u8,
    pub session_id: u32,
    pub motd: String,
    pub game_type: String,
    pub map: String,
    pub num_players: i32,
    pub max_players: i32,
    pub host_port: u16,
    pub host_ip: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullStatResponse {
    pub packet_type: u8,
    pub session_id: u32,
    pub kv_marker: [u8; 11],
    pub properties: IndexMap<String, String>,
    pub player_marker: [u8; 10],
    pub players: Vec<String>,
}

// =============================================================================
// Results
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicStat {
    pub motd: String,
    pub game_type: String,
    pub map: String,
    pub num_players: i32,
    pub max_players: i32,
    pub host_port: u16,
    pub host_ip: String,
}

impl From<BasicStatResponse> for BasicStat {
    fn from(response: BasicStatResponse) -> Self {
        Self {
            motd: response.motd,
            game_type: response.game_type,
            map: response.map,
            num_players: response.num_players,
            max_players: response.max_players,
            host_port: response.host_port,
            host_ip: response.host_ip,
        }
    }
}

/// Server properties in the order the server sent them, and online player names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullStat {
    pub properties: IndexMap<String, String>,
    pub online_players: Vec<String>,
}

impl From<FullStatResponse> for FullStat {
    fn from(response: FullStatResponse) -> Self {
        Self {
            properties: response.properties,
            online_players: response.players,
        }
    }
}

// =============================================================================
// Encoding
// =============================================================================

fn header(packet_type: u8, session_id: u32) -> BytesMut {
    let mut out = BytesMut::with_capacity(15);
    out.put_u16(QUERY_MAGIC);
    out.put_u8(packet_type);
    out.put_u32(session_id);
    out
}

pub fn encode_handshake_request(session_id: u32) -> BytesMut {
    header(HANDSHAKE_TYPE, session_id)
}

pub fn encode_basic_stat_request(session_id: u32, challenge_token: i32) -> BytesMut {
    let mut out = header(STAT_TYPE, session_id);
    out.put_i32(challenge_token);
    out
}

pub fn encode_full_stat_request(session_id: u32, challenge_token: i32) -> BytesMut {
    let mut out = encode_basic_stat_request(session_id, challenge_token);
    out.put_slice(&FULL_STAT_REQUEST_PADDING);
    out
}

// =============================================================================
// Decoding
// =============================================================================

fn read_header<R: Read + ?Sized>(reader: &mut R, expected_type: u8) -> Result<(u8, u32)> {
    let packet_type = reader.read_u8()?;
    if packet_type != expected_type {
        return Err(McError::InvalidPacketType {
            expected: i64::from(expected_type),
            actual: i64::from(packet_type),
        });
    }
    let session_id = reader.read_u32_be()?;
    Ok((packet_type, session_id))
}

fn read_number<R: Read + ?Sized>(reader: &mut R, field: &'static str) -> Result<i32> {
    let text = reader.read_cstring()?;
    text.parse()
        .map_err(|_| McError::InvalidNumber { field, value: text })
}

/// The challenge token travels as a decimal string
pub fn decode_handshake_response<R: Read + ?Sized>(
    reader: &mut R,
) -> Result<QueryHandshakeResponse> {
    let (packet_type, session_id) = read_header(reader, HANDSHAKE_TYPE)?;
    let challenge_token = read_number(reader, "challenge token")?;
    Ok(QueryHandshakeResponse {
        packet_type,
        session_id,
        challenge_token,
    })
}

pub fn decode_basic_stat_response<R: Read + ?Sized>(reader: &mut R) -> Result<BasicStatResponse> {
    let (packet_type, session_id) = read_header(reader, STAT_TYPE)?;
    Ok(BasicStatResponse {
        packet_type,
        session_id,
        motd: reader.read_cstring()?,
        game_type: reader.read_cstring()?,
        map: reader.read_cstring()?,
        num_players: read_number(reader, "numplayers")?,
        max_players: read_number(reader, "maxplayers")?,
        host_port: reader.read_u16_le()?,
        host_ip: reader.read_cstring()?,
    })
}

pub fn decode_full_stat_response<R: Read + ?Sized>(reader: &mut R) -> Result<FullStatResponse> {
    let (packet_type, session_id) = read_header(reader, STAT_TYPE)?;

    // Markers are kept but not compared, servers differ in their padding
    let kv_marker = reader.read_array::<11>()?;

    let mut properties = IndexMap::new();
    loop {
        let key = reader.read_cstring()?;
        if key.is_empty() {
            break;
        }
        let value = reader.read_cstring()?;
        properties.insert(key, value);
    }

    let player_marker = reader.read_array::<10>()?;

    let mut players = Vec::new();
    loop {
        let player = reader.read_cstring()?;
        if player.is_empty() {
            break;
        }
        players.push(player);
    }

    if kv_marker != KV_SECTION_MARKER || player_marker != PLAYER_SECTION_MARKER {
        tracing::debug!("full stat section markers differ from the usual padding");
    }

    Ok(FullStatResponse {
        packet_type,
        session_id,
        kv_marker,
        properties,
        player_marker,
        players,
    })
}
