//! Legacy ping
//!
//! One response decoder shared by the bare `FE 01` request and the 1.6.4
//! `MC|PingHost` plugin-message request.
//!
//! ## Response payload (UTF-16BE)
//! ```text
//! post-1.3: §1\0 <protocol> \0 <version> \0 <motd> \0 <online> \0 <max>
//! pre-1.3:  <motd> § <online> § <max>
//! ```

use std::io::Read;
use std::time::Instant;

use bytes::{BufMut, BytesMut};
use serde::Serialize;

use crate::clock::elapsed_millis;
use crate::codec::{decode_utf16_be, encode_utf16_be, WireRead};
use crate::config::ClientConfig;
use crate::error::{McError, Result};
use crate::transport::{write_request, Link, StreamTransport, TcpTransport};

/// Bytes opening every legacy request
pub const LEGACY_PING_REQUEST: [u8; 2] = [0xFE, 0x01];

/// Plugin message packet carrying `MC|PingHost`
pub const PLUGIN_MESSAGE_ID: u8 = 0xFA;

/// Kick packet id the server answers with
pub const KICK_PACKET_ID: u8 = 0xFF;

/// Payload prefix of post-1.3 responses: `§1` then an empty field
pub const POST_1_3_MARKER: [u8; 6] = [0x00, 0xA7, 0x00, 0x31, 0x00, 0x00];

const POST_1_3_DELIMITER: [u8; 2] = [0x00, 0x00];
const PRE_1_3_DELIMITER: [u8; 2] = [0x00, 0xA7];

const PING_HOST_CHANNEL: &str = "MC|PingHost";
const PROTOCOL_1_6_4: u8 = 78;

/// Which legacy request to send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyVariant {
    /// `FE 01`
    Plain,
    /// `FE 01` + `MC|PingHost` plugin message (1.6.4)
    PingHost,
}

// =============================================================================
// Records
// =============================================================================

/// Decoded kick packet
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyPingResponse {
    pub packet_id: u8,
    /// Payload length in UTF-16 code units
    pub length: u16,
    /// Only sent by post-1.3 servers
    pub protocol_version: Option<i32>,
    pub minecraft_version: Option<String>,
    pub motd: String,
    pub online_players: i32,
    pub max_players: i32,
}

/// Legacy ping result. Version fields stay at their defaults for pre-1.3 servers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPingInfo {
    pub protocol_version: i32,
    pub minecraft_version: String,
    pub motd: String,
    pub online_players: i32,
    pub max_players: i32,
}

impl LegacyPingResponse {
    pub fn info(self) -> LegacyPingInfo {
        LegacyPingInfo {
            protocol_version: self.protocol_version.unwrap_or_default(),
            minecraft_version: self.minecraft_version.unwrap_or_default(),
            motd: self.motd,
            online_players: self.online_players,
            max_players: self.max_players,
        }
    }
}

// =============================================================================
// Encoding / Decoding
// =============================================================================

pub fn encode_legacy_request(hostname: &str, port: u16, variant: LegacyVariant) -> BytesMut {
    let mut out = BytesMut::with_capacity(64);
    out.put_slice(&LEGACY_PING_REQUEST);

    if variant == LegacyVariant::PingHost {
        let channel = encode_utf16_be(PING_HOST_CHANNEL);
        let host = encode_utf16_be(hostname);

        out.put_u8(PLUGIN_MESSAGE_ID);
        out.put_u16((channel.len() / 2) as u16);
        out.put_slice(&channel);
        // protocol byte + host length + host + port
        out.put_u16((7 + host.len()) as u16);
        out.put_u8(PROTOCOL_1_6_4);
        out.put_u16((host.len() / 2) as u16);
        out.put_slice(&host);
        out.put_u32(u32::from(port));
    }

    out
}

/// Split on a 2-byte delimiter aligned to UTF-16 code units
fn split_fields<'a>(data: &'a [u8], delimiter: &[u8; 2]) -> Vec<&'a [u8]> {
    let mut fields = Vec::with_capacity(5);
    let mut start = 0;
    let mut i = 0;
    while i + 2 <= data.len() {
        if &data[i..i + 2] == delimiter {
            fields.push(&data[start..i]);
            start = i + 2;
        }
        i += 2;
    }
    fields.push(&data[start..]);
    fields
}

fn parse_number(field: &[u8], name: &'static str) -> Result<i32> {
    let text = decode_utf16_be(field);
    text.parse().map_err(|_| McError::InvalidNumber { field: name, value: text })
}

pub fn decode_legacy_response<R: Read + ?Sized>(reader: &mut R) -> Result<LegacyPingResponse> {
    let packet_id = reader.read_u8()?;
    if packet_id != KICK_PACKET_ID {
        return Err(McError::InvalidPacketType {
            expected: i64::from(KICK_PACKET_ID),
            actual: i64::from(packet_id),
        });
    }

    let length = reader.read_u16_be()?;
    let raw = reader.read_bytes(usize::from(length) * 2)?;

    let post_1_3 = raw.starts_with(&POST_1_3_MARKER);
    let fields = if post_1_3 {
        split_fields(&raw[POST_1_3_MARKER.len()..], &POST_1_3_DELIMITER)
    } else {
        split_fields(&raw, &PRE_1_3_DELIMITER)
    };

    let expected = if post_1_3 { 5 } else { 3 };
    if fields.len() != expected {
        return Err(McError::MalformedPacket(format!(
            "legacy ping: expected {} fields, got {}",
            expected,
            fields.len()
        )));
    }

    // The last three fields are common to both formats
    let n = fields.len();
    let motd = decode_utf16_be(fields[n - 3]);
    let online_players = parse_number(fields[n - 2], "online players")?;
    let max_players = parse_number(fields[n - 1], "max players")?;

    let (protocol_version, minecraft_version) = if post_1_3 {
        (
            Some(parse_number(fields[0], "protocol version")?),
            Some(decode_utf16_be(fields[1])),
        )
    } else {
        (None, None)
    };

    Ok(LegacyPingResponse {
        packet_id,
        length,
        protocol_version,
        minecraft_version,
        motd,
        online_players,
        max_players,
    })
}

// =============================================================================
// Client
// =============================================================================

/// Legacy Server List Ping client
pub struct LegacyPingClient<S = TcpTransport> {
    hostname: String,
    port: u16,
    config: ClientConfig,
    link: Link<S>,
}

impl LegacyPingClient {
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self::detached(hostname, port)
    }

    pub fn connect(&mut self) -> Result<()> {
        self.link.ensure_unconnected()?;
        let transport = TcpTransport::dial(&self.hostname, self.port, &self.config)?;
        self.connect_with(transport)
    }
}

impl<S: StreamTransport> LegacyPingClient<S> {
    pub fn detached(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            config: ClientConfig::default(),
            link: Link::Unconnected,
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn connect_with(&mut self, transport: S) -> Result<()> {
        self.link.establish(transport)?;
        tracing::debug!("legacy ping client connected to {}:{}", self.hostname, self.port);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    /// Bare `FE 01` ping, returns the info and the round trip in milliseconds
    pub fn ping(&mut self) -> Result<(LegacyPingInfo, i64)> {
        let start = Instant::now();
        let info = self.ping_variant(LegacyVariant::Plain)?;
        Ok((info, elapsed_millis(start)))
    }

    /// 1.6.4 `MC|PingHost` ping
    pub fn ping_1_6_4(&mut self) -> Result<(LegacyPingInfo, i64)> {
        let start = Instant::now();
        let info = self.ping_variant(LegacyVariant::PingHost)?;
        Ok((info, elapsed_millis(start)))
    }

    pub fn ping_variant(&mut self, variant: LegacyVariant) -> Result<LegacyPingInfo> {
        let request = encode_legacy_request(&self.hostname, self.port, variant);
        let read_timeout = self.config.read_timeout();

        let transport = self.link.get()?;
        write_request(transport, &request)?;
        transport.set_read_timeout(read_timeout)?;
        let response = decode_legacy_response(transport)?;

        tracing::debug!(
            "legacy ping answered ({} format)",
            if response.protocol_version.is_some() { "post-1.3" } else { "pre-1.3" }
        );
        Ok(response.info())
    }

    pub fn disconnect(&mut self) -> Result<()> {
        self.link.release()
    }
}
