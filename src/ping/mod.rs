//! Ping Module
//!
//! Server List Ping, in its modern (1.7+) and legacy (pre-1.7) forms.
//!
//! ## Modern frame
//! ```text
//! ┌──────────────┬────────────────┬──────────────────────────┐
//! │ Len (uvarint)│ Id (uvarint)   │         Payload          │
//! └──────────────┴────────────────┴──────────────────────────┘
//! ```
//! - 0x00 handshake: protocol version (varint -1), host, port, next state 1,
//!   immediately followed by an empty 0x00 status request
//! - 0x00 status response: JSON string
//! - 0x01 ping/pong: 64-bit big-endian timestamp
//!
//! ## Legacy exchange
//! Request `FE 01` (optionally followed by an `MC|PingHost` plugin message),
//! response `FF`, UTF-16BE character count, UTF-16BE payload.

mod info;
mod legacy;
mod modern;
mod packets;

use std::time::Instant;

pub use info::{PlayerSample, PlayersInfo, ServerInfo, VersionInfo};
pub use legacy::{
    decode_legacy_response, encode_legacy_request, LegacyPingClient, LegacyPingInfo,
    LegacyPingResponse, LegacyVariant,
};
pub use modern::{PingClient, PingState};
pub use packets::{
    decode_handshake_response, decode_pong_response, encode_handshake_request,
    encode_ping_request, read_frame, Handshake, HandshakeResponse, PongResponse, RawFrame,
    HANDSHAKE_PACKET_ID, MAX_FRAME_LEN, PING_PACKET_ID, UNKNOWN_PROTOCOL_VERSION,
};

use crate::clock::elapsed_millis;
use crate::config::ClientConfig;
use crate::error::Result;

/// Ping a modern server: status properties and latency in milliseconds
pub fn ping(hostname: &str, port: u16) -> Result<(Handshake, i64)> {
    ping_with(hostname, port, &ClientConfig::default())
}

pub fn ping_with(hostname: &str, port: u16, config: &ClientConfig) -> Result<(Handshake, i64)> {
    let mut client = PingClient::new(hostname, port).with_config(config.clone());
    client.connect()?;
    let status = client.status()?;
    client.disconnect()?;
    Ok(status)
}

/// Legacy ping (`FE 01`)
pub fn ping_legacy(hostname: &str, port: u16) -> Result<(LegacyPingInfo, i64)> {
    ping_legacy_with(hostname, port, LegacyVariant::Plain, &ClientConfig::default())
}

/// Legacy ping using the 1.6.4 `MC|PingHost` request
pub fn ping_legacy_164(hostname: &str, port: u16) -> Result<(LegacyPingInfo, i64)> {
    ping_legacy_with(hostname, port, LegacyVariant::PingHost, &ClientConfig::default())
}

pub fn ping_legacy_with(
    hostname: &str,
    port: u16,
    variant: LegacyVariant,
    config: &ClientConfig,
) -> Result<(LegacyPingInfo, i64)> {
    let mut client = LegacyPingClient::new(hostname, port).with_config(config.clone());
    client.connect()?;
    let start = Instant::now();
    let info = client.ping_variant(variant)?;
    let latency = elapsed_millis(start);
    client.disconnect()?;
    Ok((info, latency))
}
