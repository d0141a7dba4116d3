//! Bedrock Module
//!
//! Raknet unconnected ping/pong, answered by Bedrock edition servers.
//!
//! ## Exchange
//! ```text
//! → 0x01 | timestamp (BE64) | magic (16) | client GUID (8)
//! ← 0x1C | timestamp (BE64) | server GUID (BE64) | magic (16) | status string
//! ```
//! The status string is `;`-separated:
//! `edition;motd;protocol;version;online;max;server id;level;game mode;
//! game mode id;ipv4 port;ipv6 port[;extra]`
//!
//! Two request variants exist. `ping` sends a random client GUID and reads the
//! status with Raknet string framing (BE16 length). `stat` sends a fixed GUID
//! and reads the status with a varint length, after one framing byte.

mod client;
mod packets;

pub use client::BedrockClient;
pub use packets::{
    decode_unconnected_pong, encode_unconnected_ping, parse_status, BedrockPong, BedrockVariant,
    UnconnectedPongResponse, RAKNET_MAGIC, STAT_CLIENT_GUID, UNCONNECTED_PING_ID,
    UNCONNECTED_PONG_ID,
};

use crate::config::ClientConfig;
use crate::error::Result;

/// Unconnected ping with a random client GUID
pub fn ping(hostname: &str, port: u16) -> Result<(BedrockPong, i64)> {
    ping_with(hostname, port, BedrockVariant::Ping, &ClientConfig::default())
}

/// Compatibility stat request with the fixed client GUID
pub fn stat(hostname: &str, port: u16) -> Result<(BedrockPong, i64)> {
    ping_with(hostname, port, BedrockVariant::Stat, &ClientConfig::default())
}

pub fn ping_with(
    hostname: &str,
    port: u16,
    variant: BedrockVariant,
    config: &ClientConfig,
) -> Result<(BedrockPong, i64)> {
    let mut client = BedrockClient::new(hostname, port).with_config(config.clone());
    client.connect()?;
    let result = client.ping_variant(variant)?;
    client.disconnect()?;
    Ok(result)
}
