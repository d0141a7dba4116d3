//! RCON Module
//!
//! Minecraft's implementation of the Source RCON protocol.
//!
//! ## Packet Format (little-endian)
//! ```text
//! ┌──────────┬──────────────┬──────────┬──────────────────┬─────────┐
//! │ Len (4)  │ Request id(4)│ Type (4) │ Payload + 0x00   │ Pad (1) │
//! └──────────┴──────────────┴──────────┴──────────────────┴─────────┘
//! ```
//!
//! ## Types
//! - 3: login, answered with the request id (or -1 on a wrong password)
//! - 2: command, answered by type 0 packets
//! - 4: invalid, used to detect the end of a fragmented response

mod client;
mod packets;

use std::time::Instant;

pub use client::RconClient;
pub use packets::{
    decode_packet, encode_packet, RconPacket, COMMAND_REQUEST_TYPE, FRAGMENT_THRESHOLD,
    INVALID_REQUEST_TYPE, LOGIN_REQUEST_TYPE, MAX_COMMAND_LEN, MAX_PACKET_LEN,
    RESPONSE_VALUE_TYPE, UNKNOWN_REQUEST_REPLY,
};

use crate::clock::elapsed_millis;
use crate::config::ClientConfig;
use crate::error::{McError, Result};

/// Log in and run one command, returning its output and round trip.
///
/// A wrong password is reported as [`McError::WrongPassword`].
pub fn rcon(hostname: &str, port: u16, password: &str, command: &str) -> Result<(String, i64)> {
    rcon_with(hostname, port, password, command, &ClientConfig::default())
}

pub fn rcon_with(
    hostname: &str,
    port: u16,
    password: &str,
    command: &str,
    config: &ClientConfig,
) -> Result<(String, i64)> {
    let mut client = RconClient::new(hostname, port).with_config(config.clone());
    client.connect()?;

    if !client.authenticate(password)? {
        // The password failure is the error worth reporting
        let _ = client.disconnect();
        return Err(McError::WrongPassword);
    }

    let start = Instant::now();
    let output = client.command(command)?;
    let latency = elapsed_millis(start);
    client.disconnect()?;
    Ok((output, latency))
}
