//! Query Module
//!
//! The UT3-derived Query protocol over UDP.
//!
//! ## Exchanges
//! ```text
//! handshake  → FE FD | 09 | session (4)
//!            ← 09 | session (4) | challenge token as decimal cstring
//! basic stat → FE FD | 00 | session (4) | token (4)
//!            ← 00 | session (4) | motd, gametype, map, numplayers, maxplayers
//!              (cstrings) | host port (LE16) | host ip (cstring)
//! full stat  → basic stat request + 4 zero bytes
//!            ← 00 | session (4) | marker (11) | key/value cstrings until ""
//!              | marker (10) | player cstrings until ""
//! ```

mod client;
mod packets;

use std::time::Instant;

pub use client::QueryClient;
pub use packets::{
    decode_basic_stat_response, decode_full_stat_response, decode_handshake_response,
    encode_basic_stat_request, encode_full_stat_request, encode_handshake_request, BasicStat,
    BasicStatResponse, FullStat, FullStatResponse, QueryHandshakeResponse, QUERY_MAGIC,
};

use crate::clock::elapsed_millis;
use crate::config::ClientConfig;
use crate::error::Result;

/// Basic stat of a server and the stat round trip in milliseconds
pub fn query_basic(hostname: &str, port: u16) -> Result<(BasicStat, i64)> {
    query_basic_with(hostname, port, &ClientConfig::default())
}

pub fn query_basic_with(
    hostname: &str,
    port: u16,
    config: &ClientConfig,
) -> Result<(BasicStat, i64)> {
    let mut client = QueryClient::new(hostname, port).with_config(config.clone());
    client.connect()?;
    let token = client.handshake()?;
    let start = Instant::now();
    let stat = client.basic_stat(token)?;
    let latency = elapsed_millis(start);
    client.disconnect()?;
    Ok((stat, latency))
}

/// Full stat of a server and the stat round trip in milliseconds
pub fn query_full(hostname: &str, port: u16) -> Result<(FullStat, i64)> {
    query_full_with(hostname, port, &ClientConfig::default())
}

pub fn query_full_with(
    hostname: &str,
    port: u16,
    config: &ClientConfig,
) -> Result<(FullStat, i64)> {
    let mut client = QueryClient::new(hostname, port).with_config(config.clone());
    client.connect()?;
    let token = client.handshake()?;
    let start = Instant::now();
    let stat = client.full_stat(token)?;
    let latency = elapsed_millis(start);
    client.disconnect()?;
    Ok((stat, latency))
}
