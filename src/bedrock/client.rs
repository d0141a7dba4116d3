//! Bedrock client

use std::time::Instant;

use rand::RngCore;

use super::packets::{
    decode_unconnected_pong, encode_unconnected_ping, BedrockPong, BedrockVariant,
    STAT_CLIENT_GUID,
};
use crate::clock::{elapsed_millis, unix_millis};
use crate::config::ClientConfig;
use crate::error::{McError, Result};
use crate::ids::{default_id_source, IdSource};
use crate::transport::{DatagramTransport, Link, UdpTransport};

/// Raknet unconnected ping client
pub struct BedrockClient<D = UdpTransport> {
    hostname: String,
    port: u16,
    config: ClientConfig,
    link: Link<D>,
    ids: IdSource,
    client_guid: u64,
}

impl BedrockClient {
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self::detached(hostname, port)
    }

    pub fn connect(&mut self) -> Result<()> {
        self.link.ensure_unconnected()?;
        let transport = UdpTransport::dial(&self.hostname, self.port, &self.config)?;
        self.connect_with(transport)
    }
}

impl<D: DatagramTransport> BedrockClient<D> {
    pub fn detached(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            config: ClientConfig::default(),
            link: Link::Unconnected,
            ids: default_id_source(),
            client_guid: 0,
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the random client GUID generator
    pub fn with_id_source(mut self, ids: IdSource) -> Self {
        self.ids = ids;
        self
    }

    pub fn connect_with(&mut self, transport: D) -> Result<()> {
        self.link.establish(transport)?;
        self.client_guid = self.ids.next_u64();
        tracing::debug!("bedrock client connected to {}:{}", self.hostname, self.port);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    /// Unconnected ping, returns the status and round trip in milliseconds
    pub fn ping(&mut self) -> Result<(BedrockPong, i64)> {
        self.ping_variant(BedrockVariant::Ping)
    }

    /// Compatibility stat request
    pub fn stat(&mut self) -> Result<(BedrockPong, i64)> {
        self.ping_variant(BedrockVariant::Stat)
    }

    pub fn ping_variant(&mut self, variant: BedrockVariant) -> Result<(BedrockPong, i64)> {
        let guid = match variant {
            BedrockVariant::Ping => self.client_guid.to_be_bytes(),
            BedrockVariant::Stat => STAT_CLIENT_GUID,
        };
        let timestamp = unix_millis() as u64;
        let request = encode_unconnected_ping(timestamp, guid);
        let read_timeout = self.config.read_timeout();

        let transport = self.link.get()?;
        transport.set_read_timeout(read_timeout)?;
        let start = Instant::now();
        let response = transport.exchange(&request)?;
        let latency = elapsed_millis(start);

        let pong = decode_unconnected_pong(&mut response.as_slice(), variant)?;
        if pong.timestamp != timestamp {
            if self.config.strict_ids {
                return Err(McError::IdMismatch {
                    expected: timestamp as i64,
                    actual: pong.timestamp as i64,
                });
            }
            tracing::warn!("bedrock pong echoed timestamp {}, sent {}", pong.timestamp, timestamp);
        }

        tracing::debug!("bedrock pong from server guid {:#x}", pong.server_guid);
        Ok((pong.pong(), latency))
    }

    pub fn disconnect(&mut self) -> Result<()> {
        self.link.release()
    }
}
