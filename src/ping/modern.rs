//! Modern ping client
//!
//! `Unconnected → Connected → HandshakeDone → PingDone → Disconnected`

use std::time::Instant;

use super::packets::{
    decode_handshake_response, decode_pong_response, encode_handshake_request,
    encode_ping_request, Handshake,
};
use crate::clock::{elapsed_millis, unix_millis};
use crate::config::ClientConfig;
use crate::error::{McError, Result};
use crate::transport::{write_request, Link, StreamTransport, TcpTransport};

/// Progress of a modern ping session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingState {
    Unconnected,
    Connected,
    HandshakeDone,
    PingDone,
    Disconnected,
}

/// Server List Ping client (1.7+)
pub struct PingClient<S = TcpTransport> {
    hostname: String,
    port: u16,
    config: ClientConfig,
    link: Link<S>,
    state: PingState,
}

impl PingClient {
    /// Client that dials TCP on [`connect`](Self::connect)
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self::detached(hostname, port)
    }

    /// Dial the server
    pub fn connect(&mut self) -> Result<()> {
        self.link.ensure_unconnected()?;
        let transport = TcpTransport::dial(&self.hostname, self.port, &self.config)?;
        self.connect_with(transport)
    }
}

impl<S: StreamTransport> PingClient<S> {
    /// Client whose transport is supplied later through [`connect_with`](Self::connect_with)
    pub fn detached(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            config: ClientConfig::default(),
            link: Link::Unconnected,
            state: PingState::Unconnected,
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Install an established transport
    pub fn connect_with(&mut self, transport: S) -> Result<()> {
        self.link.establish(transport)?;
        self.state = PingState::Connected;
        tracing::debug!("ping client connected to {}:{}", self.hostname, self.port);
        Ok(())
    }

    pub fn state(&self) -> PingState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    /// Send the handshake + status request and decode the status properties
    pub fn handshake(&mut self) -> Result<Handshake> {
        let request = encode_handshake_request(&self.hostname, self.port);
        let read_timeout = self.config.read_timeout();

        let transport = self.link.get()?;
        write_request(transport, &request)?;
        transport.set_read_timeout(read_timeout)?;
        let response = decode_handshake_response(transport)?;

        self.state = PingState::HandshakeDone;
        tracing::debug!("status received with {} properties", response.properties.len());
        Ok(response.handshake())
    }

    /// Latency probe, valid once the handshake is done.
    ///
    /// Returns `now - echoed timestamp` in milliseconds.
    pub fn ping(&mut self) -> Result<i64> {
        if self.state != PingState::HandshakeDone {
            return Err(match self.link.get() {
                Ok(_) => McError::HandshakeRequired("ping"),
                Err(e) => e,
            });
        }

        let request = encode_ping_request(unix_millis());
        let read_timeout = self.config.read_timeout();

        let transport = self.link.get()?;
        write_request(transport, &request)?;
        transport.set_read_timeout(read_timeout)?;
        let pong = decode_pong_response(transport)?;

        self.state = PingState::PingDone;
        Ok(unix_millis() - pong.payload)
    }

    /// Handshake then latency probe.
    ///
    /// Some servers answer the probe with a second status frame instead of a
    /// pong. That packet-type mismatch is ignored: the status is still returned,
    /// with the handshake round trip as latency.
    /// The state then stays at [`PingState::HandshakeDone`], so a later
    /// [`ping`](Self::ping) sends a fresh probe.
    pub fn status(&mut self) -> Result<(Handshake, i64)> {
        let start = Instant::now();
        let handshake = self.handshake()?;
        let handshake_rtt = elapsed_millis(start);

        let latency = match self.ping() {
            Ok(latency) => latency,
            Err(e @ McError::InvalidPacketType { .. }) => {
                tracing::warn!(
                    "{}:{} answered the ping probe with another packet ({}), keeping status",
                    self.hostname,
                    self.port,
                    e
                );
                handshake_rtt
            }
            Err(e) => return Err(e),
        };

        Ok((handshake, latency))
    }

    /// Close the connection. The handle is released even if closing fails.
    pub fn disconnect(&mut self) -> Result<()> {
        let result = self.link.release();
        if !matches!(self.link, Link::Unconnected) {
            self.state = PingState::Disconnected;
        }
        result
    }
}
