//! Query client
//!
//! The session id is drawn once at connect time. The challenge token is not
//! stored: it can change during the client's lifetime, so callers pass it to
//! each stat request.

use super::packets::{
    decode_basic_stat_response, decode_full_stat_response, decode_handshake_response,
    encode_basic_stat_request, encode_full_stat_request, encode_handshake_request, BasicStat,
    FullStat,
};
use crate::config::ClientConfig;
use crate::error::{McError, Result};
use crate::ids::{default_id_source, query_session_id, IdSource};
use crate::transport::{DatagramTransport, Link, UdpTransport};

/// Query protocol client
pub struct QueryClient<D = UdpTransport> {
    hostname: String,
    port: u16,
    config: ClientConfig,
    link: Link<D>,
    ids: IdSource,
    session_id: u32,
}

impl QueryClient {
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self::detached(hostname, port)
    }

    pub fn connect(&mut self) -> Result<()> {
        self.link.ensure_unconnected()?;
        let transport = UdpTransport::dial(&self.hostname, self.port, &self.config)?;
        self.connect_with(transport)
    }
}

impl<D: DatagramTransport> QueryClient<D> {
    pub fn detached(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            config: ClientConfig::default(),
            link: Link::Unconnected,
            ids: default_id_source(),
            session_id: 0,
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the random session id generator
    pub fn with_id_source(mut self, ids: IdSource) -> Self {
        self.ids = ids;
        self
    }

    pub fn connect_with(&mut self, transport: D) -> Result<()> {
        self.link.establish(transport)?;
        self.session_id = query_session_id(&mut *self.ids);
        tracing::debug!(
            "query client connected to {}:{} (session {:#010x})",
            self.hostname,
            self.port,
            self.session_id
        );
        Ok(())
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    /// One datagram round trip
    fn exchange(&mut self, request: &[u8]) -> Result<Vec<u8>> {
        let read_timeout = self.config.read_timeout();
        let transport = self.link.get()?;
        transport.set_read_timeout(read_timeout)?;
        Ok(transport.exchange(request)?)
    }

    fn check_session(&self, echoed: u32) -> Result<()> {
        if echoed == self.session_id {
            return Ok(());
        }
        if self.config.strict_ids {
            return Err(McError::IdMismatch {
                expected: i64::from(self.session_id),
                actual: i64::from(echoed),
            });
        }
        tracing::warn!(
            "query response echoed session {:#010x}, sent {:#010x}",
            echoed,
            self.session_id
        );
        Ok(())
    }

    /// Obtain a challenge token
    pub fn handshake(&mut self) -> Result<i32> {
        let request = encode_handshake_request(self.session_id);
        let response = self.exchange(&request)?;
        let handshake = decode_handshake_response(&mut response.as_slice())?;
        self.check_session(handshake.session_id)?;
        Ok(handshake.challenge_token)
    }

    pub fn basic_stat(&mut self, challenge_token: i32) -> Result<BasicStat> {
        let request = encode_basic_stat_request(self.session_id, challenge_token);
        let response = self.exchange(&request)?;
        let stat = decode_basic_stat_response(&mut response.as_slice())?;
        self.check_session(stat.session_id)?;
        Ok(stat.into())
    }

    pub fn full_stat(&mut self, challenge_token: i32) -> Result<FullStat> {
        let request = encode_full_stat_request(self.session_id, challenge_token);
        let response = self.exchange(&request)?;
        let mut reader = response.as_slice();
        let stat = decode_full_stat_response(&mut reader)?;
        if !reader.is_empty() {
            tracing::debug!("{} trailing bytes after full stat", reader.len());
        }
        self.check_session(stat.session_id)?;
        Ok(stat.into())
    }

    pub fn disconnect(&mut self) -> Result<()> {
        self.link.release()
    }
}
