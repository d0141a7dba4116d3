//! RCON client
//!
//! `Unconnected → Connected → Authenticated → Disconnected`. Authentication is
//! optional in the state machine but every command requires it.

use std::io::{Read, Write};
use std::time::Duration;

use super::packets::{
    decode_packet, encode_packet, RconPacket, COMMAND_REQUEST_TYPE, FRAGMENT_THRESHOLD,
    INVALID_REQUEST_TYPE, LOGIN_REQUEST_TYPE, MAX_COMMAND_LEN, RESPONSE_VALUE_TYPE,
    UNKNOWN_REQUEST_REPLY,
};
use crate::config::ClientConfig;
use crate::error::{McError, Result};
use crate::ids::{default_id_source, rcon_request_id, IdSource};
use crate::transport::{write_request, Link, StreamTransport, TcpTransport, Transport};

/// Request id the server answers with when authentication failed
const AUTH_FAILED_ID: i32 = -1;

/// RCON client
pub struct RconClient<S = TcpTransport> {
    hostname: String,
    port: u16,
    config: ClientConfig,
    link: Link<S>,
    ids: IdSource,
    authenticated: bool,
}

impl RconClient {
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self::detached(hostname, port)
    }

    pub fn connect(&mut self) -> Result<()> {
        self.link.ensure_unconnected()?;
        let transport = TcpTransport::dial(&self.hostname, self.port, &self.config)?;
        self.connect_with(transport)
    }
}

impl<S: StreamTransport> RconClient<S> {
    pub fn detached(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            config: ClientConfig::default(),
            link: Link::Unconnected,
            ids: default_id_source(),
            authenticated: false,
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the random request id generator
    pub fn with_id_source(mut self, ids: IdSource) -> Self {
        self.ids = ids;
        self
    }

    pub fn connect_with(&mut self, transport: S) -> Result<()> {
        self.link.establish(transport)?;
        tracing::debug!("rcon client connected to {}:{}", self.hostname, self.port);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Log in with `password`.
    ///
    /// `Ok(false)` means the exchange went fine but the password was refused.
    pub fn authenticate(&mut self, password: &str) -> Result<bool> {
        let read_timeout = self.config.read_timeout();
        let transport = self.link.get()?;
        let request_id = rcon_request_id(&mut *self.ids);

        write_request(transport, &encode_packet(request_id, LOGIN_REQUEST_TYPE, password))?;
        let mut reply = read_packet(transport, read_timeout)?;

        // Source servers send an empty response value ahead of the auth reply
        if reply.packet_type == RESPONSE_VALUE_TYPE
            && reply.payload.is_empty()
            && reply.request_id != AUTH_FAILED_ID
        {
            reply = read_packet(transport, read_timeout)?;
        }

        if reply.request_id == AUTH_FAILED_ID {
            tracing::debug!("rcon login refused by {}:{}", self.hostname, self.port);
            self.authenticated = false;
            return Ok(false);
        }
        check_request_id(self.config.strict_ids, request_id, reply.request_id)?;

        self.authenticated = true;
        Ok(true)
    }

    /// Run `command` and return its whole output, reassembling fragments.
    ///
    /// Fragments are joined as raw bytes and decoded as UTF-8 once.
    pub fn command(&mut self, command: &str) -> Result<String> {
        if command.len() > MAX_COMMAND_LEN {
            return Err(McError::CommandTooLong {
                len: command.len(),
                max: MAX_COMMAND_LEN,
            });
        }
        let read_timeout = self.config.read_timeout();
        let transport = self.link.get()?;
        if !self.authenticated {
            return Err(McError::NotAuthenticated);
        }
        let request_id = rcon_request_id(&mut *self.ids);

        write_request(transport, &encode_packet(request_id, COMMAND_REQUEST_TYPE, command))?;
        let (first, output) = read_fragmented(transport, request_id, read_timeout)?;

        if first.request_id == AUTH_FAILED_ID {
            return Err(McError::NotAuthenticated);
        }
        check_request_id(self.config.strict_ids, request_id, first.request_id)?;

        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    /// Close the connection, which also drops the authentication
    pub fn disconnect(&mut self) -> Result<()> {
        self.authenticated = false;
        self.link.release()
    }
}

fn read_packet<S: Transport + Read>(
    transport: &mut S,
    read_timeout: Option<Duration>,
) -> Result<RconPacket> {
    transport.set_read_timeout(read_timeout)?;
    let packet = decode_packet(transport)?;
    tracing::trace!(
        "rcon packet: id={} type={} payload={} bytes",
        packet.request_id,
        packet.packet_type,
        packet.payload.len()
    );
    Ok(packet)
}

/// Read a command response that may span several packets.
///
/// There is no continuation flag. When the first payload reaches the
/// fragment threshold, an invalid request is sent right behind the command;
/// the server answers it only after the last fragment, so every packet up to
/// that answer belongs to the command.
fn read_fragmented<S: Transport + Read + Write>(
    transport: &mut S,
    request_id: i32,
    read_timeout: Option<Duration>,
) -> Result<(RconPacket, Vec<u8>)> {
    let first = read_packet(transport, read_timeout)?;
    let mut output = first.payload.clone();

    if first.payload.len() >= FRAGMENT_THRESHOLD {
        write_request(transport, &encode_packet(request_id, INVALID_REQUEST_TYPE, ""))?;

        loop {
            let packet = read_packet(transport, read_timeout)?;
            if packet.payload == UNKNOWN_REQUEST_REPLY.as_bytes() {
                break;
            }
            if packet.request_id == request_id {
                output.extend_from_slice(&packet.payload);
            }
        }
        tracing::debug!("reassembled fragmented rcon response of {} bytes", output.len());
    }

    Ok((first, output))
}

fn check_request_id(strict: bool, sent: i32, echoed: i32) -> Result<()> {
    if sent == echoed {
        return Ok(());
    }
    if strict {
        return Err(McError::IdMismatch {
            expected: i64::from(sent),
            actual: i64::from(echoed),
        });
    }
    tracing::warn!("rcon reply echoed request id {}, sent {}", echoed, sent);
    Ok(())
}
