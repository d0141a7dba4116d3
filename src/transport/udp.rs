//! UDP transport
//!
//! Single-datagram exchanges used by Query and Bedrock.

use std::io;
use std::net::UdpSocket;
use std::time::Duration;

use super::{resolve, DatagramTransport, Transport, MAX_DATAGRAM_LEN};
use crate::config::ClientConfig;
use crate::error::{McError, Result};

/// Connected UDP socket
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Bind an ephemeral local port and associate it with `host:port`.
    ///
    /// UDP has no handshake, so the dial timeout never applies.
    pub fn dial(host: &str, port: u16, config: &ClientConfig) -> Result<Self> {
        let addr = resolve(host, port)?
            .into_iter()
            .next()
            .ok_or_else(|| McError::AddressResolution(format!("{}:{}", host, port)))?;

        let local = if addr.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local)?;
        socket.connect(addr)?;
        socket.set_write_timeout(config.write_timeout())?;

        tracing::debug!("UDP socket {} associated with {}", socket.local_addr()?, addr);
        Ok(Self { socket })
    }

    /// Wrap an already connected socket
    pub fn from_socket(socket: UdpSocket) -> Self {
        Self { socket }
    }
}

impl DatagramTransport for UdpTransport {
    fn exchange(&mut self, request: &[u8]) -> io::Result<Vec<u8>> {
        self.socket.send(request)?;

        let mut buf = vec![0u8; MAX_DATAGRAM_LEN];
        let n = self.socket.recv(&mut buf)?;
        buf.truncate(n);
        tracing::trace!("UDP exchange: sent {} bytes, received {}", request.len(), n);
        Ok(buf)
    }
}

impl Transport for UdpTransport {
    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.socket.set_read_timeout(timeout)
    }

    fn set_write_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.socket.set_write_timeout(timeout)
    }

    fn close(&mut self) -> io::Result<()> {
        // Dropping the socket releases it, nothing to flush
        Ok(())
    }
}
