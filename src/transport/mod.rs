//! Transport Module
//!
//! The minimal contract the protocol clients need from the network.
//!
//! ## Exchange semantics
//! - Stream: write a request, then read sequentially as many times as needed
//! - Datagram: one write, then exactly one bounded read returning the whole
//!   response (at most [`MAX_DATAGRAM_LEN`] bytes), never re-requested

mod link;
mod tcp;
mod udp;

use std::io::{self, Read, Write};
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

pub use link::Link;
pub use tcp::TcpTransport;
pub use udp::UdpTransport;

use crate::error::{McError, Result};

/// Largest datagram a single exchange reads
pub const MAX_DATAGRAM_LEN: usize = 65535;

/// Operations common to every transport
pub trait Transport {
    /// Deadline applied to the next read, `None` blocks forever
    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()>;

    fn set_write_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()>;

    /// Release the underlying handle
    fn close(&mut self) -> io::Result<()>;
}

/// Ordered byte stream (TCP)
pub trait StreamTransport: Transport + Read + Write {}

impl<T: Transport + Read + Write> StreamTransport for T {}

/// Connectionless request/response (UDP)
pub trait DatagramTransport: Transport {
    /// Send `request` and return the single datagram answering it
    fn exchange(&mut self, request: &[u8]) -> io::Result<Vec<u8>>;
}

/// Write a whole request to a stream and flush it
pub fn write_request<W: Write + ?Sized>(writer: &mut W, request: &[u8]) -> Result<()> {
    writer.write_all(request)?;
    writer.flush()?;
    tracing::trace!("wrote {} byte request", request.len());
    Ok(())
}

/// Resolve `host:port` to IPv4 addresses, falling back to whatever resolves
pub(crate) fn resolve(host: &str, port: u16) -> Result<Vec<SocketAddr>> {
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|e| McError::AddressResolution(format!("{}:{}: {}", host, port, e)))?
        .collect();

    let v4: Vec<SocketAddr> = addrs.iter().copied().filter(SocketAddr::is_ipv4).collect();
    let addrs = if v4.is_empty() { addrs } else { v4 };

    if addrs.is_empty() {
        return Err(McError::AddressResolution(format!(
            "{}:{}: no addresses",
            host, port
        )));
    }
    Ok(addrs)
}
