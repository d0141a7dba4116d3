//! TCP transport
//!
//! Buffered stream connection used by modern ping, legacy ping and RCON.

use std::io::{self, BufReader, BufWriter, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use super::{resolve, Transport};
use crate::config::ClientConfig;
use crate::error::{McError, Result};

/// Blocking TCP connection
pub struct TcpTransport {
    /// TCP stream reader (buffered, most decoders read byte by byte)
    reader: BufReader<TcpStream>,

    /// TCP stream writer, flushed after every request
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,
}

impl TcpTransport {
    /// Dial `host:port`, trying each resolved address in turn
    pub fn dial(host: &str, port: u16, config: &ClientConfig) -> Result<Self> {
        let mut last_err = None;

        for addr in resolve(host, port)? {
            let attempt = match config.dial_timeout() {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => {
                    tracing::debug!("TCP connection established to {}", addr);
                    let mut transport = Self::from_stream(stream)?;
                    transport.set_write_timeout(config.write_timeout())?;
                    return Ok(transport);
                }
                Err(e) => {
                    tracing::debug!("TCP dial to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(last_err
            .map(McError::Io)
            .unwrap_or_else(|| McError::AddressResolution(format!("{}:{}", host, port))))
    }

    /// Wrap an already connected stream
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Requests are small and latency is measured
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            peer_addr,
        })
    }

    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Read for TcpTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Write for TcpTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl Transport for TcpTransport {
    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.reader.get_ref().set_read_timeout(timeout)
    }

    fn set_write_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.writer.get_ref().set_write_timeout(timeout)
    }

    fn close(&mut self) -> io::Result<()> {
        // Pending bytes are best effort, the shutdown result is what counts
        let _ = self.writer.flush();
        match self.writer.get_ref().shutdown(Shutdown::Both) {
            Err(e) if e.kind() != io::ErrorKind::NotConnected => Err(e),
            _ => {
                tracing::debug!("TCP connection to {} closed", self.peer_addr);
                Ok(())
            }
        }
    }
}
