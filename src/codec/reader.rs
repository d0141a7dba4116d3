//! Wire reader
//!
//! Decoding helpers over any byte source.

use std::io::{ErrorKind, Read};

use super::{MAX_UVARINT_LEN, MAX_VARINT_LEN};
use crate::error::{McError, Result};

/// Primitive decoders for any `Read`
///
/// Every multi-byte read blocks until the whole run is available. A source
/// that ends early yields [`McError::ConnectionClosed`].
pub trait WireRead: Read {
    /// Fill `buf` completely, retrying partial reads
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut received = 0;
        while received < buf.len() {
            match self.read(&mut buf[received..]) {
                Ok(0) => {
                    return Err(McError::ConnectionClosed {
                        expected: buf.len(),
                        received,
                    })
                }
                Ok(n) => received += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Read exactly `n` bytes
    ///
    /// The buffer grows with the data actually received, so a bogus length
    /// from the peer cannot force a huge allocation up front.
    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(n.min(64 * 1024));
        (&mut *self).take(n as u64).read_to_end(&mut buf)?;
        if buf.len() < n {
            return Err(McError::ConnectionClosed {
                expected: n,
                received: buf.len(),
            });
        }
        Ok(buf)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    fn read_u16_be(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    fn read_u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    fn read_u32_be(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    fn read_i32_le(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    fn read_u64_be(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    fn read_u64_le(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read an unsigned LEB128 varint bounded to 64 bits
    fn read_uvarint(&mut self) -> Result<u64> {
        let mut value = 0u64;
        for i in 0..MAX_UVARINT_LEN {
            let byte = self.read_u8()?;
            // the tenth byte may only carry the 64th bit
            if i == MAX_UVARINT_LEN - 1 && byte > 1 {
                return Err(McError::VarIntTooLong);
            }
            value |= u64::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(McError::VarIntTooLong)
    }

    /// Read a signed 32-bit varint (two's complement, no zig-zag)
    fn read_varint(&mut self) -> Result<i32> {
        let mut value = 0u32;
        for i in 0..MAX_VARINT_LEN {
            let byte = self.read_u8()?;
            if i == MAX_VARINT_LEN - 1 && byte & 0xF0 != 0 {
                return Err(McError::VarIntTooLong);
            }
            value |= u32::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value as i32);
            }
        }
        Err(McError::VarIntTooLong)
    }

    /// Read a signed 64-bit varint (two's complement, no zig-zag)
    fn read_varlong(&mut self) -> Result<i64> {
        Ok(self.read_uvarint()? as i64)
    }

    /// Read bytes up to the first 0x00, which is consumed but not returned
    fn read_cstring_bytes(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        loop {
            match self.read_u8()? {
                0 => return Ok(out),
                b => out.push(b),
            }
        }
    }

    /// Null-terminated string, invalid UTF-8 replaced
    fn read_cstring(&mut self) -> Result<String> {
        let bytes = self.read_cstring_bytes()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Uvarint byte length followed by UTF-8 bytes
    fn read_prefixed_string(&mut self) -> Result<String> {
        let len = self.read_uvarint()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl<R: Read + ?Sized> WireRead for R {}
