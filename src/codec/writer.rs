//! Wire writer
//!
//! Encoding helpers over any `BufMut`. Fixed-width integers come straight from
//! `BufMut` (`put_u16`, `put_u32_le`, ...).

use bytes::BufMut;

/// Primitive encoders for any `BufMut`
pub trait WireWrite: BufMut {
    /// Unsigned LEB128 varint
    fn put_uvarint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.put_u8((value as u8 & 0x7F) | 0x80);
            value >>= 7;
        }
        self.put_u8(value as u8);
    }

    /// Signed 32-bit varint, two's complement bits (-1 takes 5 bytes)
    fn put_varint(&mut self, value: i32) {
        self.put_uvarint(u64::from(value as u32));
    }

    /// Signed 64-bit varint, two's complement bits (-1 takes 10 bytes)
    fn put_varlong(&mut self, value: i64) {
        self.put_uvarint(value as u64);
    }

    /// Bytes of `s` followed by a single 0x00
    fn put_cstring(&mut self, s: &str) {
        self.put_slice(s.as_bytes());
        self.put_u8(0);
    }

    /// Uvarint byte length followed by the UTF-8 bytes
    fn put_prefixed_str(&mut self, s: &str) {
        self.put_uvarint(s.len() as u64);
        self.put_slice(s.as_bytes());
    }
}

impl<B: BufMut + ?Sized> WireWrite for B {}
