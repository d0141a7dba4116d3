//! Codec Module
//!
//! Typed encode/decode of the primitive wire representations shared by every
//! protocol. The codec holds no protocol knowledge.
//!
//! ## Primitives
//! ```text
//! fixed ints      │ 16/32/64-bit, big- or little-endian
//! uvarint         │ 7 data bits per byte, high bit = continuation, ≤ 10 bytes
//! varint (i32)    │ two's-complement bits of the i32 as a uvarint, ≤ 5 bytes
//! varlong (i64)   │ two's-complement bits of the i64 as a uvarint, ≤ 10 bytes
//! cstring         │ bytes up to and including a single 0x00
//! prefixed string │ uvarint byte length + UTF-8 bytes
//! ```
//!
//! Reading goes through [`WireRead`], implemented for every `std::io::Read`.
//! Writing goes through [`WireWrite`], implemented for every `bytes::BufMut`.

mod reader;
mod writer;
mod utf16;

pub use reader::WireRead;
pub use writer::WireWrite;
pub use utf16::{decode_utf16_be, encode_utf16_be};

/// Longest uvarint/varlong encoding (64 bits of payload)
pub const MAX_UVARINT_LEN: usize = 10;

/// Longest signed 32-bit varint encoding
pub const MAX_VARINT_LEN: usize = 5;
