//! UTF-16BE helpers used by the legacy ping format

/// Encode `s` as UTF-16BE bytes
pub fn encode_utf16_be(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(u16::to_be_bytes).collect()
}

/// Decode UTF-16BE bytes, replacing unpaired surrogates.
///
/// An odd trailing byte is ignored.
pub fn decode_utf16_be(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}
