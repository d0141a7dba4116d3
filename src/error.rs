//! Error types for mcwire
//!
//! Provides a unified error type for all client operations.

use thiserror::Error;

/// Result type alias using McError
pub type Result<T> = std::result::Result<T, McError>;

/// Unified error type for mcwire operations
#[derive(Debug, Error)]
pub enum McError {
    // -------------------------------------------------------------------------
    // Connection Errors (caller misuse, never retried)
    // -------------------------------------------------------------------------
    #[error("connection hasn't been established yet, call connect first")]
    NotConnected,

    #[error("connection has already been established, call disconnect first")]
    AlreadyConnected,

    #[error("connection has been closed, create a new client to reconnect")]
    ConnectionTerminated,

    #[error("status handshake must complete before {0}")]
    HandshakeRequired(&'static str),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection closed: expected {expected} bytes, received {received}")]
    ConnectionClosed { expected: usize, received: usize },

    #[error("could not resolve address: {0}")]
    AddressResolution(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("invalid packet type: expected {expected}, got {actual}")]
    InvalidPacketType { expected: i64, actual: i64 },

    #[error("malformed packet: {0}")]
    MalformedPacket(String),

    #[error("magic bytes do not match")]
    BadMagic,

    #[error("varint is too long")]
    VarIntTooLong,

    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    #[error("invalid number in field {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("echoed id mismatch: sent {expected}, received {actual}")]
    IdMismatch { expected: i64, actual: i64 },

    // -------------------------------------------------------------------------
    // Authentication Errors (RCON)
    // -------------------------------------------------------------------------
    #[error("authentication hasn't been done or has failed, call authenticate first")]
    NotAuthenticated,

    #[error("wrong password")]
    WrongPassword,

    #[error("command is {len} bytes long, must be {max} or less")]
    CommandTooLong { len: usize, max: usize },

    // -------------------------------------------------------------------------
    // Dispatch Errors
    // -------------------------------------------------------------------------
    #[error("unknown protocol: {0}")]
    UnknownProtocol(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
}

impl McError {
    /// Misuse of the connection lifecycle
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            McError::NotConnected
                | McError::AlreadyConnected
                | McError::ConnectionTerminated
                | McError::HandshakeRequired(_)
        )
    }

    /// Dial, read, write or timeout failures
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            McError::Io(_) | McError::ConnectionClosed { .. } | McError::AddressResolution(_)
        )
    }

    /// The peer answered with something that does not follow the protocol
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            McError::InvalidPacketType { .. }
                | McError::MalformedPacket(_)
                | McError::BadMagic
                | McError::VarIntTooLong
                | McError::FrameTooLarge { .. }
                | McError::InvalidNumber { .. }
                | McError::Json(_)
                | McError::IdMismatch { .. }
        )
    }
}
