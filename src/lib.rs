//! # mcwire
//!
//! Wire-protocol clients querying live status from, and acting on,
//! Minecraft-family servers:
//! - Server List Ping, modern and legacy (plain and 1.6.4)
//! - Query (UT3), basic and full stat
//! - RCON (Source protocol) with fragmented response reassembly
//! - Bedrock unconnected ping (Raknet)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Facades / dispatch table                     │
//! │        (connect → exchange(s) → disconnect per call)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Protocol clients                           │
//! │        ping · legacy ping · query · rcon · bedrock           │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │      Codec      │                │    Transport    │
//!   │ (WireRead/Write)│                │  (TCP / UDP)    │
//!   └─────────────────┘                └─────────────────┘
//! ```
//!
//! Every operation is blocking and each client owns exactly one connection.
//! Nothing is retried: a failed call can simply be issued again.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod transport;
pub mod ids;
mod clock;

pub mod ping;
pub mod query;
pub mod rcon;
pub mod bedrock;
pub mod dispatch;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{McError, Result};
pub use config::ClientConfig;
pub use dispatch::{execute, Protocol, Report, Target};

pub use bedrock::{BedrockClient, BedrockPong};
pub use ping::{Handshake, LegacyPingClient, LegacyPingInfo, PingClient};
pub use query::{BasicStat, FullStat, QueryClient};
pub use rcon::RconClient;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of mcwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
