//! Dispatch
//!
//! Immutable table of the supported protocols keyed by name, and a single
//! entry point running one facade for a target.

use serde::Serialize;

use crate::bedrock::{self, BedrockPong, BedrockVariant};
use crate::config::ClientConfig;
use crate::error::{McError, Result};
use crate::ping::{self, Handshake, LegacyPingInfo, LegacyVariant};
use crate::query::{self, BasicStat, FullStat};
use crate::rcon;

/// Every protocol a target can be probed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Ping,
    PingLegacy,
    PingLegacy164,
    QueryBasic,
    QueryFull,
    Rcon,
    PingBedrock,
    StatBedrock,
}

/// Protocol names as accepted on the command line
pub const PROTOCOLS: &[(&str, Protocol)] = &[
    ("ping", Protocol::Ping),
    ("ping-legacy", Protocol::PingLegacy),
    ("ping-legacy-1.6.4", Protocol::PingLegacy164),
    ("query-basic", Protocol::QueryBasic),
    ("query-full", Protocol::QueryFull),
    ("rcon", Protocol::Rcon),
    ("ping-bedrock", Protocol::PingBedrock),
    ("stat-bedrock", Protocol::StatBedrock),
];

impl Protocol {
    pub fn from_name(name: &str) -> Result<Self> {
        PROTOCOLS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, protocol)| *protocol)
            .ok_or_else(|| McError::UnknownProtocol(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        PROTOCOLS
            .iter()
            .find(|(_, protocol)| *protocol == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }

    /// Usage string for the protocol's arguments
    pub fn usage(self) -> &'static str {
        match self {
            Protocol::Rcon => "<hostname> <port> <password> <command>",
            _ => "<hostname> <port>",
        }
    }
}

/// Server to probe
#[derive(Debug, Clone, Default)]
pub struct Target {
    pub hostname: String,
    pub port: u16,
    /// RCON only
    pub password: Option<String>,
    /// RCON only
    pub command: Option<String>,
}

/// Result of one protocol run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Status(Handshake),
    Legacy(LegacyPingInfo),
    BasicStat(BasicStat),
    FullStat(FullStat),
    Rcon { response: String },
    Bedrock(BedrockPong),
}

/// Outcome plus latency in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    #[serde(flatten)]
    pub output: Outcome,
    #[serde(rename = "latency")]
    pub latency_ms: i64,
}

fn report(output: Outcome, latency_ms: i64) -> Report {
    Report { output, latency_ms }
}

/// Run `protocol` against `target`
pub fn execute(protocol: Protocol, target: &Target, config: &ClientConfig) -> Result<Report> {
    let host = target.hostname.as_str();
    let port = target.port;
    tracing::debug!("running {} against {}:{}", protocol.name(), host, port);

    let report = match protocol {
        Protocol::Ping => {
            let (handshake, latency) = ping::ping_with(host, port, config)?;
            report(Outcome::Status(handshake), latency)
        }
        Protocol::PingLegacy | Protocol::PingLegacy164 => {
            let variant = if protocol == Protocol::PingLegacy {
                LegacyVariant::Plain
            } else {
                LegacyVariant::PingHost
            };
            let (info, latency) = ping::ping_legacy_with(host, port, variant, config)?;
            report(Outcome::Legacy(info), latency)
        }
        Protocol::QueryBasic => {
            let (stat, latency) = query::query_basic_with(host, port, config)?;
            report(Outcome::BasicStat(stat), latency)
        }
        Protocol::QueryFull => {
            let (stat, latency) = query::query_full_with(host, port, config)?;
            report(Outcome::FullStat(stat), latency)
        }
        Protocol::Rcon => {
            let password = target
                .password
                .as_deref()
                .ok_or(McError::MissingArgument("password"))?;
            let command = target
                .command
                .as_deref()
                .ok_or(McError::MissingArgument("command"))?;
            let (response, latency) = rcon::rcon_with(host, port, password, command, config)?;
            report(Outcome::Rcon { response }, latency)
        }
        Protocol::PingBedrock | Protocol::StatBedrock => {
            let variant = if protocol == Protocol::PingBedrock {
                BedrockVariant::Ping
            } else {
                BedrockVariant::Stat
            };
            let (pong, latency) = bedrock::ping_with(host, port, variant, config)?;
            report(Outcome::Bedrock(pong), latency)
        }
    };

    Ok(report)
}
