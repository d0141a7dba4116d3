//! Configuration for mcwire clients
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

/// Configuration shared by every protocol client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Transport Configuration
    // -------------------------------------------------------------------------
    /// Dial timeout (milliseconds), 0 disables it
    pub dial_timeout_ms: u64,

    /// Read deadline applied before each response read (milliseconds)
    pub read_timeout_ms: u64,

    /// Write timeout (milliseconds)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Reject responses whose echoed session/request id differs from the one sent.
    /// When false, mismatches are only logged.
    pub strict_ids: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            dial_timeout_ms: 5000,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            strict_ids: false,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    pub fn dial_timeout(&self) -> Option<Duration> {
        millis(self.dial_timeout_ms)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the dial timeout (in milliseconds)
    pub fn dial_timeout_ms(mut self, ms: u64) -> Self {
        self.config.dial_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Enforce echoed id equality
    pub fn strict_ids(mut self, strict: bool) -> Self {
        self.config.strict_ids = strict;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
