//! Connection lifecycle
//!
//! `Unconnected → Connected → Disconnected`, each transition at most once.

use super::Transport;
use crate::error::{McError, Result};

/// Connection state owned by every client
#[derive(Debug, Default)]
pub enum Link<T> {
    #[default]
    Unconnected,
    Connected(T),
    Disconnected,
}

impl<T: Transport> Link<T> {
    /// Install a freshly dialed transport
    pub fn establish(&mut self, transport: T) -> Result<()> {
        match self {
            Link::Unconnected => {
                *self = Link::Connected(transport);
                Ok(())
            }
            Link::Connected(_) => Err(McError::AlreadyConnected),
            Link::Disconnected => Err(McError::ConnectionTerminated),
        }
    }

    /// Fail early when a dial would be wasted
    pub fn ensure_unconnected(&self) -> Result<()> {
        match self {
            Link::Unconnected => Ok(()),
            Link::Connected(_) => Err(McError::AlreadyConnected),
            Link::Disconnected => Err(McError::ConnectionTerminated),
        }
    }

    pub fn get(&mut self) -> Result<&mut T> {
        match self {
            Link::Connected(transport) => Ok(transport),
            _ => Err(McError::NotConnected),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Link::Connected(_))
    }

    /// Close the transport. The handle is released even if closing fails,
    /// and a second call reports [`McError::NotConnected`].
    pub fn release(&mut self) -> Result<()> {
        match std::mem::replace(self, Link::Disconnected) {
            Link::Connected(mut transport) => transport.close().map_err(McError::from),
            previous => {
                if matches!(previous, Link::Unconnected) {
                    *self = Link::Unconnected;
                }
                Err(McError::NotConnected)
            }
        }
    }
}
