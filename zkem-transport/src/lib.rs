//! Transport layer for the zkem protocol
//!
//! Terminals speak the protocol over plain UDP datagrams.

pub mod error;
pub mod udp;

pub use error::{Error, Result};
pub use udp::UdpTransport;

use async_trait::async_trait;
use bytes::BytesMut;

/// Transport trait for exchanging raw frames with a device
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the endpoint
    async fn connect(&mut self) -> Result<()>;

    /// Close the endpoint
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Send raw bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive one datagram of at most `max_len` bytes (with timeout)
    ///
    /// Anything past `max_len` is discarded, like a `recv` into a buffer of
    /// that size.
    async fn receive(&mut self, max_len: usize) -> Result<BytesMut>;

    /// Get remote address
    fn remote_addr(&self) -> String;
}
