//! UDP transport for zkem devices
//!
//! Terminals listen for datagrams on port 4370. The socket is connected to
//! the device so that only its datagrams are received.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::{error::*, Transport};

/// UDP transport for zkem devices
pub struct UdpTransport {
    addr: String,
    port: u16,
    socket: Option<UdpSocket>,
    remote_addr: Option<SocketAddr>,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl UdpTransport {
    /// Create new UDP transport
    pub fn new(addr: impl Into<String>, port: u16) -> Self {
        Self {
            addr: addr.into(),
            port,
            socket: None,
            remote_addr: None,
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(5),
        }
    }

    /// Set the address lookup timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Resolve address to SocketAddr
    async fn resolve_addr(&mut self) -> Result<SocketAddr> {
        if let Some(addr) = self.remote_addr {
            return Ok(addr);
        }

        let addr_str = format!("{}:{}", self.addr, self.port);

        let addrs: Vec<SocketAddr> = timeout(self.connect_timeout, tokio::net::lookup_host(&addr_str))
            .await
            .map_err(|_| Error::ConnectionTimeout)?
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", addr_str, e)))?
            .collect();

        let addr = addrs
            .first()
            .ok_or_else(|| Error::InvalidAddress(format!("No addresses found for {}", addr_str)))?;

        self.remote_addr = Some(*addr);
        Ok(*addr)
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        let remote = self.resolve_addr().await?;

        debug!("Opening UDP endpoint to {}...", remote);

        // Bind to any available local port of the matching family
        let local = if remote.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local).await.map_err(Error::Io)?;

        // Connect to remote address (sets default send/recv target)
        socket.connect(remote).await.map_err(Error::Io)?;

        debug!("UDP endpoint open to {}", remote);

        self.socket = Some(socket);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(_socket) = self.socket.take() {
            debug!("Closing UDP endpoint to {}...", self.remote_addr());
        }

        self.remote_addr = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let socket = self.socket.as_ref().ok_or(Error::NotConnected)?;

        trace!(
            "Sending {} bytes via UDP: {:02X?}",
            data.len(),
            &data[..data.len().min(32)]
        );

        socket.send(data).await.map_err(Error::Io)?;

        Ok(())
    }

    async fn receive(&mut self, max_len: usize) -> Result<BytesMut> {
        let socket = self.socket.as_ref().ok_or(Error::NotConnected)?;

        let mut buf = BytesMut::zeroed(max_len);

        let n = timeout(self.read_timeout, socket.recv(&mut buf))
            .await
            .map_err(|_| {
                warn!("Read timeout after {:?}", self.read_timeout);
                Error::ReadTimeout
            })?
            .map_err(|e| {
                warn!("Read error: {}", e);
                Error::Io(e)
            })?;

        if n == 0 {
            warn!("Received 0 bytes");
            return Err(Error::EmptyDatagram);
        }

        // Truncate to actual received size
        buf.truncate(n);

        trace!(
            "Received {} bytes via UDP: {:02X?}",
            n,
            &buf[..n.min(32)]
        );

        Ok(buf)
    }

    fn remote_addr(&self) -> String {
        self.remote_addr
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| format!("{}:{}", self.addr, self.port))
    }
}
