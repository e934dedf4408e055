//! Device connection settings

use std::time::Duration;

use zkem_core::{constants::DEFAULT_TIMEOUT, DEFAULT_PORT};

/// Where and how to reach a terminal
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use zkem::DeviceConfig;
///
/// let config = DeviceConfig::new("192.168.1.201").with_timeout(Duration::from_secs(5));
/// assert_eq!(config.port, 4370);
/// assert_eq!(config.addr(), "192.168.1.201:4370");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Device host name or IP address
    pub host: Option<String>,

    /// UDP port
    pub port: u16,

    /// How long each receive waits for a datagram
    pub timeout: Duration,
}

impl DeviceConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            ..Self::default()
        }
    }

    /// Set the UDP port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the receive timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Host, if set to something other than blanks
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref().map(str::trim).filter(|h| !h.is_empty())
    }

    /// `host:port` for display
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host().unwrap_or("<unset>"), self.port)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
        }
    }
}
