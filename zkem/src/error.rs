//! High-level error types

use zkem_core::Command;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] zkem_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] zkem_transport::Error),

    #[error("Device host not set")]
    HostNotSet,

    #[error("Device not connected")]
    NotConnected,

    #[error("Device answered {received} where {expected} was expected")]
    Rejected { expected: Command, received: u16 },

    #[error("Device has no data to send (answered {received})")]
    NoData { received: u16 },

    #[error("Reply to {command} too short: expected {expected} bytes, got {actual}")]
    ShortReply {
        command: Command,
        expected: usize,
        actual: usize,
    },

    #[error("Data chunk {index} too short: expected {expected} bytes, got {actual}")]
    ShortChunk {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("No attendance log has been fetched")]
    NothingFetched,

    #[error("Device sent an invalid timestamp: {0}")]
    InvalidTimestamp(u32),
}

impl Error {
    /// Whether the device itself refused or had nothing to send, as opposed
    /// to a local or network failure
    pub fn is_device_reply(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::NoData { .. })
    }
}
