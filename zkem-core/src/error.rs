//! Error types for zkem-core

/// Result type alias for zkem-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Packet is too short to be valid
    #[error("Packet too short: expected at least {expected} bytes, got {actual} bytes")]
    PacketTooShort {
        expected: usize,
        actual: usize,
    },

    /// Unknown command code
    #[error("Unknown command code: {0}")]
    UnknownCommand(u16),

    /// Invalid session state
    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),
}
