//! Protocol constants

/// Largest 16-bit value; the reply counter wraps past it
pub const USHRT_MAX: u16 = 65535;

/// Default receive timeout (seconds)
pub const DEFAULT_TIMEOUT: u64 = 60;

/// Size of a plain acknowledgment datagram
pub const ACK_SIZE: usize = 8;

/// Size of the reply to a data request (header + size field + padding)
pub const PREPARE_REPLY_SIZE: usize = 16;

/// Size of the reply to CMD_CLEAR_ATTLOG
pub const CLEAR_REPLY_SIZE: usize = 16;

/// Size of the CMD_GET_TIME reply (header + packed time)
pub const TIME_REPLY_SIZE: usize = 12;

/// Data transfer chunking
pub mod transfer {
    /// Payload bytes accounted per chunk
    pub const CHUNK_PAYLOAD_SIZE: usize = 1024;

    /// Bytes read per chunk (8-byte inner header + payload)
    pub const CHUNK_SIZE: usize = crate::HEADER_SIZE + CHUNK_PAYLOAD_SIZE;
}

/// Data type flags (payload of CMD_USERTEMP_RRQ)
pub mod data_types {
    /// User record
    pub const FCT_USER: u8 = 5;
}
