//! Multi-packet data transfers
//!
//! After a `CMD_PREPARE_DATA` reply announcing N bytes, the terminal sends
//! the data as 1032-byte datagrams (8-byte header + 1024 bytes) until N is
//! covered, then a final `CMD_ACK_OK`. The final datagram may carry fewer
//! than 1024 bytes.

use bytes::BytesMut;
use tracing::{debug, trace};

use zkem_core::{
    constants::transfer::{CHUNK_PAYLOAD_SIZE, CHUNK_SIZE},
    HEADER_SIZE,
};
use zkem_transport::Transport;

use crate::error::{Error, Result};

/// What to keep from each chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkMode {
    /// Keep the whole datagram, inner header included (user data)
    KeepHeader,

    /// Drop the 8-byte inner header (attendance log)
    StripHeader,
}

/// Receive the chunks of an announced transfer and concatenate them in
/// order.
///
/// Fails on the first receive error, or when a chunk is shorter than the
/// announced size requires: every chunk but the last must be a full 1032
/// bytes, and the last must cover what remains.
pub async fn reassemble(
    transport: &mut dyn Transport,
    announced: u32,
    mode: ChunkMode,
) -> Result<BytesMut> {
    let chunks = (announced as usize).div_ceil(CHUNK_PAYLOAD_SIZE);
    let mut data = BytesMut::with_capacity(chunks * CHUNK_SIZE);

    let mut remaining = announced as usize;
    let mut index = 0;

    while remaining > 0 {
        let chunk = transport.receive(CHUNK_SIZE).await?;

        let carried = remaining.min(CHUNK_PAYLOAD_SIZE);
        let needed = if remaining > CHUNK_PAYLOAD_SIZE {
            CHUNK_SIZE
        } else {
            HEADER_SIZE + carried
        };

        if chunk.len() < needed {
            return Err(Error::ShortChunk {
                index,
                expected: needed,
                actual: chunk.len(),
            });
        }

        trace!(index, len = chunk.len(), "Received chunk");

        match mode {
            ChunkMode::KeepHeader => data.extend_from_slice(&chunk),
            ChunkMode::StripHeader => data.extend_from_slice(&chunk[HEADER_SIZE..]),
        }

        remaining -= carried;
        index += 1;
    }

    debug!(announced, chunks = index, kept = data.len(), "Transfer reassembled");

    Ok(data)
}
