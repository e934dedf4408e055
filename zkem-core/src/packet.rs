//! zkem frame structure and encoding/decoding

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    checksum,
    command::Command,
    error::{Error, Result},
};

/// zkem protocol frame
///
/// # Packet Structure
///
/// ```text
/// ┌─────────────┬─────────────┬─────────────┬─────────────┬─────────────┐
/// │   Command   │  Checksum   │  SessionID  │  ReplyID    │   Payload   │
/// │   2 bytes   │   2 bytes   │   2 bytes   │   2 bytes   │   N bytes   │
/// │ (LE u16)    │  (LE u16)   │  (LE u16)   │  (LE u16)   │   (bytes)   │
/// └─────────────┴─────────────┴─────────────┴─────────────┴─────────────┘
/// ```
///
/// The checksum is computed over the header carrying the *previous* reply
/// id, then the reply id is bumped. Received frames are never checked
/// against their checksum; they are classified by `command` alone.
///
/// `command` is the raw wire value so that frames with opcodes outside the
/// known table still decode.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use zkem_core::{Packet, Command};
///
/// let packet = Packet::build(Command::Connect, 0, 65535, Bytes::new());
/// assert_eq!(packet.reply_id, 0);
///
/// let decoded = Packet::decode(packet.encode()).unwrap();
/// assert!(decoded.is(Command::Connect));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Packet {
    /// Command code
    pub command: u16,

    /// Checksum as carried on the wire
    pub checksum: u16,

    /// Session identifier (assigned by device on connect)
    pub session_id: u16,

    /// Reply number
    pub reply_id: u16,

    /// Packet payload (command-specific data)
    pub payload: Bytes,
}

impl Packet {
    /// Packet header size in bytes
    pub const HEADER_SIZE: usize = 8;

    /// Build an outgoing frame.
    ///
    /// `reply_id` is the session's current counter. The checksum covers the
    /// header with that value and a zeroed checksum field; the frame itself
    /// carries `reply_id + 1` (wrapping at 65536).
    ///
    /// # Examples
    ///
    /// ```
    /// use zkem_core::{Packet, Command};
    ///
    /// let packet = Packet::build(Command::SetTime, 1234, 6, vec![1, 2, 3, 4]);
    /// assert_eq!(packet.reply_id, 7);
    /// assert_eq!(packet.payload.len(), 4);
    /// ```
    pub fn build(
        command: Command,
        session_id: u16,
        reply_id: u16,
        payload: impl Into<Bytes>,
    ) -> Self {
        let payload = payload.into();
        let checksum = checksum::calculate(command.into(), session_id, reply_id, &payload);

        Self {
            command: command.into(),
            checksum,
            session_id,
            reply_id: reply_id.wrapping_add(1),
            payload,
        }
    }

    /// Known opcode of this frame, if any
    pub fn kind(&self) -> Option<Command> {
        Command::try_from(self.command).ok()
    }

    /// Check the frame's opcode
    pub fn is(&self, command: Command) -> bool {
        self.command == u16::from(command)
    }

    /// Encode packet to bytes
    ///
    /// # Examples
    ///
    /// ```
    /// use bytes::Bytes;
    /// use zkem_core::{Packet, Command};
    ///
    /// let packet = Packet::build(Command::Connect, 0, 65535, Bytes::new());
    /// let bytes = packet.encode();
    /// assert_eq!(&bytes[..], &[0xE8, 0x03, 0x16, 0xFC, 0x00, 0x00, 0x00, 0x00]);
    /// ```
    pub fn encode(&self) -> BytesMut {
        let total_size = Self::HEADER_SIZE + self.payload.len();
        let mut buf = BytesMut::with_capacity(total_size);

        buf.put_u16_le(self.command);
        buf.put_u16_le(self.checksum);
        buf.put_u16_le(self.session_id);
        buf.put_u16_le(self.reply_id);

        buf.put_slice(&self.payload);

        buf
    }

    /// Decode packet from bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::PacketTooShort`] if the buffer holds less than a
    /// header. The checksum and the opcode are not validated.
    pub fn decode(mut buf: BytesMut) -> Result<Self> {
        if buf.len() < Self::HEADER_SIZE {
            return Err(Error::PacketTooShort {
                expected: Self::HEADER_SIZE,
                actual: buf.len(),
            });
        }

        let command = buf.get_u16_le();
        let checksum = buf.get_u16_le();
        let session_id = buf.get_u16_le();
        let reply_id = buf.get_u16_le();

        Ok(Self {
            command,
            checksum,
            session_id,
            reply_id,
            payload: buf.freeze(),
        })
    }

    /// Get total packet size
    pub fn size(&self) -> usize {
        Self::HEADER_SIZE + self.payload.len()
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Packet");
        match self.kind() {
            Some(command) => s.field("command", &command),
            None => s.field("command", &self.command),
        };
        s.field("checksum", &format!("0x{:04X}", self.checksum))
            .field("session_id", &format!("0x{:04X}", self.session_id))
            .field("reply_id", &format!("0x{:04X}", self.reply_id))
            .field("payload", &hex::encode(&self.payload[..self.payload.len().min(32)]))
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(command) => write!(f, "Packet[{}]", command)?,
            None => write!(f, "Packet[{}]", self.command)?,
        }
        write!(
            f,
            "(session={}, reply={}, len={})",
            self.session_id,
            self.reply_id,
            self.payload.len()
        )
    }
}
