//! Session management for the zkem protocol
//!
//! A session represents a connection to a device and tracks:
//! - Session ID (assigned by device in the connect acknowledgment)
//! - Reply counter (bumped on every frame built through the session)
//! - Connection state
//!
//! The session is a plain value owned by whoever drives the device. All
//! mutation goes through `&mut self`, so only one frame can be built and
//! exchanged at a time.

use bytes::Bytes;

use crate::{
    command::Command,
    constants::USHRT_MAX,
    error::{Error, Result},
    packet::Packet,
};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not connected
    Disconnected,

    /// Connected and ready for commands
    Connected,
}

/// Session counters and state
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID assigned by device (0 when not connected)
    session_id: u16,

    /// Reply counter (starts at USHRT_MAX so the first frame carries 0)
    reply_id: u16,

    /// Current session state
    state: SessionState,
}

impl Session {
    /// Initial reply ID; the connect frame's increment wraps it to 0
    ///
    /// Older clients preset 65534 and wrap at 65535 instead, so their
    /// connect frame carries checksum 0xFC17 where this one sends 0xFC16.
    pub const INITIAL_REPLY_ID: u16 = USHRT_MAX;

    /// Create a new disconnected session
    pub fn new() -> Self {
        Self {
            session_id: 0,
            reply_id: Self::INITIAL_REPLY_ID,
            state: SessionState::Disconnected,
        }
    }

    /// Get current session ID
    pub fn session_id(&self) -> u16 {
        self.session_id
    }

    /// Reply ID carried by the last frame built
    pub fn reply_id(&self) -> u16 {
        self.reply_id
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        matches!(self.state, SessionState::Connected)
    }

    /// Build the next outgoing frame and advance the reply counter.
    ///
    /// # Examples
    ///
    /// ```
    /// use zkem_core::{Command, Session};
    ///
    /// let mut session = Session::new();
    /// let packet = session.frame(Command::Connect, Vec::new());
    ///
    /// assert_eq!(packet.reply_id, 0);
    /// assert_eq!(session.reply_id(), 0);
    /// ```
    pub fn frame(&mut self, command: Command, payload: impl Into<Bytes>) -> Packet {
        let packet = Packet::build(command, self.session_id, self.reply_id, payload);
        self.reply_id = packet.reply_id;
        packet
    }

    /// Initialize session with device-assigned session ID
    pub fn initialize(&mut self, session_id: u16) -> Result<()> {
        if self.state != SessionState::Disconnected {
            return Err(Error::InvalidSessionState(format!(
                "Cannot initialize from state: {:?}",
                self.state
            )));
        }

        self.session_id = session_id;
        self.state = SessionState::Connected;

        Ok(())
    }

    /// Close session
    ///
    /// Resets the session ID and reply counter for the next connect.
    pub fn close(&mut self) {
        self.session_id = 0;
        self.reply_id = Self::INITIAL_REPLY_ID;
        self.state = SessionState::Disconnected;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
