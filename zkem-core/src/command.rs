//! zkem protocol opcodes

use std::fmt;

use crate::error::{Error, Result};

/// Protocol command codes
///
/// The subset of `cmds.h` spoken by the UDP time clock client.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Command {
    // Connection commands
    Connect = 1000,
    Exit = 1001,
    EnableDevice = 1002,
    DisableDevice = 1003,

    // Data transfer
    PrepareData = 1500,
    Data = 1501,

    // Database operations
    UserTempRrq = 9,
    AttLogRrq = 13,
    ClearData = 14,
    ClearAttLog = 15,

    // Display
    WriteLcd = 66,

    // Time operations
    GetTime = 201,
    SetTime = 202,

    // Response commands (from device)
    AckOk = 2000,
    AckError = 2001,
    AckData = 2002,
}

impl Command {
    /// Check if this is a request command (from PC to device)
    pub fn is_request(self) -> bool {
        !self.is_response()
    }

    /// Check if this is a response command (from device to PC)
    pub fn is_response(self) -> bool {
        matches!(
            self,
            Self::AckOk | Self::AckError | Self::AckData | Self::PrepareData | Self::Data
        )
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::Connect => "CMD_CONNECT",
            Self::Exit => "CMD_EXIT",
            Self::EnableDevice => "CMD_ENABLEDEVICE",
            Self::DisableDevice => "CMD_DISABLEDEVICE",
            Self::PrepareData => "CMD_PREPARE_DATA",
            Self::Data => "CMD_DATA",
            Self::UserTempRrq => "CMD_USERTEMP_RRQ",
            Self::AttLogRrq => "CMD_ATTLOG_RRQ",
            Self::ClearData => "CMD_CLEAR_DATA",
            Self::ClearAttLog => "CMD_CLEAR_ATTLOG",
            Self::WriteLcd => "CMD_WRITE_LCD",
            Self::GetTime => "CMD_GET_TIME",
            Self::SetTime => "CMD_SET_TIME",
            Self::AckOk => "CMD_ACK_OK",
            Self::AckError => "CMD_ACK_ERROR",
            Self::AckData => "CMD_ACK_DATA",
        }
    }
}

impl From<Command> for u16 {
    fn from(cmd: Command) -> u16 {
        cmd as u16
    }
}

impl TryFrom<u16> for Command {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            1000 => Ok(Self::Connect),
            1001 => Ok(Self::Exit),
            1002 => Ok(Self::EnableDevice),
            1003 => Ok(Self::DisableDevice),
            1500 => Ok(Self::PrepareData),
            1501 => Ok(Self::Data),
            9 => Ok(Self::UserTempRrq),
            13 => Ok(Self::AttLogRrq),
            14 => Ok(Self::ClearData),
            15 => Ok(Self::ClearAttLog),
            66 => Ok(Self::WriteLcd),
            201 => Ok(Self::GetTime),
            202 => Ok(Self::SetTime),
            2000 => Ok(Self::AckOk),
            2001 => Ok(Self::AckError),
            2002 => Ok(Self::AckData),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), *self as u16)
    }
}
