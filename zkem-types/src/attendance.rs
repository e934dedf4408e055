//! Attendance log records

use std::fmt;

use chrono::NaiveDateTime;

use crate::error::{Error, Result};

/// Punch recorded by the terminal
///
/// The discriminant is the state code stored in the log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum AttendanceEvent {
    CheckInCode = 0,
    CheckInFingerprint = 8,
    CheckOutCode = 32,
    CheckOutFingerprint = 40,
}

impl AttendanceEvent {
    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::CheckInCode => "Check In (Code)",
            Self::CheckInFingerprint => "Check In (Fingerprint)",
            Self::CheckOutCode => "Check Out (Code)",
            Self::CheckOutFingerprint => "Check Out (Fingerprint)",
        }
    }

    pub fn is_check_in(self) -> bool {
        matches!(self, Self::CheckInCode | Self::CheckInFingerprint)
    }
}

impl From<AttendanceEvent> for u16 {
    fn from(event: AttendanceEvent) -> u16 {
        event as u16
    }
}

impl TryFrom<u16> for AttendanceEvent {
    type Error = Error;

    fn try_from(code: u16) -> Result<Self> {
        match code {
            0 => Ok(Self::CheckInCode),
            8 => Ok(Self::CheckInFingerprint),
            32 => Ok(Self::CheckOutCode),
            40 => Ok(Self::CheckOutFingerprint),
            _ => Err(Error::UnknownEventCode(code)),
        }
    }
}

impl fmt::Display for AttendanceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One punch from the attendance log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    /// Device-side user id
    pub user_id: u16,

    /// Local wall-clock time of the punch, as kept by the terminal
    pub timestamp: NaiveDateTime,

    /// Kind of punch
    pub event: AttendanceEvent,
}

impl fmt::Display for AttendanceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.user_id, self.timestamp, self.event)
    }
}
