//! User records

use std::fmt;

/// User enrolled on the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Device-side user id
    pub id: i16,

    /// Display name (the id in decimal when the device has none)
    pub name: String,
}

impl UserRecord {
    pub fn new(id: i16, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.id, self.name)
    }
}
