//! Type definitions for zkem

pub mod attendance;
pub mod error;
pub mod user;

pub use attendance::{AttendanceEvent, AttendanceRecord};
pub use error::{Error, Result};
pub use user::UserRecord;
