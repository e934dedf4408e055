//! # zkem
//!
//! Client for the UDP protocol spoken by zkem biometric time clocks.
//!
//! ## Features
//!
//! - Session handshake and teardown
//! - Device lock/unlock and clock get/set
//! - User table and attendance log download with chunk reassembly
//! - Record decoding into typed users and punches
//! - Async/await API using Tokio
//!
//! ## Quick Start
//!
//! ```no_run
//! use zkem::{Device, DeviceConfig};
//!
//! #[tokio::main]
//! async fn main() -> zkem::Result<()> {
//!     let mut device = Device::new(DeviceConfig::new("192.168.1.201"));
//!     device.connect().await?;
//!
//!     device.disable().await?;
//!     device.get_attendance_log().await?;
//!     device.enable().await?;
//!
//!     for record in device.unpack_attendance_log() {
//!         println!("{}", record);
//!     }
//!
//!     device.disconnect().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod records;
pub mod transfer;

#[cfg(test)]
mod testing;

// Re-exports
pub use config::DeviceConfig;
pub use device::Device;
pub use error::{Error, Result};

// Re-export types
pub use zkem_core::{Command, Packet, Session, SessionState};
pub use zkem_types::{AttendanceEvent, AttendanceRecord, UserRecord};
