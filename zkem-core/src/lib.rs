//! # zkem-core
//!
//! Core protocol implementation for zkem biometric time clocks.
//!
//! This crate provides the low-level protocol primitives:
//! - Packet structure and encoding/decoding
//! - Checksum calculation
//! - Command definitions
//! - Session counters
//! - Device time packing
//! - Protocol constants

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod packet;
pub mod session;
pub mod timecode;

pub use command::Command;
pub use error::{Error, Result};
pub use packet::Packet;
pub use session::{Session, SessionState};

/// Default device port
pub const DEFAULT_PORT: u16 = 4370;

/// Packet header size
pub const HEADER_SIZE: usize = 8;
