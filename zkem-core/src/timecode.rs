//! Device time encoding
//!
//! Terminals pack wall-clock time into a `u32` counted in seconds from
//! 2000-01-01 with every month 31 days long (EncodeTime / DecodeTime in the
//! vendor SDK):
//!
//! ```text
//! ((year % 100) * 12 * 31 + (month - 1) * 31 + day - 1) * 86400
//!     + (hour * 60 + minute) * 60 + second
//! ```
//!
//! This is not a Gregorian day count and must be reproduced as is.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Packed value of the device epoch, `2000-01-01 00:00:00`
pub const EPOCH: u32 = 0;

/// Pack a timestamp into the device format.
///
/// Only the two-digit year is kept.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use zkem_core::timecode;
///
/// let t = NaiveDate::from_ymd_opt(2023, 6, 15)
///     .unwrap()
///     .and_hms_opt(10, 30, 45)
///     .unwrap();
/// assert_eq!(timecode::encode(&t), 753_877_845);
/// ```
pub fn encode(t: &NaiveDateTime) -> u32 {
    let year = t.year().rem_euclid(100) as u32;
    let days = year * 12 * 31 + (t.month() - 1) * 31 + t.day() - 1;

    days * 86_400 + (t.hour() * 60 + t.minute()) * 60 + t.second()
}

/// Unpack a device timestamp.
///
/// Returns `None` when the packed value names a day that does not exist,
/// e.g. February 31st.
pub fn decode(packed: u32) -> Option<NaiveDateTime> {
    let mut t = packed;

    let second = t % 60;
    t /= 60;

    let minute = t % 60;
    t /= 60;

    let hour = t % 24;
    t /= 24;

    let day = t % 31 + 1;
    t /= 31;

    let month = t % 12 + 1;
    t /= 12;

    let year = t as i32 + 2000;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

/// Whether `t` is the device epoch, which terminals use for empty slots.
pub fn is_epoch(t: &NaiveDateTime) -> bool {
    t.year() == 2000 && t.ordinal() == 1 && t.num_seconds_from_midnight() == 0
}
