//! Record decoding for fetched device data
//!
//! Both buffers start with a 4-byte preamble followed by fixed-width
//! entries. Trailing bytes that do not fill a whole entry are ignored.

use byteorder::{ByteOrder, LittleEndian};
use tracing::trace;

use zkem_core::timecode;
use zkem_types::{AttendanceEvent, AttendanceRecord, UserRecord};

/// Bytes ahead of the first entry
pub const PREAMBLE_SIZE: usize = 4;

/// `id: i16`, 6 skipped, `name: [u8; 8]`, 12 skipped
pub const USER_ENTRY_SIZE: usize = 28;

/// `user_id: u16`, `state: u16`, `time: u32`
pub const ATTENDANCE_ENTRY_SIZE: usize = 8;

const NAME_RANGE: std::ops::Range<usize> = 8..16;

/// Padding bytes trimmed from both ends of a name
const NAME_PADDING: [u8; 3] = [0x00, 0x01, 0x10];

fn entries(data: &[u8], size: usize) -> std::slice::ChunksExact<'_, u8> {
    data.get(PREAMBLE_SIZE..).unwrap_or_default().chunks_exact(size)
}

/// Decode user entries in device order.
pub fn unpack_users(data: &[u8]) -> Vec<UserRecord> {
    entries(data, USER_ENTRY_SIZE)
        .map(|entry| {
            let id = LittleEndian::read_i16(&entry[..2]);
            let name = decode_name(&entry[NAME_RANGE]).unwrap_or_else(|| id.to_string());

            UserRecord::new(id, name)
        })
        .collect()
}

/// Decode attendance entries in device order.
///
/// Entries with an unknown state code, an empty (epoch) slot or a packed
/// time that is not a calendar date are skipped.
pub fn unpack_attendance(data: &[u8]) -> Vec<AttendanceRecord> {
    entries(data, ATTENDANCE_ENTRY_SIZE)
        .filter_map(|entry| {
            let user_id = LittleEndian::read_u16(&entry[0..2]);
            let state = LittleEndian::read_u16(&entry[2..4]);
            let packed = LittleEndian::read_u32(&entry[4..8]);

            let Some(timestamp) = timecode::decode(packed) else {
                trace!(user_id, packed, "Skipping entry with invalid time");
                return None;
            };

            if timecode::is_epoch(&timestamp) {
                return None;
            }

            match AttendanceEvent::try_from(state) {
                Ok(event) => Some(AttendanceRecord {
                    user_id,
                    timestamp,
                    event,
                }),
                Err(_) => {
                    trace!(user_id, state, "Skipping entry with unknown state");
                    None
                }
            }
        })
        .collect()
}

/// Trim padding and decode a fixed-width name field.
///
/// Returns `None` when the field is not UTF-8 or holds only blanks.
pub fn decode_name(field: &[u8]) -> Option<String> {
    let start = field.iter().position(|b| !NAME_PADDING.contains(b))?;
    let end = field.iter().rposition(|b| !NAME_PADDING.contains(b))? + 1;

    let name = std::str::from_utf8(&field[start..end]).ok()?;

    if name.trim().is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn user_entry(id: i16, name: &[u8]) -> Vec<u8> {
        let mut entry = vec![0u8; USER_ENTRY_SIZE];
        entry[..2].copy_from_slice(&id.to_le_bytes());
        entry[2..8].fill(0xEE);
        entry[8..8 + name.len()].copy_from_slice(name);
        entry[16..].fill(0xEE);
        entry
    }

    fn attendance_entry(user_id: u16, state: u16, packed: u32) -> Vec<u8> {
        let mut entry = Vec::with_capacity(ATTENDANCE_ENTRY_SIZE);
        entry.extend_from_slice(&user_id.to_le_bytes());
        entry.extend_from_slice(&state.to_le_bytes());
        entry.extend_from_slice(&packed.to_le_bytes());
        entry
    }

    fn buffer(entries: &[Vec<u8>]) -> Vec<u8> {
        let mut data = vec![0xAA; PREAMBLE_SIZE];
        for entry in entries {
            data.extend_from_slice(entry);
        }
        data
    }

    #[test]
    fn test_unpack_users() {
        let data = buffer(&[user_entry(1, b"Alice\0\0\0"), user_entry(2, b"Bob")]);

        assert_eq!(
            unpack_users(&data),
            vec![UserRecord::new(1, "Alice"), UserRecord::new(2, "Bob")]
        );
    }

    #[test]
    fn test_blank_name_falls_back_to_id() {
        let data = buffer(&[user_entry(-3, b"\x01 \x10"), user_entry(12, b"")]);

        assert_eq!(
            unpack_users(&data),
            vec![UserRecord::new(-3, "-3"), UserRecord::new(12, "12")]
        );
    }

    #[test]
    fn test_invalid_utf8_name_falls_back_to_id() {
        let data = buffer(&[user_entry(4, &[0xFF, 0xFE, b'x'])]);

        assert_eq!(unpack_users(&data), vec![UserRecord::new(4, "4")]);
    }

    #[test]
    fn test_partial_user_entry_is_ignored() {
        let mut data = buffer(&[user_entry(1, b"Alice")]);
        data.extend_from_slice(&[0u8; USER_ENTRY_SIZE - 1]);

        assert_eq!(unpack_users(&data).len(), 1);
    }

    #[test]
    fn test_unpack_short_buffers() {
        assert!(unpack_users(&[]).is_empty());
        assert!(unpack_users(&[1, 2, 3]).is_empty());
        assert!(unpack_attendance(&[0; PREAMBLE_SIZE + 7]).is_empty());
    }

    #[test]
    fn test_decode_name() {
        assert_eq!(decode_name(b"\x00\x01Ann\x10\x00"), Some("Ann".to_string()));
        assert_eq!(decode_name(b"Jo Li\0\0\0"), Some("Jo Li".to_string()));
        assert_eq!(decode_name(b"\0\0\0\0"), None);
        assert_eq!(decode_name(b"   \0"), None);
        assert_eq!(decode_name(&[]), None);
    }

    #[test]
    fn test_unpack_attendance() {
        let punch = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 5, 0)
            .unwrap();
        let packed = timecode::encode(&punch);

        let data = buffer(&[
            attendance_entry(7, 8, packed),
            attendance_entry(9, 40, packed + 60),
        ]);

        let records = unpack_attendance(&data);

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            AttendanceRecord {
                user_id: 7,
                timestamp: punch,
                event: AttendanceEvent::CheckInFingerprint,
            }
        );
        assert_eq!(records[1].user_id, 9);
        assert_eq!(records[1].event, AttendanceEvent::CheckOutFingerprint);
        assert_eq!(records[1].timestamp, punch + chrono::Duration::minutes(1));
    }

    #[test]
    fn test_unpack_attendance_skips_unusable_entries() {
        let packed = timecode::encode(
            &NaiveDate::from_ymd_opt(2023, 11, 20)
                .unwrap()
                .and_hms_opt(17, 0, 0)
                .unwrap(),
        );
        // February 30th
        let impossible = (23 * 12 * 31 + 31 + 29) * 86_400;

        let data = buffer(&[
            attendance_entry(1, 0, timecode::EPOCH),
            attendance_entry(2, 1, packed),
            attendance_entry(3, 32, impossible),
            attendance_entry(4, 32, packed),
        ]);

        let records = unpack_attendance(&data);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, 4);
        assert_eq!(records[0].event, AttendanceEvent::CheckOutCode);
    }
}
