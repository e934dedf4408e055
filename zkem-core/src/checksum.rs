//! zkem frame checksum
//!
//! Ported from the EncodeChecksum routine of the vendor SDK:
//! 1. Build buffer: [Command, 0x00, 0x00, SessionID, ReplyID, Payload]
//! 2. Sum as unsigned 16-bit little-endian words
//! 3. When sum > 0xFFFF, subtract 0xFFFF (not 0x10000)
//! 4. Take the complement of the signed sum and add 0xFFFF until non-negative
//!
//! The fold is one off from the Internet checksum. Terminals expect this
//! exact value, so it must not be "corrected".

use tracing::trace;

const USHRT_MAX: u32 = 65535;

/// Checksum of the frame built from `command`, `session_id`, `reply_id` and
/// `payload`, with the checksum field zeroed.
///
/// # Examples
///
/// ```
/// use zkem_core::checksum;
///
/// // CMD_CONNECT with the reply id preset to 65535
/// assert_eq!(checksum::calculate(1000, 0, 65535, &[]), 64534);
/// ```
pub fn calculate(command: u16, session_id: u16, reply_id: u16, payload: &[u8]) -> u16 {
    let mut buf = Vec::with_capacity(8 + payload.len());

    buf.extend_from_slice(&command.to_le_bytes());
    buf.extend_from_slice(&[0, 0]); // Checksum placeholder
    buf.extend_from_slice(&session_id.to_le_bytes());
    buf.extend_from_slice(&reply_id.to_le_bytes());
    buf.extend_from_slice(payload);

    let checksum = of_bytes(&buf);

    trace!(
        command = command,
        session_id = session_id,
        reply_id = reply_id,
        payload_len = payload.len(),
        checksum = format!("0x{:04X}", checksum),
        "Calculated checksum"
    );

    checksum
}

/// Checksum over an arbitrary byte sequence.
pub fn of_bytes(buf: &[u8]) -> u16 {
    let mut sum: u32 = 0;

    let mut words = buf.chunks_exact(2);
    for word in &mut words {
        sum += u16::from_le_bytes([word[0], word[1]]) as u32;
        if sum > USHRT_MAX {
            sum -= USHRT_MAX;
        }
    }

    // Odd trailing byte is added as-is
    if let [last] = words.remainder() {
        sum += *last as u32;
    }

    while sum > USHRT_MAX {
        sum -= USHRT_MAX;
    }

    // `sum` is at most 0xFFFF here, so the signed complement lies in
    // [-65536, -1] and at most two additions bring it back into range.
    let mut complement = !(sum as i32);
    while complement < 0 {
        complement += USHRT_MAX as i32;
    }

    complement as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    /// Closed form of the fold: the result only depends on the word sum
    /// modulo 0xFFFF.
    fn reference(buf: &[u8]) -> u16 {
        let total: u64 = buf
            .chunks(2)
            .map(|c| match c {
                [lo, hi] => u16::from_le_bytes([*lo, *hi]) as u64,
                [lo] => *lo as u64,
                _ => 0,
            })
            .sum();
        (65534 - total % 65535) as u16
    }

    #[test]
    fn test_checksum_connect_frame() {
        // E8 03 | 00 00 | 00 00 | FF FF
        // 1000 + 65535 = 66535 -> 1000, complement folds to 65534 - 1000
        assert_eq!(calculate(1000, 0, 65535, &[]), 64534);
    }

    #[test]
    fn test_checksum_is_not_internet_checksum() {
        // A ones-complement over 0x10000 would give !1000 = 0xFC17
        let checksum = calculate(1000, 0, 0, &[]);
        assert_eq!(checksum, 0xFC16);
    }

    #[test]
    fn test_checksum_empty_input() {
        assert_eq!(of_bytes(&[]), 65534);
    }

    #[test]
    fn test_checksum_full_word() {
        // 0xFFFF is not folded (only values above it are)
        assert_eq!(of_bytes(&[0xFF, 0xFF]), 65534);
        assert_eq!(of_bytes(&[0xFE, 0xFF]), 0);
    }

    #[test]
    fn test_checksum_odd_payload_length() {
        assert_eq!(of_bytes(&[0x01]), 65533);
        assert_eq!(of_bytes(&[0x01, 0x00, 0x02]), 65531);
    }

    #[test]
    fn test_checksum_empty_payload_matches_header() {
        let header = [0xC9, 0x00, 0x00, 0x00, 0x34, 0x12, 0x07, 0x00];
        assert_eq!(calculate(201, 0x1234, 7, &[]), of_bytes(&header));
    }

    #[test]
    fn test_checksum_different_commands() {
        assert_ne!(calculate(1000, 0, 0, &[]), calculate(1001, 0, 0, &[]));
    }

    #[test]
    fn test_checksum_different_sessions() {
        assert_ne!(calculate(1000, 100, 0, &[]), calculate(1000, 200, 0, &[]));
    }

    #[test]
    fn test_checksum_large_payload() {
        let payload = vec![0xFF; 1000];
        let mut buf = vec![0xE8, 0x03, 0, 0, 0, 0, 0, 0];
        buf.extend_from_slice(&payload);

        assert_eq!(calculate(1000, 0, 0, &payload), reference(&buf));
    }

    proptest! {
        #[test]
        fn prop_matches_closed_form(buf in prop::collection::vec(any::<u8>(), 0..2048)) {
            prop_assert_eq!(of_bytes(&buf), reference(&buf));
        }

        #[test]
        fn prop_single_byte_change_is_detected(
            buf in prop::collection::vec(any::<u8>(), 1..512),
            index in any::<prop::sample::Index>(),
            value in any::<u8>(),
        ) {
            let i = index.index(buf.len());
            prop_assume!(buf[i] != value);

            let mut changed = buf.clone();
            changed[i] = value;

            prop_assert_ne!(of_bytes(&buf), of_bytes(&changed));
        }

        #[test]
        fn prop_byte_order_within_word_is_detected(
            prefix in prop::collection::vec(any::<u16>(), 0..64),
            a in any::<u8>(),
            b in any::<u8>(),
        ) {
            prop_assume!(a != b);

            let mut buf: Vec<u8> = prefix.iter().flat_map(|w| w.to_le_bytes()).collect();
            let mut swapped = buf.clone();
            buf.extend_from_slice(&[a, b]);
            swapped.extend_from_slice(&[b, a]);

            prop_assert_ne!(of_bytes(&buf), of_bytes(&swapped));
        }

        #[test]
        fn prop_appending_nonzero_byte_is_detected(
            buf in prop::collection::vec(any::<u16>(), 0..64),
            extra in 1u8..=255,
        ) {
            let base: Vec<u8> = buf.iter().flat_map(|w| w.to_le_bytes()).collect();
            let mut longer = base.clone();
            longer.push(extra);

            prop_assert_ne!(of_bytes(&base), of_bytes(&longer));
        }
    }
}
