//! Reserved-block ("RATS") validation.
//!
//! A reserved block is demarcated by an 8-byte header sitting immediately
//! before its payload: the ASCII tag `STAR`, a little-endian u16 size, and a
//! little-endian u16 checksum equal to the size XOR 0xFFFF. The stored size
//! is one less than the true payload length.

use crate::addressing::PcOffset;

/// The 4-byte ASCII marker opening a reserved-block header.
pub const RATS_TAG: &[u8; 4] = b"STAR";

const RATS_HEADER_LEN: usize = RATS_TAG.len() + 2 + 2;

/// Returns the payload length of the tagged block whose payload begins at
/// `payload`, or `None` when the preceding bytes are not a valid header.
///
/// The bytes before an arbitrary PC offset may not belong to a tagged block
/// at all, so every read here is bounds-checked and a match requires the
/// full tag + checksum pair, never the tag alone.
pub fn rats_size(data: &[u8], payload: PcOffset) -> Option<u16> {
    let start = payload.0.checked_sub(RATS_HEADER_LEN)?;
    let header = data.get(start..payload.0)?;
    if &header[..RATS_TAG.len()] != RATS_TAG {
        return None;
    }
    let size = u16::from_le_bytes([header[4], header[5]]);
    let checksum = u16::from_le_bytes([header[6], header[7]]);
    if size ^ 0xFFFF != checksum {
        return None;
    }
    // The stored size field is one less than the true block length.
    Some(size.wrapping_add(1))
}
