//! LEB128 unsigned varints and delta encoding of ascending keys.

use crate::Result;
use ohno::bail;

/// Longest LEB128 encoding of a `u64`.
const MAX_VARINT_LEN: usize = 10;

/// Append `value` to `buf` as an unsigned LEB128 varint.
///
/// Seven value bits per byte, least significant group first, with the high bit
/// set on every byte except the last.
pub fn encode_uvarint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        #[expect(clippy::cast_possible_truncation, reason = "masked to 7 bits")]
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Decode an unsigned LEB128 varint from `buf` starting at `*pos`, advancing `*pos`.
pub fn decode_uvarint(buf: &[u8], pos: &mut usize) -> Result<u64> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    for i in 0..MAX_VARINT_LEN {
        let Some(&byte) = buf.get(*pos + i) else {
            bail!("truncated varint at offset {}", *pos);
        };

        let payload = u64::from(byte & 0x7F);
        if i == MAX_VARINT_LEN - 1 && payload > 1 {
            bail!("varint at offset {} overflows u64", *pos);
        }

        result |= payload << shift;
        if byte & 0x80 == 0 {
            *pos += i + 1;
            return Ok(result);
        }
        shift += 7;
    }

    bail!("varint at offset {} overflows u64", *pos)
}

/// Writes each key as the difference from the key before it.
#[derive(Debug, Default)]
pub struct DeltaEncoder {
    last: u64,
}

impl DeltaEncoder {
    #[must_use]
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    /// Append the delta for `key` to `buf`.
    ///
    /// Keys must arrive strictly ascending; the caller's table guarantees it.
    pub fn push(&mut self, key: u64, buf: &mut Vec<u8>) {
        debug_assert!(key >= self.last, "keys must be ascending ({key} after {})", self.last);
        encode_uvarint(key - self.last, buf);
        self.last = key;
    }
}

/// Reconstructs absolute keys from a stream of deltas.
#[derive(Debug, Default)]
pub struct DeltaDecoder {
    last: u64,
}

impl DeltaDecoder {
    #[must_use]
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    pub fn next_key(&mut self, buf: &[u8], pos: &mut usize) -> Result<u64> {
        let delta = decode_uvarint(buf, pos)?;
        let Some(key) = self.last.checked_add(delta) else {
            bail!("key delta {delta} overflows after key {}", self.last);
        };
        self.last = key;
        Ok(key)
    }
}

/// Encode a whole ascending key sequence as concatenated delta varints.
#[must_use]
pub fn encode_keys(keys: impl IntoIterator<Item = u64>) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut encoder = DeltaEncoder::new();
    for key in keys {
        encoder.push(key, &mut buf);
    }
    buf
}
