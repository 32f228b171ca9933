// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary encoding primitives: varints, length-prefixed strings, optional
//! timestamps, and the forward-only [`Reader`] the decoder walks the buffer with.
//!
//! Nothing fancy here. Varint for every length, count and table index, because
//! catalogs are small and most of those numbers fit in one byte. Fixed 8-byte
//! little-endian for timestamps, because they never do.
//!
//! # References
//!
//! - **Varint (LEB128)**: Little-endian base-128 variable-length integer encoding.
//!   Originally from DWARF debugging format (1992+), popularized by Protocol Buffers.
//!   See: DWARF4 specification §7.6 "Variable Length Data", and
//!   Google Protocol Buffers encoding: <https://protobuf.dev/programming-guides/encoding/>

use crate::error::{FormatError, FormatErrorKind, Result};

use super::header::{FLAG_ABSENT, FLAG_PRESENT, MAX_STRING_LEN, MAX_VARINT_BYTES};

// ============================================================================
// VARINT ENCODING
// ============================================================================

/// Encode a varint to bytes
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        } else {
            buf.push(byte | 0x80);
        }
    }
}

/// Decode a varint from bytes, returning (value, bytes_consumed)
///
/// Returns an error if:
/// - Buffer is empty or ends mid-varint
/// - Varint exceeds MAX_VARINT_BYTES or carries bits beyond u64
pub fn decode_varint(bytes: &[u8]) -> std::result::Result<(u64, usize), FormatErrorKind> {
    let mut result: u64 = 0;
    let mut shift = 0;

    for (i, &byte) in bytes.iter().take(MAX_VARINT_BYTES).enumerate() {
        let low = (byte & 0x7F) as u64;
        // The tenth byte only has room for the top bit of a u64
        if i == MAX_VARINT_BYTES - 1 && low > 1 {
            return Err(FormatErrorKind::VarintOverflow);
        }
        result |= low << shift;
        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
        shift += 7;
    }

    if bytes.len() >= MAX_VARINT_BYTES {
        Err(FormatErrorKind::VarintOverflow)
    } else {
        Err(FormatErrorKind::Truncated {
            needed: bytes.len() as u64 + 1,
            remaining: bytes.len(),
        })
    }
}

// ============================================================================
// STRINGS AND TIMESTAMPS
// ============================================================================

/// Reject lengths the format cannot carry.
pub fn check_len(len: u64, offset: usize, field: &'static str) -> Result<()> {
    if len > MAX_STRING_LEN {
        return Err(FormatError::new(
            offset,
            field,
            FormatErrorKind::LengthTooLarge {
                len,
                max: MAX_STRING_LEN,
            },
        ));
    }
    Ok(())
}

/// Encode a length-prefixed UTF-8 string.
pub fn encode_string(s: &str, field: &'static str, buf: &mut Vec<u8>) -> Result<()> {
    let bytes = s.as_bytes();
    check_len(bytes.len() as u64, buf.len(), field)?;
    encode_varint(bytes.len() as u64, buf);
    buf.extend_from_slice(bytes);
    Ok(())
}

/// Encode an optional i64: flag byte, then 8 bytes LE when present.
pub fn encode_opt_i64(value: Option<i64>, buf: &mut Vec<u8>) {
    match value {
        Some(v) => {
            buf.push(FLAG_PRESENT);
            buf.extend_from_slice(&v.to_le_bytes());
        }
        None => buf.push(FLAG_ABSENT),
    }
}

/// Encode a list of table indices: count, then one varint each.
pub fn encode_indices(indices: &[u64], buf: &mut Vec<u8>) {
    encode_varint(indices.len() as u64, buf);
    for &idx in indices {
        encode_varint(idx, buf);
    }
}

/// Encode a string table: count, then each string length-prefixed.
pub fn encode_string_table(
    strings: &[String],
    field: &'static str,
    buf: &mut Vec<u8>,
) -> Result<()> {
    encode_varint(strings.len() as u64, buf);
    for s in strings {
        encode_string(s, field, buf)?;
    }
    Ok(())
}

// ============================================================================
// READER
// ============================================================================

/// Forward-only cursor over a catalog buffer.
///
/// Every read names the field it is reading so errors carry a location.
/// Nothing here allocates more than the bytes actually present.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn err(&self, at: usize, field: &'static str, kind: FormatErrorKind) -> FormatError {
        FormatError::new(at, field, kind)
    }

    /// Borrow the next `n` bytes.
    pub fn take(&mut self, n: usize, field: &'static str) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(self.err(
                self.pos,
                field,
                FormatErrorKind::Truncated {
                    needed: n as u64,
                    remaining: self.remaining(),
                },
            ));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn u8(&mut self, field: &'static str) -> Result<u8> {
        Ok(self.take(1, field)?[0])
    }

    pub fn i64(&mut self, field: &'static str) -> Result<i64> {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(self.take(8, field)?);
        Ok(i64::from_le_bytes(raw))
    }

    pub fn varint(&mut self, field: &'static str) -> Result<u64> {
        let at = self.pos;
        let (value, consumed) =
            decode_varint(&self.bytes[self.pos..]).map_err(|kind| self.err(at, field, kind))?;
        self.pos += consumed;
        Ok(value)
    }

    /// Read an item count and bound it by the remaining bytes.
    ///
    /// Every counted item occupies at least one byte, so a count larger than
    /// what is left can only come from a truncated or forged buffer.
    pub fn count(&mut self, field: &'static str) -> Result<usize> {
        self.records(field, 1)
    }

    /// Read a count of records that each take at least `min_bytes`.
    ///
    /// Bounding by the smallest possible record keeps `Vec::with_capacity`
    /// proportional to the buffer, not to the forged count.
    pub fn records(&mut self, field: &'static str, min_bytes: usize) -> Result<usize> {
        let at = self.pos;
        let count = self.varint(field)?;
        let fits = (self.remaining() / min_bytes.max(1)) as u64;
        if count > fits {
            return Err(self.err(
                at,
                field,
                FormatErrorKind::Truncated {
                    needed: count.saturating_mul(min_bytes as u64),
                    remaining: self.remaining(),
                },
            ));
        }
        Ok(count as usize)
    }

    pub fn string(&mut self, field: &'static str) -> Result<String> {
        let at = self.pos;
        let len = self.varint(field)?;
        check_len(len, at, field)?;
        if len > self.remaining() as u64 {
            return Err(self.err(
                at,
                field,
                FormatErrorKind::Truncated {
                    needed: len,
                    remaining: self.remaining(),
                },
            ));
        }
        let start = self.pos;
        let bytes = self.take(len as usize, field)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| self.err(start, field, FormatErrorKind::InvalidUtf8))
    }

    /// Flag byte (0 absent, 1 present) followed by i64 LE when present.
    pub fn opt_i64(&mut self, field: &'static str) -> Result<Option<i64>> {
        let at = self.pos;
        match self.u8(field)? {
            FLAG_ABSENT => Ok(None),
            FLAG_PRESENT => self.i64(field).map(Some),
            other => Err(self.err(at, field, FormatErrorKind::InvalidFlag(other))),
        }
    }

    pub fn indices(&mut self, field: &'static str) -> Result<Vec<u64>> {
        let count = self.count(field)?;
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.varint(field)?);
        }
        Ok(out)
    }

    pub fn string_table(&mut self, field: &'static str) -> Result<Vec<String>> {
        let count = self.count(field)?;
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.string(field)?);
        }
        Ok(out)
    }

    /// Require that the whole buffer was consumed.
    pub fn finish(self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(FormatError::new(
                self.pos,
                "trailer",
                FormatErrorKind::TrailingBytes(n),
            )),
        }
    }
}


// ============================================================================
// KANI MODEL CHECKING PROOFS
// ============================================================================
//
// Run with: cargo kani
//
// 1. encode_varint never panics and emits at most MAX_VARINT_BYTES bytes
// 2. decode_varint never panics on any byte sequence
// 3. decode(encode(x)) == x

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    #[kani::proof]
    fn verify_encode_varint_bounded() {
        let value: u64 = kani::any();
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);

        kani::assert(!buf.is_empty(), "at least one byte");
        kani::assert(buf.len() <= MAX_VARINT_BYTES, "at most MAX_VARINT_BYTES");
        kani::assert(
            buf.last().map_or(false, |&b| b & 0x80 == 0),
            "last byte has no continuation bit",
        );
    }

    #[kani::proof]
    #[kani::unwind(12)]
    fn verify_decode_varint_no_panic() {
        let bytes: [u8; 11] = kani::any();
        let len: usize = kani::any();
        kani::assume(len <= bytes.len());
        if let Ok((_, consumed)) = decode_varint(&bytes[..len]) {
            kani::assert(consumed <= len, "consumed within input");
        }
    }

    #[kani::proof]
    #[kani::unwind(12)]
    fn verify_varint_roundtrip() {
        let value: u64 = kani::any();
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        let decoded = decode_varint(&buf);
        kani::assert(decoded == Ok((value, buf.len())), "roundtrip");
    }
}
