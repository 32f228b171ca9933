// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Catalog header: magic, version, schema timestamp.
//!
//! The header is the only part of the file with a fixed shape at a fixed
//! offset. A host can look at the first five bytes and tell a catalog apart
//! from a JSON document (or from a catalog written by a future major version)
//! without decoding anything else. That is what [`sniff`] is for.
//!
//! ```text
//! magic:             [u8; 4] = "CTLX"
//! version:           u8      (high nibble major, low nibble minor)
//! schema_updated_at: u8 flag (0 absent, 1 present) + i64 LE when present
//! ```

use crate::error::{FormatError, FormatErrorKind, Result};

use super::encoding::{encode_opt_i64, Reader};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Magic bytes: "CTLX" in ASCII
pub const MAGIC: [u8; 4] = [0x43, 0x54, 0x4C, 0x58];

/// Current format version (major 1, minor 0)
pub const VERSION: u8 = 0x10;

/// Major version this decoder understands. Minor bumps stay readable.
pub const SUPPORTED_MAJOR: u8 = 1;

/// Optional-timestamp flags
pub const FLAG_ABSENT: u8 = 0;
pub const FLAG_PRESENT: u8 = 1;

/// Third state of `main_image_path`
pub const FLAG_NULL: u8 = 2;

// ============================================================================
// SECURITY LIMITS (prevent resource exhaustion from malicious input)
// ============================================================================

/// Maximum buffer size accepted by the decoder: 256 MB
pub const MAX_FILE_SIZE: usize = 256 * 1024 * 1024;

/// Maximum varint bytes (u64 needs at most 10 bytes)
pub const MAX_VARINT_BYTES: usize = 10;

/// Maximum string byte length the format carries
pub const MAX_STRING_LEN: u64 = u32::MAX as u64;

/// Smallest channel record: four empty strings, category, and empty tag and
/// entry counts
pub const MIN_CHANNEL_BYTES: usize = 7;

/// Smallest entry record: one empty code, no tags or authors, absent flags
pub const MIN_ENTRY_BYTES: usize = 10;

/// Extract the major version from a version byte.
#[inline]
pub fn major(version: u8) -> u8 {
    version >> 4
}

/// Reject a version byte whose major this crate cannot read.
pub fn check_version(version: u8, offset: usize) -> Result<()> {
    if major(version) != SUPPORTED_MAJOR {
        return Err(FormatError::new(
            offset,
            "header.version",
            FormatErrorKind::UnsupportedVersion {
                found: version,
                supported_major: SUPPORTED_MAJOR,
            },
        ));
    }
    Ok(())
}

/// Reject buffers larger than [`MAX_FILE_SIZE`].
pub fn check_file_size(size: usize) -> Result<()> {
    if size > MAX_FILE_SIZE {
        return Err(FormatError::new(
            0,
            "buffer",
            FormatErrorKind::FileTooLarge {
                size,
                max: MAX_FILE_SIZE,
            },
        ));
    }
    Ok(())
}

// ============================================================================
// HEADER
// ============================================================================

/// Fixed leading fields of a catalog buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogHeader {
    pub version: u8,
    pub schema_updated_at: Option<i64>,
}

impl CatalogHeader {
    pub fn new(schema_updated_at: Option<i64>) -> Self {
        Self {
            version: VERSION,
            schema_updated_at,
        }
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&MAGIC);
        buf.push(self.version);
        encode_opt_i64(self.schema_updated_at, buf);
    }

    pub fn read(r: &mut Reader<'_>) -> Result<Self> {
        let at = r.position();
        let magic = r.take(4, "header.magic")?;
        if magic != MAGIC {
            let mut found = [0u8; 4];
            found.copy_from_slice(magic);
            return Err(FormatError::new(
                at,
                "header.magic",
                FormatErrorKind::BadMagic {
                    expected: MAGIC,
                    found,
                },
            ));
        }

        let at = r.position();
        let version = r.u8("header.version")?;
        check_version(version, at)?;

        let schema_updated_at = r.opt_i64("header.schema_updated_at")?;

        Ok(Self {
            version,
            schema_updated_at,
        })
    }
}

/// Identify a catalog buffer without decoding it.
///
/// Returns the version byte when the magic matches and the major version is
/// supported, `None` otherwise (JSON, garbage, or a future format).
pub fn sniff(bytes: &[u8]) -> Option<u8> {
    match bytes {
        [a, b, c, d, version, ..] if [*a, *b, *c, *d] == MAGIC => {
            (major(*version) == SUPPORTED_MAJOR).then_some(*version)
        }
        _ => None,
    }
}
