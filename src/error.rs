// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types for catalog encoding and decoding.
//!
//! Two tiers. Structural problems (bad magic, truncation, broken UTF-8, an entry
//! without codes) are a [`FormatError`] and abort the whole decode: there is no
//! safe partial catalog. Dangling table references are not errors at all; the
//! projector drops them (see `view.rs`).

use thiserror::Error;

/// What went wrong while reading or writing the binary layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatErrorKind {
    #[error("invalid magic: expected {expected:?}, got {found:?}")]
    BadMagic { expected: [u8; 4], found: [u8; 4] },

    #[error("unsupported version {found:#04x} (supported major {supported_major})")]
    UnsupportedVersion { found: u8, supported_major: u8 },

    #[error("truncated: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: u64, remaining: usize },

    #[error("varint exceeds maximum length")]
    VarintOverflow,

    #[error("length {len} exceeds limit {max}")]
    LengthTooLarge { len: u64, max: u64 },

    #[error("invalid UTF-8")]
    InvalidUtf8,

    #[error("unknown flag byte {0:#04x}")]
    InvalidFlag(u8),

    #[error("entry has no codes")]
    EmptyCodes,

    #[error("{0} trailing bytes after last channel")]
    TrailingBytes(usize),

    #[error("buffer of {size} bytes exceeds limit {max}")]
    FileTooLarge { size: usize, max: usize },
}

/// A structural error, located by byte offset and field name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} at byte {offset}: {kind}")]
pub struct FormatError {
    /// Byte offset where the offending field starts
    pub offset: usize,
    /// Field being read or written (e.g. "entry.codes")
    pub field: &'static str,
    pub kind: FormatErrorKind,
}

impl FormatError {
    pub fn new(offset: usize, field: &'static str, kind: FormatErrorKind) -> Self {
        Self {
            offset,
            field,
            kind,
        }
    }

    /// True when the buffer simply ended early.
    pub fn is_truncation(&self) -> bool {
        matches!(self.kind, FormatErrorKind::Truncated { .. })
    }
}

/// Errors from [`encode`](crate::encode) and [`encode_index`](crate::encode_index).
///
/// Rejected inputs, never corrupt output.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("entry {entry_id:?} in channel {channel_code:?} has no codes")]
    EmptyCodes {
        channel_code: String,
        entry_id: String,
    },

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Decode result alias.
pub type Result<T> = std::result::Result<T, FormatError>;
