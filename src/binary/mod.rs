// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary format for catalex catalogs.
//!
//! One buffer holds the whole archive: every channel, every entry, and the
//! three string tables their tags, authors and categories point into. The
//! browser fetches it in a single request and decodes it in a single forward
//! pass. Repeated strings live once in a table; everything else refers to them
//! by varint index, which is one byte for any table under 128 entries.
//!
//! # Security Considerations
//!
//! This format is designed to be safely parsed from untrusted sources:
//! - Buffer size is capped at MAX_FILE_SIZE
//! - Every count and length is checked against the bytes that remain before
//!   anything is allocated
//! - Varint decoder stops at MAX_VARINT_BYTES and rejects u64 overflow
//! - Trailing bytes after the last channel are an error
//!
//! # Format Overview (v1.0)
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ HEADER                                                     │
//! │   magic: [u8; 4] = "CTLX"                                  │
//! │   version: u8 = 0x10 (major 1, minor 0)                    │
//! │   schema_updated_at: flag u8 + i64 LE                      │
//! ├────────────────────────────────────────────────────────────┤
//! │ SCHEMA_STYLES: varint len + UTF-8 JSON (opaque)            │
//! ├────────────────────────────────────────────────────────────┤
//! │ CATEGORY_TABLE: varint count + strings                     │
//! │ TAG_TABLE:      varint count + strings                     │
//! │ AUTHOR_TABLE:   varint count + strings                     │
//! ├────────────────────────────────────────────────────────────┤
//! │ CHANNELS: varint count, then per channel                   │
//! │   code, name, description: string                          │
//! │   category: varint index                                   │
//! │   path: string                                             │
//! │   tags: varint count + varint indices                      │
//! │   entries: varint count, then per entry                    │
//! │     id, name: string                                       │
//! │     codes: varint count (>= 1) + strings                   │
//! │     tags, authors: varint count + varint indices           │
//! │     updated_at, archived_at: flag u8 + i64 LE              │
//! │     path: string                                           │
//! │     main_image_path: flag u8 (0 absent, 1 string, 2 null)  │
//! │                      + string when flag = 1                │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Strings are a varint byte length followed by UTF-8. The buffer ends
//! exactly after the last channel.

// Submodules
mod decode;
mod encode;
mod encoding;
mod header;

// Re-export from submodules for public API
pub use decode::decode;
pub use encode::{encode, encode_index};
pub use encoding::{
    check_len, decode_varint, encode_indices, encode_opt_i64, encode_string,
    encode_string_table, encode_varint, Reader,
};
pub use header::{
    check_file_size, check_version, major, sniff, CatalogHeader, FLAG_ABSENT, FLAG_NULL,
    FLAG_PRESENT, MAGIC, MAX_FILE_SIZE, MAX_STRING_LEN, MAX_VARINT_BYTES, MIN_CHANNEL_BYTES,
    MIN_ENTRY_BYTES, SUPPORTED_MAJOR, VERSION,
};
