// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for varint (LEB128) encoding/decoding.
//!
//! Every length, count and table index in a catalog is a varint. A panic here
//! is a panic on any hostile buffer.

#![no_main]

use catalex::binary::{decode_varint, encode_varint, MAX_VARINT_BYTES};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Never panics: Ok or Err only
    let Ok((value, consumed)) = decode_varint(data) else {
        return;
    };

    assert!(consumed >= 1 && consumed <= data.len());
    assert!(consumed <= MAX_VARINT_BYTES, "consumed {} bytes", consumed);

    // Canonical re-encoding decodes to the same value and is no longer
    // than what we read (overlong inputs like 0x80 0x00 shrink)
    let mut reencoded = Vec::new();
    encode_varint(value, &mut reencoded);
    assert!(reencoded.len() <= consumed);
    assert_eq!(decode_varint(&reencoded), Ok((value, reencoded.len())));
});
