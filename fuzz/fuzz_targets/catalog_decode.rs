// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Catalog decoding under adversarial input.
//!
//! Catalogs are fetched from a CDN and may be stale, truncated by a proxy, or
//! simply not a catalog. The worst case must be an error, never a panic or a
//! huge allocation from a forged count.

#![no_main]

use catalex::{decode, encode_index, project};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(index) = decode(data) else {
        return;
    };

    // Whatever decodes re-encodes to the same index. Bytes may differ:
    // overlong varints in the input come back in shortest form.
    let bytes = encode_index(&index).expect("decoded index re-encodes");
    assert!(bytes.len() <= data.len());
    assert_eq!(decode(&bytes).expect("re-encoded index decodes"), index);

    // Dangling references are dropped, never fatal
    let view = project(&index);
    assert_eq!(view.posts.len(), index.entry_count());
    assert!(view.posts.iter().all(|p| p.channel < view.channels.len()));
    for pair in view.posts.windows(2) {
        assert!(pair[0].updated_at >= pair[1].updated_at);
    }
});
