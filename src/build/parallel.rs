// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Parallel channel loading.
//!
//! Reading and parsing channel files is the only slow part of a build, and
//! every file is independent. Rayon's indexed `par_iter` keeps manifest order
//! when collecting, so the catalog comes out the same as a sequential load.

use std::fs;
use std::path::Path;

use anyhow::Context;

#[cfg(feature = "parallel")]
use indicatif::ProgressBar;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::types::ChannelSource;

use super::CatalogManifest;

fn load_channel(input_dir: &Path, filename: &str) -> anyhow::Result<ChannelSource> {
    let path = input_dir.join(filename);
    let content =
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str::<ChannelSource>(&content)
        .with_context(|| format!("Invalid JSON in {}", filename))
}

/// Load every channel listed in the manifest, in manifest order.
#[cfg(feature = "parallel")]
pub fn load_channels(
    input_dir: &Path,
    manifest: &CatalogManifest,
) -> anyhow::Result<Vec<ChannelSource>> {
    manifest
        .channels
        .par_iter()
        .map(|filename| load_channel(input_dir, filename))
        .collect()
}

#[cfg(not(feature = "parallel"))]
pub fn load_channels(
    input_dir: &Path,
    manifest: &CatalogManifest,
) -> anyhow::Result<Vec<ChannelSource>> {
    manifest
        .channels
        .iter()
        .map(|filename| load_channel(input_dir, filename))
        .collect()
}

/// Load all channels in parallel with progress reporting.
#[cfg(feature = "parallel")]
pub fn load_channels_with_progress(
    input_dir: &Path,
    manifest: &CatalogManifest,
    progress: &ProgressBar,
) -> anyhow::Result<Vec<ChannelSource>> {
    let counter = AtomicUsize::new(0);
    let total = manifest.channels.len();

    manifest
        .channels
        .par_iter()
        .map(|filename| {
            let channel = load_channel(input_dir, filename)?;

            let count = counter.fetch_add(1, Ordering::Relaxed) + 1;
            progress.set_position(count as u64);
            if count % 10 == 0 || count == total {
                progress.set_message(format!("{}/{}", count, total));
            }

            Ok(channel)
        })
        .collect()
}

/// Non-parallel fallback (no progress).
#[cfg(not(feature = "parallel"))]
pub fn load_channels_with_progress(
    input_dir: &Path,
    manifest: &CatalogManifest,
) -> anyhow::Result<Vec<ChannelSource>> {
    load_channels(input_dir, manifest)
}
