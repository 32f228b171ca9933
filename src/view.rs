// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Catalog projector: raw index in, renderable view out.
//!
//! This is where table references finally become strings. Resolution is
//! lenient: an index past the end of its table is dropped (tags, authors) or
//! becomes `""` (category). Projection never fails.
//!
//! Posts from every channel are flattened into one list and sorted newest
//! first by effective updated time. The sort is stable and puts posts without
//! a timestamp last, in buffer order.

use std::collections::HashSet;

use log::debug;
use serde::Serialize;

use crate::types::{resolve, CatalogIndex, ChannelRecord, EntryRecord, ImagePath};

/// A channel with its category and tags resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelView {
    pub code: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub path: String,
    pub tags: Vec<String>,
}

/// One post, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    /// Index into [`ArchiveView::channels`]
    pub channel: usize,
    pub id: String,
    pub name: String,
    pub codes: Vec<String>,
    pub tags: Vec<String>,
    pub authors: Vec<String>,
    /// Effective updated time
    pub updated_at: Option<i64>,
    /// Effective archived time
    pub archived_at: Option<i64>,
    pub path: String,
    #[serde(skip_serializing_if = "ImagePath::is_absent")]
    pub main_image_path: ImagePath,
}

impl PostView {
    pub fn canonical_code(&self) -> Option<&str> {
        self.codes.first().map(String::as_str)
    }
}

/// Read-only snapshot handed to rendering code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveView {
    pub channels: Vec<ChannelView>,
    /// All posts, newest first
    pub posts: Vec<PostView>,
    /// Catalog freshness, 0 when nothing carries a timestamp
    pub updated_at: i64,
}

impl ArchiveView {
    /// Find a post by any of its codes, canonical or alias.
    pub fn post_by_code(&self, code: &str) -> Option<&PostView> {
        self.posts.iter().find(|p| p.codes.iter().any(|c| c == code))
    }

    pub fn post_by_id(&self, id: &str) -> Option<&PostView> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn channel_of(&self, post: &PostView) -> Option<&ChannelView> {
        self.channels.get(post.channel)
    }

    /// Whether this snapshot is fresher than another one's timestamp.
    pub fn is_newer_than(&self, updated_at: i64) -> bool {
        self.updated_at > updated_at
    }

    /// The newest `n` posts.
    pub fn latest(&self, n: usize) -> &[PostView] {
        &self.posts[..n.min(self.posts.len())]
    }
}

/// Resolve indices against a table: first-seen order, duplicates and
/// out-of-range indices skipped. Returns the strings and the number dropped.
fn resolve_all(table: &[String], indices: &[u64]) -> (Vec<String>, usize) {
    let mut seen = HashSet::with_capacity(indices.len());
    let mut out = Vec::with_capacity(indices.len());
    let mut dropped = 0;
    for &idx in indices {
        match resolve(table, idx) {
            Some(s) => {
                if seen.insert(s) {
                    out.push(s.to_string());
                }
            }
            None => dropped += 1,
        }
    }
    (out, dropped)
}

fn project_channel(
    index: &CatalogIndex,
    channel: &ChannelRecord,
    dropped: &mut usize,
) -> ChannelView {
    let category = match resolve(&index.categories, channel.category) {
        Some(c) => c.to_string(),
        None => {
            *dropped += 1;
            String::new()
        }
    };
    let (tags, n) = resolve_all(&index.tags, &channel.tags);
    *dropped += n;

    ChannelView {
        code: channel.code.clone(),
        name: channel.name.clone(),
        description: channel.description.clone(),
        category,
        path: channel.path.clone(),
        tags,
    }
}

fn project_entry(
    index: &CatalogIndex,
    channel: usize,
    entry: &EntryRecord,
    dropped: &mut usize,
) -> PostView {
    let (tags, t) = resolve_all(&index.tags, &entry.tags);
    let (authors, a) = resolve_all(&index.authors, &entry.authors);
    *dropped += t + a;

    PostView {
        channel,
        id: entry.id.clone(),
        name: entry.name.clone(),
        codes: entry.codes.clone(),
        tags,
        authors,
        updated_at: entry.effective_updated(),
        archived_at: entry.effective_archived(),
        path: entry.path.clone(),
        main_image_path: entry.main_image_path.clone(),
    }
}

/// Build the application view of a decoded catalog.
pub fn project(index: &CatalogIndex) -> ArchiveView {
    let mut dropped = 0;
    let mut channels = Vec::with_capacity(index.channels.len());
    let mut posts = Vec::with_capacity(index.entry_count());

    for (ci, channel) in index.channels.iter().enumerate() {
        channels.push(project_channel(index, channel, &mut dropped));
        for entry in &channel.entries {
            posts.push(project_entry(index, ci, entry, &mut dropped));
        }
    }

    // Option<i64> orders None below Some, so reversed it lands last
    posts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    if dropped > 0 {
        debug!("projection dropped {} out-of-range references", dropped);
    }

    ArchiveView {
        channels,
        posts,
        updated_at: index.freshness(),
    }
}
