// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The catalog model, in two shapes.
//!
//! **Decoded** (`CatalogIndex`, `ChannelRecord`, `EntryRecord`): a faithful
//! mirror of the buffer. Tags, authors and categories are raw `u64` indices into
//! the three string tables, kept exactly as read, even when they point past the
//! end of a table. Nothing is resolved here; that is the projector's job.
//!
//! **Source** (`CatalogSource`, `ChannelSource`, `EntrySource`): what the
//! offline build tool reads from JSON and hands to `encode`. References are
//! plain strings; the encoder interns them.
//!
//! # Invariants
//!
//! - `EntryRecord::codes` is never empty (decode rejects it, encode refuses it).
//! - Channel and entry order is buffer order. Nothing sorts during decode.
//! - Effective updated time is `updated_at`, else `archived_at`. Effective
//!   archived time is `archived_at`, else `updated_at`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// IMAGE PATH
// =============================================================================

/// `main_image_path` keeps three states on the wire.
///
/// Absent (field never written) and explicit null read the same to every
/// current consumer, but the distinction survives a round-trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ImagePath {
    #[default]
    Absent,
    Null,
    Path(String),
}

impl ImagePath {
    pub fn is_absent(&self) -> bool {
        matches!(self, ImagePath::Absent)
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            ImagePath::Path(p) => Some(p),
            _ => None,
        }
    }
}

impl Serialize for ImagePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ImagePath::Path(p) => serializer.serialize_str(p),
            ImagePath::Absent | ImagePath::Null => serializer.serialize_none(),
        }
    }
}

/// A present-but-null JSON field becomes `Null`; a missing field stays
/// `Absent` through `#[serde(default)]`.
impl<'de> Deserialize<'de> for ImagePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<String>::deserialize(deserializer)? {
            Some(p) => ImagePath::Path(p),
            None => ImagePath::Null,
        })
    }
}

// =============================================================================
// DECODED MODEL
// =============================================================================

/// One archived post as laid out in the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRecord {
    pub id: String,
    pub name: String,
    /// `codes[0]` is canonical
    pub codes: Vec<String>,
    pub tags: Vec<u64>,
    pub authors: Vec<u64>,
    pub updated_at: Option<i64>,
    pub archived_at: Option<i64>,
    pub path: String,
    #[serde(skip_serializing_if = "ImagePath::is_absent")]
    pub main_image_path: ImagePath,
}

impl EntryRecord {
    /// Time used for display and recency sorting.
    #[inline]
    pub fn effective_updated(&self) -> Option<i64> {
        self.updated_at.or(self.archived_at)
    }

    #[inline]
    pub fn effective_archived(&self) -> Option<i64> {
        self.archived_at.or(self.updated_at)
    }

    pub fn canonical_code(&self) -> Option<&str> {
        self.codes.first().map(String::as_str)
    }
}

/// One channel as laid out in the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRecord {
    pub code: String,
    pub name: String,
    pub description: String,
    pub category: u64,
    pub path: String,
    pub tags: Vec<u64>,
    pub entries: Vec<EntryRecord>,
}

/// The decoded root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogIndex {
    pub version: u8,
    pub schema_updated_at: Option<i64>,
    /// Opaque JSON text, returned verbatim
    pub schema_styles: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub authors: Vec<String>,
    pub channels: Vec<ChannelRecord>,
}

impl Default for CatalogIndex {
    fn default() -> Self {
        Self {
            version: crate::binary::VERSION,
            schema_updated_at: None,
            schema_styles: String::new(),
            categories: Vec::new(),
            tags: Vec::new(),
            authors: Vec::new(),
            channels: Vec::new(),
        }
    }
}

/// Out-of-range references found in a decoded catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DanglingRefs {
    pub categories: usize,
    pub tags: usize,
    pub authors: usize,
}

impl DanglingRefs {
    pub fn total(&self) -> usize {
        self.categories + self.tags + self.authors
    }
}

/// Look up a raw table index, treating anything out of range as absent.
#[inline]
pub fn resolve(table: &[String], idx: u64) -> Option<&str> {
    usize::try_from(idx)
        .ok()
        .and_then(|i| table.get(i))
        .map(String::as_str)
}

impl CatalogIndex {
    pub fn entry_count(&self) -> usize {
        self.channels.iter().map(|c| c.entries.len()).sum()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&ChannelRecord, &EntryRecord)> {
        self.channels
            .iter()
            .flat_map(|c| c.entries.iter().map(move |e| (c, e)))
    }

    /// Max of `schema_updated_at` and every entry's effective updated time.
    ///
    /// Zero when nothing carries a timestamp.
    pub fn freshness(&self) -> i64 {
        self.entries()
            .filter_map(|(_, e)| e.effective_updated())
            .chain(self.schema_updated_at)
            .max()
            .unwrap_or(0)
    }

    /// Count references that point past the end of their table.
    pub fn dangling_references(&self) -> DanglingRefs {
        let mut refs = DanglingRefs::default();
        for channel in &self.channels {
            if resolve(&self.categories, channel.category).is_none() {
                refs.categories += 1;
            }
            refs.tags += channel
                .tags
                .iter()
                .filter(|&&t| resolve(&self.tags, t).is_none())
                .count();
            for entry in &channel.entries {
                refs.tags += entry
                    .tags
                    .iter()
                    .filter(|&&t| resolve(&self.tags, t).is_none())
                    .count();
                refs.authors += entry
                    .authors
                    .iter()
                    .filter(|&&a| resolve(&self.authors, a).is_none())
                    .count();
            }
        }
        refs
    }

    /// Parse the styles blob on demand. An empty blob reads as `null`.
    pub fn schema_styles_value(&self) -> serde_json::Result<serde_json::Value> {
        if self.schema_styles.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&self.schema_styles)
    }
}

// =============================================================================
// SOURCE MODEL
// =============================================================================

/// Keep any JSON value as compact text; missing or null becomes "".
pub(crate) fn raw_json<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

/// One post as the build tool reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySource {
    pub id: String,
    pub name: String,
    pub codes: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<i64>,
    #[serde(default)]
    pub archived_at: Option<i64>,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "ImagePath::is_absent")]
    pub main_image_path: ImagePath,
}

impl EntrySource {
    pub fn effective_updated(&self) -> Option<i64> {
        self.updated_at.or(self.archived_at)
    }

    pub fn effective_archived(&self) -> Option<i64> {
        self.archived_at.or(self.updated_at)
    }
}

/// One channel file as the build tool reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSource {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub entries: Vec<EntrySource>,
}

impl ChannelSource {
    /// Append every tag used by an entry that the channel does not list yet.
    pub fn fill_tags(&mut self) {
        let mut seen: std::collections::HashSet<String> = self.tags.iter().cloned().collect();
        for entry in &self.entries {
            for tag in &entry.tags {
                if seen.insert(tag.clone()) {
                    self.tags.push(tag.clone());
                }
            }
        }
    }
}

/// Everything `encode` needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSource {
    #[serde(default)]
    pub schema_updated_at: Option<i64>,
    #[serde(default, deserialize_with = "raw_json")]
    pub schema_styles: String,
    #[serde(default)]
    pub channels: Vec<ChannelSource>,
}

impl CatalogSource {
    /// Derive each channel's tag set from its entries.
    pub fn fill_channel_tags(&mut self) {
        for channel in &mut self.channels {
            channel.fill_tags();
        }
    }

    pub fn entry_count(&self) -> usize {
        self.channels.iter().map(|c| c.entries.len()).sum()
    }
}
