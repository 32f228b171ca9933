// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Encoder: intern, then emit.
//!
//! Interning walks the source once in a fixed order (channel category, channel
//! tags, then each entry's tags and authors) and hands out table indices in
//! first-seen order. The result is an ordinary [`CatalogIndex`], which
//! [`encode_index`] writes field by field. Decoding that buffer gives an equal
//! index back. The output is canonical (shortest varints), so a decoded buffer
//! that used overlong varints re-encodes shorter but to the same index.

use log::debug;

use crate::error::EncodeError;
use crate::types::{CatalogIndex, CatalogSource, ChannelRecord, EntryRecord, ImagePath};
use crate::util::dict_table::DictTables;

use super::encoding::{
    encode_indices, encode_opt_i64, encode_string, encode_string_table, encode_varint,
};
use super::header::{
    check_file_size, check_version, CatalogHeader, FLAG_ABSENT, FLAG_NULL, FLAG_PRESENT,
    MAGIC, VERSION,
};

/// Encode a source catalog.
///
/// Entries without codes are rejected before anything is interned or written.
pub fn encode(source: &CatalogSource) -> Result<Vec<u8>, EncodeError> {
    let index = CatalogIndex::from_source(source)?;
    encode_index(&index)
}

/// Write a decoded (or interned) index verbatim.
///
/// Tables and raw indices are emitted as they are, dangling ones included, so
/// `decode(encode_index(i)) == i`. An index carrying a version this crate
/// cannot read back is rejected, as is output larger than the decoder accepts.
pub fn encode_index(index: &CatalogIndex) -> Result<Vec<u8>, EncodeError> {
    check_version(index.version, MAGIC.len())?;

    for channel in &index.channels {
        if let Some(entry) = channel.entries.iter().find(|e| e.codes.is_empty()) {
            return Err(EncodeError::EmptyCodes {
                channel_code: channel.code.clone(),
                entry_id: entry.id.clone(),
            });
        }
    }

    let mut buf = Vec::new();
    CatalogHeader {
        version: index.version,
        schema_updated_at: index.schema_updated_at,
    }
    .write(&mut buf);
    encode_string(&index.schema_styles, "schema_styles", &mut buf)?;

    encode_string_table(&index.categories, "category_table", &mut buf)?;
    encode_string_table(&index.tags, "tag_table", &mut buf)?;
    encode_string_table(&index.authors, "author_table", &mut buf)?;

    encode_varint(index.channels.len() as u64, &mut buf);
    for channel in &index.channels {
        write_channel(channel, &mut buf)?;
    }

    check_file_size(buf.len())?;

    debug!(
        "encoded catalog: {} channels, {} entries, {} bytes",
        index.channels.len(),
        index.entry_count(),
        buf.len()
    );

    Ok(buf)
}

fn write_channel(channel: &ChannelRecord, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    encode_string(&channel.code, "channel.code", buf)?;
    encode_string(&channel.name, "channel.name", buf)?;
    encode_string(&channel.description, "channel.description", buf)?;
    encode_varint(channel.category, buf);
    encode_string(&channel.path, "channel.path", buf)?;
    encode_indices(&channel.tags, buf);

    encode_varint(channel.entries.len() as u64, buf);
    for entry in &channel.entries {
        write_entry(entry, buf)?;
    }
    Ok(())
}

fn write_entry(entry: &EntryRecord, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    encode_string(&entry.id, "entry.id", buf)?;
    encode_string(&entry.name, "entry.name", buf)?;
    encode_varint(entry.codes.len() as u64, buf);
    for code in &entry.codes {
        encode_string(code, "entry.codes", buf)?;
    }
    encode_indices(&entry.tags, buf);
    encode_indices(&entry.authors, buf);
    encode_opt_i64(entry.updated_at, buf);
    encode_opt_i64(entry.archived_at, buf);
    encode_string(&entry.path, "entry.path", buf)?;

    match &entry.main_image_path {
        ImagePath::Absent => buf.push(FLAG_ABSENT),
        ImagePath::Null => buf.push(FLAG_NULL),
        ImagePath::Path(p) => {
            buf.push(FLAG_PRESENT);
            encode_string(p, "entry.main_image_path", buf)?;
        }
    }
    Ok(())
}

impl CatalogIndex {
    /// Intern a source catalog into table form.
    pub fn from_source(source: &CatalogSource) -> Result<Self, EncodeError> {
        for channel in &source.channels {
            if let Some(entry) = channel.entries.iter().find(|e| e.codes.is_empty()) {
                return Err(EncodeError::EmptyCodes {
                    channel_code: channel.code.clone(),
                    entry_id: entry.id.clone(),
                });
            }
        }

        let mut tables = DictTables::new();
        let mut channels = Vec::with_capacity(source.channels.len());

        for channel in &source.channels {
            let category = tables.categories.insert(&channel.category);
            let tags = tables.tags.insert_all(&channel.tags);

            let entries = channel
                .entries
                .iter()
                .map(|entry| EntryRecord {
                    id: entry.id.clone(),
                    name: entry.name.clone(),
                    codes: entry.codes.clone(),
                    tags: tables.tags.insert_all(&entry.tags),
                    authors: tables.authors.insert_all(&entry.authors),
                    updated_at: entry.updated_at,
                    archived_at: entry.archived_at,
                    path: entry.path.clone(),
                    main_image_path: entry.main_image_path.clone(),
                })
                .collect();

            channels.push(ChannelRecord {
                code: channel.code.clone(),
                name: channel.name.clone(),
                description: channel.description.clone(),
                category,
                path: channel.path.clone(),
                tags,
                entries,
            });
        }

        debug!(
            "interned {} strings (categories {}, tags {}, authors {})",
            tables.total_entries(),
            tables.categories.len(),
            tables.tags.len(),
            tables.authors.len()
        );

        Ok(Self {
            version: VERSION,
            schema_updated_at: source.schema_updated_at,
            schema_styles: source.schema_styles.clone(),
            categories: tables.categories.into_strings(),
            tags: tables.tags.into_strings(),
            authors: tables.authors.into_strings(),
            channels,
        })
    }

    /// Shorthand for [`encode_index`].
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        encode_index(self)
    }
}
