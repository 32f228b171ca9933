// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Single-pass decoder.
//!
//! One forward walk with a [`Reader`]: header, styles blob, three string
//! tables, then channels with their entries inline. No seeking, no lookahead
//! past the next field. Strict about shape, silent about references: table
//! indices are stored raw and never checked here.

use log::{debug, trace, warn};

use crate::error::{FormatError, FormatErrorKind, Result};
use crate::types::{CatalogIndex, ChannelRecord, EntryRecord, ImagePath};

use super::encoding::Reader;
use super::header::{
    check_file_size, CatalogHeader, FLAG_ABSENT, FLAG_NULL, FLAG_PRESENT, MIN_CHANNEL_BYTES,
    MIN_ENTRY_BYTES,
};

/// Decode a catalog buffer.
///
/// Fails with a [`FormatError`] on a bad magic or major version, truncation,
/// invalid UTF-8, an unknown flag byte, an entry with no codes, or bytes left
/// over after the last channel. The buffer is not retained.
pub fn decode(bytes: &[u8]) -> Result<CatalogIndex> {
    check_file_size(bytes.len())?;

    let mut r = Reader::new(bytes);
    let header = CatalogHeader::read(&mut r)?;
    let schema_styles = r.string("schema_styles")?;

    let categories = r.string_table("category_table")?;
    let tags = r.string_table("tag_table")?;
    let authors = r.string_table("author_table")?;

    for (name, table) in [
        ("category", &categories),
        ("tag", &tags),
        ("author", &authors),
    ] {
        if has_duplicates(table) {
            warn!("{} table contains duplicate strings", name);
        }
    }

    let channel_count = r.records("channel_count", MIN_CHANNEL_BYTES)?;
    let mut channels = Vec::with_capacity(channel_count);
    for _ in 0..channel_count {
        channels.push(read_channel(&mut r)?);
    }

    r.finish()?;

    let index = CatalogIndex {
        version: header.version,
        schema_updated_at: header.schema_updated_at,
        schema_styles,
        categories,
        tags,
        authors,
        channels,
    };

    debug!(
        "decoded catalog v{:#04x}: {} channels, {} entries, tables {}/{}/{} ({} bytes)",
        index.version,
        index.channels.len(),
        index.entry_count(),
        index.categories.len(),
        index.tags.len(),
        index.authors.len(),
        bytes.len()
    );

    Ok(index)
}

fn has_duplicates(table: &[String]) -> bool {
    let mut seen = std::collections::HashSet::with_capacity(table.len());
    !table.iter().all(|s| seen.insert(s.as_str()))
}

fn read_channel(r: &mut Reader<'_>) -> Result<ChannelRecord> {
    let code = r.string("channel.code")?;
    let name = r.string("channel.name")?;
    let description = r.string("channel.description")?;
    let category = r.varint("channel.category")?;
    let path = r.string("channel.path")?;
    let tags = r.indices("channel.tags")?;

    let entry_count = r.records("channel.entry_count", MIN_ENTRY_BYTES)?;
    let mut entries = Vec::with_capacity(entry_count);
    for _ in 0..entry_count {
        entries.push(read_entry(r)?);
    }

    trace!("channel {:?}: {} entries", code, entries.len());

    Ok(ChannelRecord {
        code,
        name,
        description,
        category,
        path,
        tags,
        entries,
    })
}

fn read_entry(r: &mut Reader<'_>) -> Result<EntryRecord> {
    let id = r.string("entry.id")?;
    let name = r.string("entry.name")?;

    let at = r.position();
    let code_count = r.count("entry.codes")?;
    if code_count == 0 {
        return Err(FormatError::new(
            at,
            "entry.codes",
            FormatErrorKind::EmptyCodes,
        ));
    }
    let mut codes = Vec::with_capacity(code_count);
    for _ in 0..code_count {
        codes.push(r.string("entry.codes")?);
    }

    let tags = r.indices("entry.tags")?;
    let authors = r.indices("entry.authors")?;
    let updated_at = r.opt_i64("entry.updated_at")?;
    let archived_at = r.opt_i64("entry.archived_at")?;
    let path = r.string("entry.path")?;

    let at = r.position();
    let main_image_path = match r.u8("entry.main_image_path")? {
        FLAG_ABSENT => ImagePath::Absent,
        FLAG_PRESENT => ImagePath::Path(r.string("entry.main_image_path")?),
        FLAG_NULL => ImagePath::Null,
        other => {
            return Err(FormatError::new(
                at,
                "entry.main_image_path",
                FormatErrorKind::InvalidFlag(other),
            ))
        }
    };

    Ok(EntryRecord {
        id,
        name,
        codes,
        tags,
        authors,
        updated_at,
        archived_at,
        path,
        main_image_path,
    })
}
