//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical builders for source catalogs so tests don't each
//! spell out every field.

#![doc(hidden)]

use crate::types::{CatalogSource, ChannelSource, EntrySource, ImagePath};

/// Create an entry with one code derived from its id.
pub fn make_entry(id: &str, name: &str, tags: &[&str], updated_at: Option<i64>) -> EntrySource {
    EntrySource {
        id: id.to_string(),
        name: name.to_string(),
        codes: vec![id.to_uppercase()],
        tags: tags.iter().map(|t| t.to_string()).collect(),
        authors: vec![],
        updated_at,
        archived_at: None,
        path: format!("posts/{}", id),
        main_image_path: ImagePath::Absent,
    }
}

/// Create an entry with authors and an archive time.
pub fn make_entry_full(
    id: &str,
    tags: &[&str],
    authors: &[&str],
    updated_at: Option<i64>,
    archived_at: Option<i64>,
) -> EntrySource {
    EntrySource {
        authors: authors.iter().map(|a| a.to_string()).collect(),
        archived_at,
        ..make_entry(id, &format!("Entry {}", id), tags, updated_at)
    }
}

/// Create a channel; its tag list is left empty.
pub fn make_channel(code: &str, category: &str, entries: Vec<EntrySource>) -> ChannelSource {
    ChannelSource {
        code: code.to_string(),
        name: format!("Channel {}", code),
        description: format!("Everything filed under {}", code),
        category: category.to_string(),
        path: format!("channels/{}", code),
        tags: vec![],
        entries,
    }
}

/// A small catalog touching every field: shared and unique strings, alias
/// codes, missing timestamps, all three image path states.
pub fn sample_source() -> CatalogSource {
    let mut door = make_entry_full(
        "door",
        &["redstone", "piston"],
        &["Ilmango", "Mumbo"],
        Some(300),
        Some(100),
    );
    door.codes.push("RS-DOOR-OLD".to_string());
    door.main_image_path = ImagePath::Path("img/door.png".to_string());

    let mut clock = make_entry_full("clock", &["redstone"], &["Mumbo"], None, Some(200));
    clock.main_image_path = ImagePath::Null;

    let undated = make_entry_full("undated", &["piston", "slime"], &[], None, None);

    let farm = make_entry_full("farm", &["iron", "redstone"], &["Ilmango"], Some(250), None);

    let mut source = CatalogSource {
        schema_updated_at: Some(50),
        schema_styles: r#"{"tagColors":{"redstone":"red"}}"#.to_string(),
        channels: vec![
            make_channel("rs", "Redstone", vec![door, clock, undated]),
            make_channel("farms", "Farming", vec![farm]),
            make_channel("empty", "Redstone", vec![]),
        ],
    };
    source.fill_channel_tags();
    source
}
