//! Encode → decode → project round-trips.

use catalex::{decode, encode, encode_index, project, CatalogIndex, CatalogSource, ImagePath};

use crate::common::{
    assert_view_well_formed, make_channel, make_entry, sample_source, source_facts, view_facts,
};

#[test]
fn test_sample_roundtrip_preserves_facts() {
    let source = sample_source();
    let view = project(&decode(&encode(&source).unwrap()).unwrap());

    assert_view_well_formed(&view);
    assert_eq!(view_facts(&view), source_facts(&source));
}

#[test]
fn test_roundtrip_preserves_channel_fields_and_order() {
    let source = sample_source();
    let index = decode(&encode(&source).unwrap()).unwrap();

    let codes: Vec<_> = index.channels.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["rs", "farms", "empty"]);

    let view = project(&index);
    for (channel, original) in view.channels.iter().zip(&source.channels) {
        assert_eq!(channel.name, original.name);
        assert_eq!(channel.description, original.description);
        assert_eq!(channel.category, original.category);
        assert_eq!(channel.path, original.path);
        assert_eq!(channel.tags, original.tags);
    }
}

#[test]
fn test_roundtrip_preserves_entry_order_within_channel() {
    let source = sample_source();
    let index = decode(&encode(&source).unwrap()).unwrap();
    let ids: Vec<_> = index.channels[0].entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["door", "clock", "undated"]);
}

#[test]
fn test_roundtrip_keeps_schema_fields_verbatim() {
    let source = sample_source();
    let index = decode(&encode(&source).unwrap()).unwrap();
    assert_eq!(index.schema_updated_at, Some(50));
    assert_eq!(index.schema_styles, source.schema_styles);
    assert_eq!(index.schema_styles_value().unwrap()["tagColors"]["redstone"], "red");
}

#[test]
fn test_roundtrip_keeps_codes_and_image_states() {
    let view = project(&decode(&encode(&sample_source()).unwrap()).unwrap());

    let door = view.post_by_code("RS-DOOR-OLD").unwrap();
    assert_eq!(door.id, "door");
    assert_eq!(door.canonical_code(), Some("DOOR"));
    assert_eq!(door.main_image_path.as_deref(), Some("img/door.png"));

    assert_eq!(view.post_by_id("clock").unwrap().main_image_path, ImagePath::Null);
    assert_eq!(view.post_by_id("undated").unwrap().main_image_path, ImagePath::Absent);
}

#[test]
fn test_dedup_500_entries_sharing_a_tag() {
    let entries = (0..500)
        .map(|i| make_entry(&format!("e{}", i), "Clock", &["redstone"], Some(i)))
        .collect();
    let source = CatalogSource {
        channels: vec![make_channel("rs", "Redstone", entries)],
        ..Default::default()
    };

    let index = decode(&encode(&source).unwrap()).unwrap();
    assert_eq!(index.tags.len(), 1);

    let view = project(&index);
    assert_eq!(view.posts.len(), 500);
    assert!(view.posts.iter().all(|p| p.tags == vec!["redstone"]));
    assert_eq!(view.posts[0].id, "e499");
}

#[test]
fn test_shared_strings_shrink_the_buffer() {
    let make = |tag: &dyn Fn(usize) -> String| {
        let entries = (0..200)
            .map(|i| {
                let t = tag(i);
                make_entry(&format!("e{}", i), "Build", &[t.as_str()], None)
            })
            .collect();
        CatalogSource {
            channels: vec![make_channel("rs", "Redstone", entries)],
            ..Default::default()
        }
    };
    let shared = encode(&make(&|_| "redstone-contraption".to_string())).unwrap();
    let unique = encode(&make(&|i| format!("redstone-contraption-{}", i))).unwrap();
    assert!(shared.len() < unique.len());
}

#[test]
fn test_encode_is_deterministic() {
    let a = encode(&sample_source()).unwrap();
    let b = encode(&sample_source()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_reencode_decoded_index_is_byte_identical() {
    let bytes = encode(&sample_source()).unwrap();
    let index = decode(&bytes).unwrap();
    assert_eq!(encode_index(&index).unwrap(), bytes);
}

#[test]
fn test_empty_catalog() {
    let bytes = encode(&CatalogSource::default()).unwrap();
    let index = decode(&bytes).unwrap();
    assert_eq!(index, CatalogIndex::default());

    let view = project(&index);
    assert!(view.posts.is_empty());
    assert_eq!(view.updated_at, 0);
}
