//! Projection rules checked through real buffers.

use catalex::binary::{
    encode_indices, encode_opt_i64, encode_string, encode_string_table, encode_varint,
    CatalogHeader, FLAG_ABSENT,
};
use catalex::{decode, encode, project, CatalogSource};

use crate::common::{assert_view_well_formed, make_channel, make_entry, make_entry_full};

/// One channel, one entry. The entry's tags are `[0, tag_table_len]`, so the
/// second one points one past the end of the table.
fn buffer_with_dangling_tag() -> Vec<u8> {
    let tags = vec!["redstone".to_string(), "piston".to_string()];
    let mut buf = Vec::new();
    CatalogHeader::new(None).write(&mut buf);
    encode_string("", "schema_styles", &mut buf).unwrap();
    encode_string_table(&[], "category_table", &mut buf).unwrap();
    encode_string_table(&tags, "tag_table", &mut buf).unwrap();
    encode_string_table(&[], "author_table", &mut buf).unwrap();

    encode_varint(1, &mut buf);
    encode_string("rs", "channel.code", &mut buf).unwrap();
    encode_string("Redstone", "channel.name", &mut buf).unwrap();
    encode_string("", "channel.description", &mut buf).unwrap();
    encode_varint(0, &mut buf); // category 0 of an empty table
    encode_string("rs", "channel.path", &mut buf).unwrap();
    encode_indices(&[1, 2], &mut buf);

    encode_varint(1, &mut buf);
    encode_string("e1", "entry.id", &mut buf).unwrap();
    encode_string("Door", "entry.name", &mut buf).unwrap();
    encode_varint(1, &mut buf);
    encode_string("RS1", "entry.codes", &mut buf).unwrap();
    encode_indices(&[0, tags.len() as u64], &mut buf);
    encode_indices(&[7], &mut buf);
    encode_opt_i64(Some(42), &mut buf);
    encode_opt_i64(None, &mut buf);
    encode_string("door", "entry.path", &mut buf).unwrap();
    buf.push(FLAG_ABSENT);
    buf
}

#[test]
fn test_dangling_tag_index_is_dropped() {
    let index = decode(&buffer_with_dangling_tag()).unwrap();
    let refs = index.dangling_references();
    assert_eq!(refs.categories, 1);
    assert_eq!(refs.tags, 2);
    assert_eq!(refs.authors, 1);

    let view = project(&index);
    assert_view_well_formed(&view);
    let post = &view.posts[0];
    assert_eq!(post.tags, vec!["redstone"]);
    assert!(post.authors.is_empty());
    assert_eq!(view.channels[0].category, "");
    assert_eq!(view.channels[0].tags, vec!["piston"]);
    assert_eq!(view.updated_at, 42);
}

fn source_with_times(times: &[Option<i64>]) -> CatalogSource {
    let entries = times
        .iter()
        .enumerate()
        .map(|(i, &t)| make_entry(&format!("e{}", i), "Entry", &[], t))
        .collect();
    CatalogSource {
        channels: vec![make_channel("c", "", entries)],
        ..Default::default()
    }
}

#[test]
fn test_sort_newest_first_missing_last_stable() {
    let source = source_with_times(&[Some(100), None, Some(50), None]);
    let view = project(&decode(&encode(&source).unwrap()).unwrap());

    let order: Vec<_> = view.posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(order, vec!["e0", "e2", "e1", "e3"]);
    let times: Vec<_> = view.posts.iter().map(|p| p.updated_at).collect();
    assert_eq!(times, vec![Some(100), Some(50), None, None]);
}

#[test]
fn test_sort_merges_channels() {
    let source = CatalogSource {
        channels: vec![
            make_channel("a", "", vec![make_entry("a1", "A1", &[], Some(1))]),
            make_channel("b", "", vec![make_entry("b1", "B1", &[], Some(3))]),
            make_channel("c", "", vec![make_entry("c1", "C1", &[], Some(2))]),
        ],
        ..Default::default()
    };
    let view = project(&decode(&encode(&source).unwrap()).unwrap());
    let order: Vec<_> = view
        .posts
        .iter()
        .map(|p| view.channel_of(p).unwrap().code.as_str())
        .collect();
    assert_eq!(order, vec!["b", "c", "a"]);
}

#[test]
fn test_archived_time_fills_in_for_sorting() {
    let source = CatalogSource {
        channels: vec![make_channel(
            "c",
            "",
            vec![
                make_entry_full("old", &[], &[], Some(10), None),
                make_entry_full("archived", &[], &[], None, Some(30)),
                make_entry_full("both", &[], &[], Some(20), Some(5)),
            ],
        )],
        ..Default::default()
    };
    let view = project(&decode(&encode(&source).unwrap()).unwrap());
    let order: Vec<_> = view.posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(order, vec!["archived", "both", "old"]);

    let both = view.post_by_id("both").unwrap();
    assert_eq!(both.updated_at, Some(20));
    assert_eq!(both.archived_at, Some(5));
    let old = view.post_by_id("old").unwrap();
    assert_eq!(old.archived_at, Some(10));
}

#[test]
fn test_freshness_cases() {
    let mut source = source_with_times(&[Some(5), Some(20), None]);
    source.schema_updated_at = Some(10);
    let view = project(&decode(&encode(&source).unwrap()).unwrap());
    assert_eq!(view.updated_at, 20);

    let source = source_with_times(&[Some(5), Some(3)]);
    let index = decode(&encode(&source).unwrap()).unwrap();
    assert_eq!(index.freshness(), 5);
    assert_eq!(project(&index).updated_at, 5);

    let source = source_with_times(&[None]);
    assert_eq!(project(&decode(&encode(&source).unwrap()).unwrap()).updated_at, 0);
}

#[test]
fn test_schema_time_wins_when_newest() {
    let mut source = source_with_times(&[Some(5)]);
    source.schema_updated_at = Some(99);
    let view = project(&decode(&encode(&source).unwrap()).unwrap());
    assert_eq!(view.updated_at, 99);
    assert!(view.is_newer_than(98));
}

#[test]
fn test_view_json_shape() {
    let source = source_with_times(&[Some(7)]);
    let view = project(&decode(&encode(&source).unwrap()).unwrap());
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["updatedAt"], 7);
    assert_eq!(json["posts"][0]["codes"][0], "E0");
    assert_eq!(json["posts"][0]["channel"], 0);
    assert_eq!(json["channels"][0]["code"], "c");
}
