//! Random catalogs through encode → decode → project.

use proptest::prelude::*;

use catalex::{
    decode, encode, encode_index, project, CatalogSource, ChannelSource, EntrySource, ImagePath,
};

use crate::common::{assert_view_well_formed, source_facts, view_facts};

// ============================================================================
// STRATEGIES
// ============================================================================

/// Small vocabulary so strings repeat across entries and channels.
fn vocab_word() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "redstone", "piston", "slime", "farm", "iron", "クロック", "tür", "", "a b",
    ])
    .prop_map(str::to_string)
}

fn any_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 éü日本-]{0,12}").unwrap()
}

fn timestamp() -> impl Strategy<Value = Option<i64>> {
    prop_oneof![Just(None), any::<i64>().prop_map(Some), (0i64..1000).prop_map(Some)]
}

fn image_path() -> impl Strategy<Value = ImagePath> {
    prop_oneof![
        Just(ImagePath::Absent),
        Just(ImagePath::Null),
        any_text().prop_map(ImagePath::Path),
    ]
}

fn entry() -> impl Strategy<Value = EntrySource> {
    (
        any_text(),
        any_text(),
        prop::collection::vec(any_text(), 1..4),
        prop::collection::vec(vocab_word(), 0..5),
        prop::collection::vec(vocab_word(), 0..3),
        timestamp(),
        timestamp(),
        any_text(),
        image_path(),
    )
        .prop_map(
            |(id, name, codes, tags, authors, updated_at, archived_at, path, main_image_path)| {
                EntrySource {
                    id,
                    name,
                    codes,
                    tags,
                    authors,
                    updated_at,
                    archived_at,
                    path,
                    main_image_path,
                }
            },
        )
}

fn channel() -> impl Strategy<Value = ChannelSource> {
    (
        any_text(),
        any_text(),
        any_text(),
        vocab_word(),
        any_text(),
        prop::collection::vec(vocab_word(), 0..3),
        prop::collection::vec(entry(), 0..6),
    )
        .prop_map(|(code, name, description, category, path, tags, entries)| ChannelSource {
            code,
            name,
            description,
            category,
            path,
            tags,
            entries,
        })
}

fn catalog() -> impl Strategy<Value = CatalogSource> {
    (timestamp(), prop::collection::vec(channel(), 0..5)).prop_map(|(schema_updated_at, channels)| {
        CatalogSource {
            schema_updated_at,
            schema_styles: String::new(),
            channels,
        }
    })
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Whatever goes in comes back out, references resolved the same way.
    #[test]
    fn prop_roundtrip_preserves_facts(source in catalog()) {
        let bytes = encode(&source).unwrap();
        let view = project(&decode(&bytes).unwrap());
        assert_view_well_formed(&view);
        prop_assert_eq!(view_facts(&view), source_facts(&source));
    }

    /// Re-emitting a decoded index reproduces the buffer exactly.
    #[test]
    fn prop_reencode_is_identity(source in catalog()) {
        let bytes = encode(&source).unwrap();
        let index = decode(&bytes).unwrap();
        prop_assert_eq!(encode_index(&index).unwrap(), bytes);
    }

    /// Interned tables never hold the same string twice.
    #[test]
    fn prop_tables_have_no_duplicates(source in catalog()) {
        let index = decode(&encode(&source).unwrap()).unwrap();
        for table in [&index.categories, &index.tags, &index.authors] {
            let mut sorted = table.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), table.len());
        }
        prop_assert_eq!(index.dangling_references().total(), 0);
    }

    /// Freshness is the max of every timestamp that counts, or zero.
    #[test]
    fn prop_freshness_matches_source(source in catalog()) {
        let expected = source
            .channels
            .iter()
            .flat_map(|c| &c.entries)
            .filter_map(|e| e.effective_updated())
            .chain(source.schema_updated_at)
            .max()
            .unwrap_or(0);
        let view = project(&decode(&encode(&source).unwrap()).unwrap());
        prop_assert_eq!(view.updated_at, expected);
    }

    /// Posts with equal effective time keep buffer order.
    #[test]
    fn prop_sort_is_stable(times in prop::collection::vec(prop::option::of(0i64..4), 0..40)) {
        let entries = times
            .iter()
            .enumerate()
            .map(|(i, &t)| EntrySource {
                id: i.to_string(),
                codes: vec![format!("C{}", i)],
                updated_at: t,
                ..Default::default()
            })
            .collect();
        let source = CatalogSource {
            channels: vec![ChannelSource { entries, ..Default::default() }],
            ..Default::default()
        };
        let view = project(&decode(&encode(&source).unwrap()).unwrap());
        for pair in view.posts.windows(2) {
            if pair[0].updated_at == pair[1].updated_at {
                let a: usize = pair[0].id.parse().unwrap();
                let b: usize = pair[1].id.parse().unwrap();
                prop_assert!(a < b);
            }
        }
    }

    /// Out-of-range indices never panic the projector.
    #[test]
    fn prop_projection_is_total(
        source in catalog(),
        bogus in prop::collection::vec(any::<u64>(), 1..5),
    ) {
        let mut index = decode(&encode(&source).unwrap()).unwrap();
        for channel in &mut index.channels {
            channel.category = bogus[0];
            channel.tags.extend(&bogus);
            for entry in &mut channel.entries {
                entry.tags.extend(&bogus);
                entry.authors.extend(&bogus);
            }
        }
        let view = project(&index);
        assert_view_well_formed(&view);

        // Still decodes after a round-trip with the dangling references in place
        let again = decode(&encode_index(&index).unwrap()).unwrap();
        prop_assert_eq!(again, index);
    }
}
