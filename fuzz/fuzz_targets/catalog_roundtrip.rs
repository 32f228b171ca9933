// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Structured fuzzing of encode → decode.
//!
//! Random catalogs, built with `arbitrary`, must survive the trip with every
//! reference resolving to the string it started as.

#![no_main]

use arbitrary::Arbitrary;
use catalex::{decode, encode, project, CatalogSource, ChannelSource, EntrySource, ImagePath};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzEntry {
    id: String,
    first_code: String,
    aliases: Vec<String>,
    tags: Vec<String>,
    authors: Vec<String>,
    updated_at: Option<i64>,
    archived_at: Option<i64>,
    image: Option<Option<String>>,
}

#[derive(Arbitrary, Debug)]
struct FuzzChannel {
    code: String,
    category: String,
    tags: Vec<String>,
    entries: Vec<FuzzEntry>,
}

#[derive(Arbitrary, Debug)]
struct FuzzCatalog {
    schema_updated_at: Option<i64>,
    channels: Vec<FuzzChannel>,
}

fn to_source(input: FuzzCatalog) -> CatalogSource {
    CatalogSource {
        schema_updated_at: input.schema_updated_at,
        schema_styles: String::new(),
        channels: input
            .channels
            .into_iter()
            .map(|c| ChannelSource {
                code: c.code,
                category: c.category,
                tags: c.tags,
                entries: c
                    .entries
                    .into_iter()
                    .map(|e| EntrySource {
                        id: e.id,
                        codes: std::iter::once(e.first_code).chain(e.aliases).collect(),
                        tags: e.tags,
                        authors: e.authors,
                        updated_at: e.updated_at,
                        archived_at: e.archived_at,
                        main_image_path: match e.image {
                            None => ImagePath::Absent,
                            Some(None) => ImagePath::Null,
                            Some(Some(p)) => ImagePath::Path(p),
                        },
                        ..Default::default()
                    })
                    .collect(),
                ..Default::default()
            })
            .collect(),
    }
}

fuzz_target!(|input: FuzzCatalog| {
    let source = to_source(input);
    let bytes = encode(&source).expect("every entry has a code");
    let index = decode(&bytes).expect("encoder output decodes");

    assert_eq!(index.dangling_references().total(), 0);

    for (channel, original) in index.channels.iter().zip(&source.channels) {
        assert_eq!(index.categories[channel.category as usize], original.category);
        for (entry, original) in channel.entries.iter().zip(&original.entries) {
            let tags: Vec<&str> = entry
                .tags
                .iter()
                .map(|&t| index.tags[t as usize].as_str())
                .collect();
            assert_eq!(tags, original.tags);
            assert_eq!(entry.codes, original.codes);
            assert_eq!(entry.main_image_path, original.main_image_path);
        }
    }

    let view = project(&index);
    assert_eq!(view.posts.len(), source.entry_count());
});
