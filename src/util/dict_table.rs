// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Interning tables for categories, tags and authors.
//!
//! A tag like "redstone" can sit on hundreds of entries. The encoder stores
//! it once in the tag table and writes a varint index at every use, the way
//! columnar formats dictionary-encode repeated values.
//!
//! Indices are handed out in first-seen order and never reused, so a table
//! built by inserting every reference exactly once holds no duplicates.
//!
//! See Melnik et al. (2010), "Dremel: Interactive Analysis of Web-Scale
//! Datasets", and the Parquet dictionary encoding:
//! <https://parquet.apache.org/docs/file-format/data-pages/encodings/>

use std::collections::HashMap;

use crate::binary::encode_string_table;
use crate::error::Result;

/// First-seen string interner.
#[derive(Debug, Clone, Default)]
pub struct DictTable {
    strings: Vec<String>,
    lookup: HashMap<String, u64>,
}

impl DictTable {
    /// Create an empty dictionary table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `s`, appending it if this is the first time it is seen.
    pub fn insert(&mut self, s: &str) -> u64 {
        if let Some(&idx) = self.lookup.get(s) {
            return idx;
        }

        let idx = self.strings.len() as u64;
        self.strings.push(s.to_string());
        self.lookup.insert(s.to_string(), idx);
        idx
    }

    /// Insert every string, returning their indices in order.
    pub fn insert_all<S: AsRef<str>>(&mut self, items: &[S]) -> Vec<u64> {
        items.iter().map(|s| self.insert(s.as_ref())).collect()
    }

    /// Get a string by its index.
    pub fn get(&self, idx: u64) -> Option<&str> {
        crate::types::resolve(&self.strings, idx)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Interned strings, index order.
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    pub fn into_strings(self) -> Vec<String> {
        self.strings
    }

    /// Write the table as a varint count followed by strings.
    pub fn encode(&self, field: &'static str, buf: &mut Vec<u8>) -> Result<()> {
        encode_string_table(&self.strings, field, buf)
    }
}

/// The three interning tables of a catalog, in wire order.
#[derive(Debug, Clone, Default)]
pub struct DictTables {
    pub categories: DictTable,
    pub tags: DictTable,
    pub authors: DictTable,
}

impl DictTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries across all tables.
    pub fn total_entries(&self) -> usize {
        self.categories.len() + self.tags.len() + self.authors.len()
    }
}
