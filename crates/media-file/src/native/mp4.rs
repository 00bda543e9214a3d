// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! MP4 `ilst` atoms.

use std::collections::BTreeMap;

/// Image format code of a `covr` data atom.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mp4ImageFormat {
    #[default]
    Jpeg,
    Png,
    Bmp,
    Gif,
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mp4CoverArt {
    pub format: Mp4ImageFormat,
    pub data: Vec<u8>,
}

/// Typed value of an item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mp4Value {
    Text(Vec<String>),
    Bool(bool),
    Int(i32),
    IntPair(i32, i32),
    Byte(u8),
    UInt(u32),
    LongLong(i64),
    CoverArt(Vec<Mp4CoverArt>),
    /// Opaque binary data, e.g. a `stem` atom
    Binary(Vec<u8>),
}

/// Items ordered by their key.
///
/// Free-form items are keyed as `----:<mean>:<name>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mp4Tag {
    items: BTreeMap<String, Mp4Value>,
}

impl Mp4Tag {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> impl Iterator<Item = (&str, &Mp4Value)> {
        self.items.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Mp4Value> {
        self.items.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Mp4Value) -> Option<Mp4Value> {
        self.items.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Mp4Value> {
        self.items.remove(key)
    }

    pub fn retain(&mut self, mut f: impl FnMut(&str, &Mp4Value) -> bool) {
        self.items.retain(|key, value| f(key, value));
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
