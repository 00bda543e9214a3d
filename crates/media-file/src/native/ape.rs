// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! APE item list, used by Monkey's Audio, Musepack and WavPack files.

use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApeValue {
    /// One or more UTF-8 strings
    Text(Vec<String>),
    Binary(Vec<u8>),
    /// An external reference, e.g. a URL
    Locator(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApeItem {
    pub key: String,
    pub value: ApeValue,
}

impl ApeItem {
    #[must_use]
    pub fn text(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            value: ApeValue::Text(values),
        }
    }

    #[must_use]
    pub fn binary(key: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            value: ApeValue::Binary(data),
        }
    }
}

/// Items ordered by their case-insensitive key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApeTag {
    items: BTreeMap<String, ApeItem>,
}

fn lookup_key(key: &str) -> String {
    key.to_uppercase()
}

impl ApeTag {
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

    pub fn items(&self) -> impl Iterator<Item = &ApeItem> {
        self.items.values()
    }

    #[must_use]
    pub fn item(&self, key: &str) -> Option<&ApeItem> {
        self.items.get(&lookup_key(key))
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(&lookup_key(key))
    }

    /// Insert or replace the item with the same key.
    pub fn insert(&mut self, item: ApeItem) -> Option<ApeItem> {
        self.items.insert(lookup_key(&item.key), item)
    }

    pub fn remove(&mut self, key: &str) -> Option<ApeItem> {
        self.items.remove(&lookup_key(key))
    }

    pub fn retain(&mut self, mut f: impl FnMut(&ApeItem) -> bool) {
        self.items.retain(|_, item| f(item));
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
