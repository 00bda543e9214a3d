// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Vorbis comments as used by Ogg Vorbis, Opus, Speex and FLAC.

use std::collections::BTreeMap;

use super::NativePicture;

/// Fields are ordered by their upper-case name. A field name may
/// occur multiple times.
///
/// Only FLAC files store pictures in separate picture blocks. All
/// other containers embed pictures as base64 encoded fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XiphComment {
    vendor: String,
    fields: BTreeMap<String, Vec<String>>,
    pictures: Option<Vec<NativePicture>>,
}

fn field_key(name: &str) -> String {
    name.to_uppercase()
}

impl XiphComment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_picture_blocks() -> Self {
        Self {
            pictures: Some(Vec::new()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn set_vendor(&mut self, vendor: impl Into<String>) {
        self.vendor = vendor.into();
    }

    /// The vendor string does not count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.pictures().is_empty()
    }

    /// Total number of field values.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// All field values in order, flattened.
    pub fn field_values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().flat_map(|(name, values)| {
            values
                .iter()
                .map(move |value| (name.as_str(), value.as_str()))
        })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.fields.get(&field_key(name)).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&field_key(name))
    }

    /// Position of the first value of a field within
    /// [`XiphComment::field_values()`].
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        let key = field_key(name);
        let mut position = 0;
        for (field_name, values) in &self.fields {
            if *field_name == key {
                return Some(position);
            }
            position += values.len();
        }
        None
    }

    /// Add a value, replacing all existing values if requested.
    pub fn add_field(&mut self, name: &str, value: impl Into<String>, replace: bool) {
        let values = self.fields.entry(field_key(name)).or_default();
        if replace {
            values.clear();
        }
        values.push(value.into());
    }

    /// Replace all values of a field.
    ///
    /// An empty list of values removes the field.
    pub fn set_field_values(&mut self, name: &str, values: Vec<String>) {
        if values.is_empty() {
            self.fields.remove(&field_key(name));
        } else {
            self.fields.insert(field_key(name), values);
        }
    }

    pub fn remove_fields(&mut self, name: &str) -> Option<Vec<String>> {
        self.fields.remove(&field_key(name))
    }

    /// Remove the first occurrence of a value.
    pub fn remove_field_value(&mut self, name: &str, value: &str) -> bool {
        let key = field_key(name);
        let Some(values) = self.fields.get_mut(&key) else {
            return false;
        };
        let Some(pos) = values.iter().position(|v| v == value) else {
            return false;
        };
        values.remove(pos);
        if values.is_empty() {
            self.fields.remove(&key);
        }
        true
    }

    pub fn retain_fields(&mut self, mut f: impl FnMut(&str) -> bool) {
        self.fields.retain(|name, _| f(name));
    }

    pub fn remove_all_fields(&mut self) {
        self.fields.clear();
    }

    #[must_use]
    pub const fn has_picture_blocks(&self) -> bool {
        self.pictures.is_some()
    }

    #[must_use]
    pub fn pictures(&self) -> &[NativePicture] {
        self.pictures.as_deref().unwrap_or_default()
    }

    /// Replace all picture blocks.
    ///
    /// Ignored if the container has no picture blocks.
    pub fn set_pictures(&mut self, pictures: Vec<NativePicture>) {
        if let Some(own_pictures) = &mut self.pictures {
            *own_pictures = pictures;
        }
    }
}
