// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Property map of tags that are only accessed by unified property
//! names, e.g. ID3v1 and ID3v2.

use std::collections::BTreeMap;

use super::NativePicture;

pub const ID3V1_FORMAT: &str = "ID3v1";

pub const ID3V2_FORMAT: &str = "ID3v2";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyTag {
    format: &'static str,
    properties: BTreeMap<String, Vec<String>>,
    pictures: Option<Vec<NativePicture>>,
}

impl PropertyTag {
    #[must_use]
    pub fn new(format: &'static str, supports_pictures: bool) -> Self {
        Self {
            format,
            properties: BTreeMap::new(),
            pictures: supports_pictures.then(Vec::new),
        }
    }

    /// Name of the underlying tag format.
    #[must_use]
    pub const fn format(&self) -> &'static str {
        self.format
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.pictures.as_ref().is_none_or(Vec::is_empty)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.properties
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.properties.get(key).map(Vec::as_slice)
    }

    /// Position of a key in the ordered property map.
    #[must_use]
    pub fn position(&self, key: &str) -> Option<usize> {
        self.properties.keys().position(|k| k == key)
    }

    /// Replace all values of a key.
    ///
    /// An empty list of values removes the key.
    pub fn set(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        if values.is_empty() {
            self.properties.remove(&key);
        } else {
            self.properties.insert(key, values);
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.properties.remove(key)
    }

    pub fn retain(&mut self, mut f: impl FnMut(&str) -> bool) {
        self.properties.retain(|key, _| f(key));
    }

    pub fn clear_properties(&mut self) {
        self.properties.clear();
    }

    #[must_use]
    pub const fn supports_pictures(&self) -> bool {
        self.pictures.is_some()
    }

    #[must_use]
    pub fn pictures(&self) -> &[NativePicture] {
        self.pictures.as_deref().unwrap_or_default()
    }

    /// Replace all pictures.
    ///
    /// Ignored if the tag does not support pictures.
    pub fn set_pictures(&mut self, pictures: Vec<NativePicture>) {
        if let Some(own_pictures) = &mut self.pictures {
            *own_pictures = pictures;
        } else if !pictures.is_empty() {
            log::debug!(
                "Discarding {num_pictures} picture(s) for {format} tag",
                num_pictures = pictures.len(),
                format = self.format,
            );
        }
    }
}
