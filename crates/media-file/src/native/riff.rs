// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! RIFF `LIST INFO` chunk.

use std::collections::BTreeMap;

/// Fields ordered by their 4-character chunk id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InfoTag {
    fields: BTreeMap<String, String>,
}

impl InfoTag {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(id, text)| (id.as_str(), text.as_str()))
    }

    #[must_use]
    pub fn field_text(&self, id: &str) -> Option<&str> {
        self.fields.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.fields.keys().position(|key| key == id)
    }

    /// Set the text of a chunk, an empty text removes it.
    pub fn set_field_text(&mut self, id: impl Into<String>, text: impl Into<String>) {
        let id = id.into();
        let text = text.into();
        if text.is_empty() {
            self.fields.remove(&id);
        } else {
            self.fields.insert(id, text);
        }
    }

    pub fn remove_field(&mut self, id: &str) -> Option<String> {
        self.fields.remove(id)
    }

    pub fn retain(&mut self, mut f: impl FnMut(&str) -> bool) {
        self.fields.retain(|id, _| f(id));
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}
