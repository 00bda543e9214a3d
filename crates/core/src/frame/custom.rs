// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;

use super::FrameType;

/// Maximum number of user-defined custom frame types.
pub const NUM_CUSTOM_FRAMES: usize = 8;

/// Registry of the names of user-defined custom frames.
///
/// Built once from the configuration and immutable afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomFrameNames {
    names: Vec<String>,
    types_by_key: HashMap<String, FrameType>,
}

impl CustomFrameNames {
    /// Register up to [`NUM_CUSTOM_FRAMES`] names.
    ///
    /// A leading `!` is stripped and empty names are skipped.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .filter_map(|name| {
                let name = name.as_ref();
                let name = name.strip_prefix('!').unwrap_or(name);
                (!name.is_empty()).then(|| name.to_owned())
            })
            .take(NUM_CUSTOM_FRAMES)
            .collect::<Vec<_>>();
        let types_by_key = names
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                let key = lookup_key(name);
                (!key.is_empty()).then(|| (key, FrameType::Custom(index as u8)))
            })
            .collect();
        Self {
            names,
            types_by_key,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Internal name of a custom type, `None` if not registered.
    #[must_use]
    pub fn name_of(&self, frame_type: FrameType) -> Option<&str> {
        let FrameType::Custom(index) = frame_type else {
            return None;
        };
        self.names.get(usize::from(index)).map(String::as_str)
    }

    /// Custom type of a registered name, [`FrameType::Other`] otherwise.
    ///
    /// Names are compared upper-case with spaces removed.
    #[must_use]
    pub fn type_of(&self, name: &str) -> FrameType {
        self.types_by_key
            .get(&lookup_key(name))
            .copied()
            .unwrap_or(FrameType::Other)
    }

    /// All registered custom types with their names.
    pub fn iter(&self) -> impl Iterator<Item = (FrameType, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(index, name)| (FrameType::Custom(index as u8), name.as_str()))
    }
}

fn lookup_key(name: &str) -> String {
    name.chars()
        .filter(|c| *c != ' ')
        .flat_map(char::to_uppercase)
        .collect()
}
