// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::BTreeSet;

use super::{FrameType, NUM_CUSTOM_FRAMES, NUM_STANDARD_FRAMES};

const NUM_MASKED_TYPES: usize = NUM_STANDARD_FRAMES + NUM_CUSTOM_FRAMES;

const ALL_FRAMES_MASK: u64 = (1 << NUM_MASKED_TYPES) - 1;

/// Selects frames by extended type, e.g. for bulk deletion.
///
/// Standard and custom types are selected by type. Frames of type
/// [`FrameType::Other`] are selected by their internal name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameFilter {
    enabled_types: u64,
    others_enabled: bool,
    // Names of other frames that deviate from `others_enabled`
    other_exceptions: BTreeSet<String>,
}

impl FrameFilter {
    /// A filter that matches nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A filter that matches everything.
    #[must_use]
    pub fn all() -> Self {
        let mut filter = Self::default();
        filter.enable_all();
        filter
    }

    /// A filter that only matches the given types.
    #[must_use]
    pub fn with_types(frame_types: impl IntoIterator<Item = FrameType>) -> Self {
        let mut filter = Self::default();
        for frame_type in frame_types {
            filter.enable(frame_type, "", true);
        }
        filter
    }

    pub fn enable_all(&mut self) {
        self.enabled_types = ALL_FRAMES_MASK;
        self.others_enabled = true;
        self.other_exceptions.clear();
    }

    #[must_use]
    pub fn are_all_enabled(&self) -> bool {
        self.enabled_types & ALL_FRAMES_MASK == ALL_FRAMES_MASK
            && self.others_enabled
            && self.other_exceptions.is_empty()
    }

    #[must_use]
    pub fn is_enabled(&self, frame_type: FrameType, name: &str) -> bool {
        if let Some(bit) = type_bit(frame_type) {
            return self.enabled_types & bit != 0;
        }
        if name.is_empty() {
            return self.others_enabled;
        }
        self.others_enabled != self.other_exceptions.contains(name)
    }

    /// Enable or disable a type, or an other frame by name.
    ///
    /// For [`FrameType::Other`] with an empty name all other
    /// frames are affected.
    pub fn enable(&mut self, frame_type: FrameType, name: &str, enable: bool) {
        if let Some(bit) = type_bit(frame_type) {
            if enable {
                self.enabled_types |= bit;
            } else {
                self.enabled_types &= !bit;
            }
            return;
        }
        if name.is_empty() {
            self.others_enabled = enable;
            self.other_exceptions.clear();
        } else if enable == self.others_enabled {
            self.other_exceptions.remove(name);
        } else {
            self.other_exceptions.insert(name.to_owned());
        }
    }
}

fn type_bit(frame_type: FrameType) -> Option<u64> {
    let ordinal = frame_type.ordinal();
    (ordinal < NUM_MASKED_TYPES).then(|| 1 << ordinal)
}
