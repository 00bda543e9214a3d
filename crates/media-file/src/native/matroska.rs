// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Matroska tags, attachments and chapters.

/// `TargetTypeValue` of track level tags.
pub const TARGET_TYPE_TRACK: u64 = 30;

/// `TargetTypeValue` of album level tags, also the default.
pub const TARGET_TYPE_ALBUM: u64 = 50;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimpleTagValue {
    String(String),
    Binary(Vec<u8>),
}

/// A `SimpleTag` together with the `Targets` of its enclosing `Tag`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleTag {
    pub name: String,
    pub value: SimpleTagValue,
    pub language: String,
    pub default: bool,

    /// 0 if undefined
    pub target_type_value: u64,

    /// 0 if the tag applies to all tracks
    pub track_uid: u64,
}

impl SimpleTag {
    #[must_use]
    pub fn new(name: impl Into<String>, value: SimpleTagValue) -> Self {
        Self {
            name: name.into(),
            value,
            language: "und".to_owned(),
            default: true,
            target_type_value: 0,
            track_uid: 0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttachedFile {
    pub uid: u64,
    pub file_name: String,
    pub mime_type: String,
    pub description: String,
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChapterDisplay {
    pub string: String,
    pub language: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChapterAtom {
    pub uid: u64,
    pub time_start_ns: u64,
    pub time_end_ns: u64,
    pub hidden: bool,
    pub displays: Vec<ChapterDisplay>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChapterEdition {
    pub uid: u64,
    pub hidden: bool,
    pub default: bool,
    pub ordered: bool,
    pub chapters: Vec<ChapterAtom>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatroskaTag {
    pub simple_tags: Vec<SimpleTag>,
    pub attachments: Vec<AttachedFile>,
    pub editions: Vec<ChapterEdition>,
}

impl MatroskaTag {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.simple_tags.is_empty() && self.attachments.is_empty() && self.editions.is_empty()
    }
}
