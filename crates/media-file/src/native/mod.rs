// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! In-memory models of the native tag containers.
//!
//! The adapters only ever operate on these models. Reading them
//! from and writing them into files is done by [`crate::io`].

use std::collections::{BTreeMap, btree_map};

use tagweave_core::picture::{ImageProperties, PictureFields, PictureType};

use crate::util::picture::image_format_from_mime_type;

pub mod ape;
pub mod generic;
pub mod matroska;
pub mod mp4;
pub mod riff;
pub mod xiph;

pub use self::{
    ape::{ApeItem, ApeTag, ApeValue},
    generic::PropertyTag,
    matroska::{
        AttachedFile, ChapterAtom, ChapterDisplay, ChapterEdition, MatroskaTag, SimpleTag,
        SimpleTagValue,
    },
    mp4::{Mp4CoverArt, Mp4ImageFormat, Mp4Tag, Mp4Value},
    riff::InfoTag,
    xiph::XiphComment,
};

/// The concrete kind of an audio file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Ape,
    Mpc,
    WavPack,
    Mp4,
    Matroska,
    Wav,
    Aiff,
    OggVorbis,
    Flac,
    Opus,
    Speex,
    Mpeg,
    Aac,
    TrueAudio,
}

/// Identifies a native tag within a [`NativeFile`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NativeTagKind {
    Id3v1,
    Id3v2,
    Ape,
    Xiph,
    Mp4,
    RiffInfo,
    Matroska,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NativeTag {
    Ape(ApeTag),
    Mp4(Mp4Tag),
    Matroska(MatroskaTag),
    RiffInfo(InfoTag),
    Xiph(XiphComment),
    Generic(PropertyTag),
}

impl NativeTag {
    /// A new, empty tag of the given kind.
    #[must_use]
    pub fn empty(tag_kind: NativeTagKind, container_kind: ContainerKind) -> Self {
        match tag_kind {
            NativeTagKind::Id3v1 => Self::Generic(PropertyTag::new(generic::ID3V1_FORMAT, false)),
            NativeTagKind::Id3v2 => Self::Generic(PropertyTag::new(generic::ID3V2_FORMAT, true)),
            NativeTagKind::Ape => Self::Ape(ApeTag::new()),
            NativeTagKind::Xiph => {
                if container_kind == ContainerKind::Flac {
                    Self::Xiph(XiphComment::with_picture_blocks())
                } else {
                    Self::Xiph(XiphComment::new())
                }
            }
            NativeTagKind::Mp4 => Self::Mp4(Mp4Tag::new()),
            NativeTagKind::RiffInfo => Self::RiffInfo(InfoTag::new()),
            NativeTagKind::Matroska => Self::Matroska(MatroskaTag::default()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Ape(tag) => tag.is_empty(),
            Self::Mp4(tag) => tag.is_empty(),
            Self::Matroska(tag) => tag.is_empty(),
            Self::RiffInfo(tag) => tag.is_empty(),
            Self::Xiph(tag) => tag.is_empty(),
            Self::Generic(tag) => tag.is_empty(),
        }
    }
}

/// Codec or format specific properties of the audio stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioProperties {
    Ape {
        /// Version multiplied by 1000, e.g. 3990
        version: u16,
        bit_depth: u8,
    },
    Mpc,
    WavPack {
        version: u16,
        bit_depth: u8,
    },
    Mp4 {
        codec: String,
        bit_depth: u8,
    },
    Matroska {
        doc_type: String,
        doc_type_version: u64,
        codec_id: String,
    },
    Wav {
        /// The `wFormatTag` of the `fmt ` chunk
        format: u16,
        bit_depth: u8,
    },
    Aiff {
        bit_depth: u8,
    },
    OggVorbis,
    Flac {
        bit_depth: u8,
    },
    Opus {
        version: u8,
    },
    Speex {
        version: u32,
    },
    Other {
        format: String,
    },
}

/// A picture with the properties of a FLAC picture block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NativePicture {
    pub picture_type: PictureType,
    pub mime_type: String,
    pub description: String,
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub num_colors: u32,
}

impl NativePicture {
    /// Image properties are taken over if declared and otherwise
    /// determined from the image data.
    #[must_use]
    pub fn from_fields(fields: &PictureFields) -> Self {
        let ImageProperties {
            width,
            height,
            depth,
            num_colors,
            ..
        } = fields.valid_image_properties();
        Self {
            picture_type: fields.picture_type,
            mime_type: fields.mime_type.clone(),
            description: fields.description.clone(),
            data: fields.data.clone(),
            width,
            height,
            depth,
            num_colors,
        }
    }

    #[must_use]
    pub fn to_fields(&self) -> PictureFields {
        let image_properties = (self.width > 0 || self.height > 0).then(|| {
            ImageProperties::new(
                self.width,
                self.height,
                self.depth,
                self.num_colors,
                &self.data,
            )
        });
        PictureFields {
            image_format: image_format_from_mime_type(&self.mime_type).to_owned(),
            mime_type: self.mime_type.clone(),
            picture_type: self.picture_type,
            description: self.description.clone(),
            data: self.data.clone(),
            image_properties,
            ..Default::default()
        }
    }
}

/// The native objects of one open file.
///
/// Owns all native tags. The adapters refer to them by
/// [`NativeTagKind`] and never keep references across calls.
#[derive(Clone, Debug)]
pub struct NativeFile {
    kind: ContainerKind,
    tags: BTreeMap<NativeTagKind, NativeTag>,
    audio_properties: Option<AudioProperties>,
}

impl NativeFile {
    #[must_use]
    pub const fn new(kind: ContainerKind) -> Self {
        Self {
            kind,
            tags: BTreeMap::new(),
            audio_properties: None,
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag_kind: NativeTagKind, tag: NativeTag) -> Self {
        self.tags.insert(tag_kind, tag);
        self
    }

    #[must_use]
    pub const fn kind(&self) -> ContainerKind {
        self.kind
    }

    #[must_use]
    pub fn tag(&self, tag_kind: NativeTagKind) -> Option<&NativeTag> {
        self.tags.get(&tag_kind)
    }

    pub fn tag_mut(&mut self, tag_kind: NativeTagKind) -> Option<&mut NativeTag> {
        self.tags.get_mut(&tag_kind)
    }

    #[must_use]
    pub fn has_tag(&self, tag_kind: NativeTagKind) -> bool {
        self.tags.contains_key(&tag_kind)
    }

    /// Insert or replace a tag.
    pub fn insert_tag(&mut self, tag_kind: NativeTagKind, tag: NativeTag) -> Option<NativeTag> {
        self.tags.insert(tag_kind, tag)
    }

    /// Get the tag of the given kind, creating an empty one if missing.
    pub fn ensure_tag(&mut self, tag_kind: NativeTagKind) -> &mut NativeTag {
        let container_kind = self.kind;
        self.tags
            .entry(tag_kind)
            .or_insert_with(|| NativeTag::empty(tag_kind, container_kind))
    }

    pub fn remove_tag(&mut self, tag_kind: NativeTagKind) -> Option<NativeTag> {
        self.tags.remove(&tag_kind)
    }

    pub fn tags(&self) -> btree_map::Iter<'_, NativeTagKind, NativeTag> {
        self.tags.iter()
    }

    #[must_use]
    pub const fn audio_properties(&self) -> Option<&AudioProperties> {
        self.audio_properties.as_ref()
    }

    pub fn set_audio_properties(&mut self, audio_properties: AudioProperties) {
        self.audio_properties = Some(audio_properties);
    }
}
