// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Fallback for tags that are only accessible by unified property
//! names, i.e. ID3v1 and ID3v2 tags of MPEG, AAC and TrueAudio files.

use tagweave_core::{
    frame::{Frame, FrameCollection, FrameFilter, FrameIndex, FrameType},
    picture::PictureFields,
    util::string::{join_string_list, split_string_list},
};

use super::{
    ExtraFrames, KeyCharset, Mutation, TagContext, TagSlot, custom_or_other_type,
    default_frame_ids, fix_up_key,
    vorbis::{vorbis_name_of_type, vorbis_table_type},
};
use crate::native::{AudioProperties, ContainerKind, NativePicture, NativeTagKind, PropertyTag};

pub const EXTENSIONS: &[&str] = &["MP3", "MP2", "AAC", "TTA"];

const PICTURE_NAME: &str = "PICTURE";

/// Property names that differ from the Vorbis field names.
const PROPERTY_NAME_EXCEPTIONS: [(FrameType, &str); 8] = [
    (FrameType::EncodedBy, "ENCODEDBY"),
    (FrameType::EncoderSettings, "ENCODING"),
    (FrameType::Media, "MEDIA"),
    (FrameType::Picture, PICTURE_NAME),
    (FrameType::Publisher, "LABEL"),
    (FrameType::Website, "ARTISTWEBPAGE"),
    (FrameType::WwwAudioFile, "FILEWEBPAGE"),
    (FrameType::WwwAudioSource, "AUDIOSOURCEWEBPAGE"),
];

fn property_name(frame: &Frame, context: &TagContext<'_>) -> String {
    let frame_type = frame.frame_type();
    if let Some((_, name)) = PROPERTY_NAME_EXCEPTIONS
        .iter()
        .find(|(exception_type, _)| *exception_type == frame_type)
    {
        return (*name).to_owned();
    }
    if frame_type.is_custom()
        && let Some(name) = context.custom_frames.name_of(frame_type)
    {
        return name.to_uppercase();
    }
    vorbis_name_of_type(frame_type).map_or_else(
        || fix_up_key(frame.name(), KeyCharset::Vorbis).to_uppercase(),
        ToOwned::to_owned,
    )
}

fn type_from_property_name(name: &str, context: &TagContext<'_>) -> FrameType {
    PROPERTY_NAME_EXCEPTIONS
        .iter()
        .find(|(_, exception_name)| exception_name.eq_ignore_ascii_case(name))
        .map(|(frame_type, _)| *frame_type)
        .or_else(|| vorbis_table_type(name))
        .unwrap_or_else(|| custom_or_other_type(name, context))
}

#[must_use]
pub fn container_kind_from_extension(extension: &str) -> Option<ContainerKind> {
    match extension {
        "MP3" | "MP2" => Some(ContainerKind::Mpeg),
        "AAC" => Some(ContainerKind::Aac),
        "TTA" => Some(ContainerKind::TrueAudio),
        _ => None,
    }
}

#[must_use]
pub fn slot_tag_kind(container_kind: ContainerKind, slot: TagSlot) -> Option<NativeTagKind> {
    if !matches!(
        container_kind,
        ContainerKind::Mpeg | ContainerKind::Aac | ContainerKind::TrueAudio
    ) {
        return None;
    }
    match slot {
        TagSlot::Legacy => Some(NativeTagKind::Id3v1),
        TagSlot::Primary => Some(NativeTagKind::Id3v2),
        TagSlot::Secondary => None,
    }
}

#[must_use]
pub fn read_audio_properties(audio_properties: &AudioProperties) -> Option<String> {
    match audio_properties {
        AudioProperties::Other { format } => Some(format.clone()),
        _ => None,
    }
}

#[must_use]
pub fn get_all_frames(tag: &PropertyTag, context: &TagContext<'_>) -> FrameCollection {
    tag.properties()
        .enumerate()
        .map(|(index, (name, values))| {
            Frame::new(
                type_from_property_name(name, context),
                join_string_list(values),
                name,
                FrameIndex::Native(index),
            )
        })
        .collect::<Vec<_>>()
        .into()
}

pub(crate) fn set_frame(
    tag: &mut PropertyTag,
    index: usize,
    frame: &Frame,
    context: &TagContext<'_>,
) -> Mutation {
    let Some((existing_name, existing_values)) = tag.properties().nth(index) else {
        log::debug!("Property index {index} out of range");
        return Mutation::Rejected;
    };
    let mut name = property_name(frame, context);
    // Aliases like `LABEL` for `PUBLISHER` keep their name
    let same_property = existing_name.eq_ignore_ascii_case(&name)
        || (frame.frame_type() != FrameType::Other
            && type_from_property_name(existing_name, context) == frame.frame_type());
    if same_property {
        if join_string_list(existing_values) == frame.value() {
            return Mutation::Unchanged;
        }
        existing_name.clone_into(&mut name);
    } else {
        let existing_name = existing_name.to_owned();
        tag.remove(&existing_name);
    }
    tag.set(name, split_string_list(frame.value()));
    Mutation::Modified
}

pub(crate) fn set_frame_without_index(
    tag: &mut PropertyTag,
    frame: &Frame,
    context: &TagContext<'_>,
) -> Mutation {
    let name = property_name(frame, context);
    if frame.value().is_empty() {
        return Mutation::from_modified(tag.remove(&name).is_some());
    }
    if tag
        .get(&name)
        .is_some_and(|values| join_string_list(values) == frame.value())
    {
        return Mutation::Unchanged;
    }
    tag.set(name, split_string_list(frame.value()));
    Mutation::Modified
}

pub(crate) fn add_frame(
    tag: &mut PropertyTag,
    extra_frames: &mut ExtraFrames,
    frame: &mut Frame,
    context: &TagContext<'_>,
) -> Mutation {
    if frame.frame_type() == FrameType::Picture {
        if !tag.supports_pictures() {
            log::debug!("{format} tag does not support pictures", format = tag.format());
            return Mutation::Rejected;
        }
        if frame.field_list().is_empty() {
            PictureFields::default().apply_to(frame);
        }
        frame.set_internal_name(PICTURE_NAME);
        extra_frames.push(frame);
        return Mutation::Modified;
    }
    let name = property_name(frame, context);
    let mut values = tag.get(&name).map(<[String]>::to_vec).unwrap_or_default();
    values.extend(split_string_list(frame.value()));
    tag.set(name.as_str(), values);
    let index = tag
        .position(&name)
        .map_or(FrameIndex::Unpositioned, FrameIndex::Native);
    frame.set_internal_name(name);
    frame.set_index(index);
    Mutation::Modified
}

pub(crate) fn delete_frame(
    tag: &mut PropertyTag,
    frame: &Frame,
    _context: &TagContext<'_>,
) -> Mutation {
    Mutation::from_modified(tag.remove(frame.internal_name()).is_some())
}

pub(crate) fn delete_frames(
    tag: &mut PropertyTag,
    filter: &FrameFilter,
    context: &TagContext<'_>,
) -> bool {
    let len_before = tag.len();
    if filter.are_all_enabled() {
        tag.clear_properties();
    } else {
        tag.retain(|name| !filter.is_enabled(type_from_property_name(name, context), name));
    }
    tag.len() != len_before
}

#[must_use]
pub fn frame_ids(tag: &PropertyTag) -> Vec<String> {
    default_frame_ids(tag.supports_pictures())
}

pub(crate) fn read_extra_frames(tag: &PropertyTag) -> Vec<Frame> {
    tag.pictures()
        .iter()
        .enumerate()
        .map(|(index, picture)| {
            picture
                .to_fields()
                .into_frame(PICTURE_NAME, FrameIndex::Extra(index))
        })
        .collect()
}

pub(crate) fn sync_extra_frames(tag: &mut PropertyTag, extra_frames: &ExtraFrames) {
    let pictures = extra_frames
        .iter()
        .filter(|frame| frame.frame_type() == FrameType::Picture)
        .map(|frame| NativePicture::from_fields(&PictureFields::from_frame(frame)))
        .collect();
    tag.set_pictures(pictures);
}
